//! Sheet layout engine.
//!
//! Turns an ordered sequence of identifiers plus a [`StickerGeometry`] into
//! one [`Placement`] per identifier. Coordinates are PDF-style: points, origin
//! at the lower-left corner of the page, Y growing upward, and each placement
//! origin is the lower-left corner of its sticker. Row 0 is the topmost row
//! regardless of that convention.
//!
//! The engine is pure: it performs no encoding or drawing and holds no
//! mutable state, so the same inputs always produce the same placements.

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{GridSlot, PageSize, Result, StickerGeometry, page_count, slot, units::mm_to_pt};

/// Where one identifier lands on the printed sheet.
///
/// `x`, `y`, `width` and `height` are in points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement<'a> {
    pub page: usize,
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub identifier: &'a str,
}

impl Placement<'_> {
    pub const fn slot(&self) -> GridSlot {
        GridSlot {
            page: self.page,
            row: self.row,
            col: self.col,
        }
    }

    /// Anchor for the caption: horizontally centred on the sticker, `offset`
    /// points below its lower edge.
    pub fn label_anchor(&self, offset: f64) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y - offset)
    }
}

/// A validated grid, pre-converted to device units.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetLayout {
    rows: usize,
    cols: usize,
    per_page: usize,
    width: f64,
    height: f64,
    margin_x: f64,
    margin_y: f64,
    page_width: f64,
    page_height: f64,
}

impl SheetLayout {
    /// Validates `geometry` and `page` and converts them from millimetres to
    /// points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if either input violates its
    /// invariants.
    pub fn new(geometry: &StickerGeometry, page: PageSize) -> Result<Self> {
        geometry.validate()?;
        page.validate()?;

        let layout = Self {
            rows: geometry.rows,
            cols: geometry.cols,
            per_page: geometry.per_page(),
            width: mm_to_pt(geometry.width),
            height: mm_to_pt(geometry.height),
            margin_x: mm_to_pt(geometry.margin_x),
            margin_y: mm_to_pt(geometry.margin_y),
            page_width: mm_to_pt(page.width),
            page_height: mm_to_pt(page.height),
        };

        #[cfg(feature = "tracing")]
        if !layout.fits_page() {
            tracing::warn!(
                geometry = %geometry.name,
                "sticker grid extends past the page edge"
            );
        }
        Ok(layout)
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Stickers per page.
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Sticker size in points.
    pub const fn sticker_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Page size in points.
    pub const fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    /// Pages needed for `count` identifiers. An exact multiple of
    /// [`Self::per_page`] does not add a trailing empty page.
    pub const fn page_count(&self, count: usize) -> usize {
        page_count(count, self.per_page)
    }

    /// Grid position of the `index`-th identifier.
    pub const fn slot(&self, index: usize) -> GridSlot {
        slot(index, self.rows, self.cols)
    }

    /// Lower-left corner of the sticker at `slot`, in points.
    pub fn origin(&self, slot: GridSlot) -> (f64, f64) {
        let x = self.margin_x + slot.col as f64 * (self.width + self.margin_x);
        let y = self.page_height
            - self.margin_y
            - self.height
            - slot.row as f64 * (self.height + self.margin_y);
        (x, y)
    }

    /// Returns `true` if the whole grid, margins included on the leading
    /// edges, stays within the page.
    pub fn fits_page(&self) -> bool {
        let (right, _) = self.origin(GridSlot {
            page: 0,
            row: 0,
            col: self.cols - 1,
        });
        let (_, bottom) = self.origin(GridSlot {
            page: 0,
            row: self.rows - 1,
            col: 0,
        });
        right + self.width <= self.page_width && bottom >= 0.0
    }

    /// Lays out `identifiers` in order, one placement per identifier.
    ///
    /// The final page holds only the remainder; no filler placements are
    /// emitted for its empty slots. An empty input yields no placements.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(count = identifiers.len())))]
    pub fn place<'a, S: AsRef<str>>(&self, identifiers: &'a [S]) -> Vec<Placement<'a>> {
        identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| {
                let slot = self.slot(index);
                let (x, y) = self.origin(slot);
                Placement {
                    page: slot.page,
                    row: slot.row,
                    col: slot.col,
                    x,
                    y,
                    width: self.width,
                    height: self.height,
                    identifier: identifier.as_ref(),
                }
            })
            .collect()
    }
}

/// Lays out `identifiers` on A4 pages.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidArgument`] for an invalid geometry.
pub fn layout<'a, S: AsRef<str>>(
    identifiers: &'a [S],
    geometry: &StickerGeometry,
) -> Result<Vec<Placement<'a>>> {
    Ok(SheetLayout::new(geometry, PageSize::A4)?.place(identifiers))
}
