use crate::{Error, Result};

/// Physical description of one sticker and the grid it is printed in.
///
/// Sizes and margins are in millimetres. `margin_x` is both the gap before the
/// first column and between columns; `margin_y` is the same for rows, measured
/// down from the top of the page.
///
/// The value is read-only to the layout engine; [`Self::validate`] enforces
/// the invariants before any arithmetic runs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickerGeometry {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub rows: usize,
    pub cols: usize,
}

impl StickerGeometry {
    pub fn new(
        name: impl Into<String>,
        width: f64,
        height: f64,
        margin_x: f64,
        margin_y: f64,
        rows: usize,
        cols: usize,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            margin_x,
            margin_y,
            rows,
            cols,
        }
    }

    /// The sticker sizes shipped by default.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::new("1in x 1in", 25.4, 25.4, 5.0, 5.0, 8, 3),
            Self::new("2in x 1in", 50.8, 25.4, 5.0, 5.0, 8, 2),
            Self::new("65 x 25mm", 65.0, 25.0, 3.0, 3.0, 9, 3),
        ]
    }

    /// Finds a preset by name, ignoring ASCII case.
    pub fn preset(name: &str) -> Option<Self> {
        Self::presets()
            .into_iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Checks the geometry invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a size is not a finite positive
    /// number, a margin is negative or not finite, `rows` or `cols` is zero, or
    /// `rows * cols` overflows.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid(format!(
                    "sticker {field} must be positive, got {value}"
                )));
            }
        }
        for (field, value) in [("margin_x", self.margin_x), ("margin_y", self.margin_y)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid(format!(
                    "sticker {field} must be non-negative, got {value}"
                )));
            }
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::invalid(format!(
                "grid must have at least one row and column, got {} x {}",
                self.rows, self.cols
            )));
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(Error::invalid(format!(
                "grid of {} x {} overflows",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Stickers per page. Only meaningful on a validated geometry.
    pub const fn per_page(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Human-readable summary, e.g. `1in x 1in - 25.4x25.4mm (3 cols x 8 rows)`.
    pub fn description(&self) -> String {
        format!(
            "{} - {}x{}mm ({} cols x {} rows)",
            self.name, self.width, self.height, self.cols, self.rows
        )
    }
}
