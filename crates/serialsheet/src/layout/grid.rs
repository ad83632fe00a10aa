/// Position of one unit within the paginated grid. All indices are zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSlot {
    pub page: usize,
    pub row: usize,
    pub col: usize,
}

/// Maps a flat sequence index onto its page, row and column.
///
/// The grid fills left to right, then top to bottom; row 0 is the topmost
/// row. Every `rows * cols`-th index starts a new page.
///
/// # Panics
/// Panics if `rows` or `cols` is zero. [`crate::SheetLayout`] validates its
/// geometry first and never calls this with an empty grid.
///
/// # Example
/// ```
/// use serialsheet::{GridSlot, slot};
///
/// assert_eq!(slot(4, 2, 2), GridSlot { page: 1, row: 0, col: 0 });
/// assert_eq!(slot(3, 2, 2), GridSlot { page: 0, row: 1, col: 1 });
/// ```
#[inline]
pub const fn slot(index: usize, rows: usize, cols: usize) -> GridSlot {
    assert!(rows > 0 && cols > 0, "grid must have at least one row and column");
    let per_page = rows * cols;
    let within_page = index % per_page;
    GridSlot {
        page: index / per_page,
        row: (within_page / cols) % rows,
        col: within_page % cols,
    }
}

/// Number of pages needed for `count` units, `0` for an empty batch.
///
/// # Panics
/// Panics if `per_page` is zero.
#[inline]
pub const fn page_count(count: usize, per_page: usize) -> usize {
    assert!(per_page > 0, "a page must hold at least one unit");
    count.div_ceil(per_page)
}
