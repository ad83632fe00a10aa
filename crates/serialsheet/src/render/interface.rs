use crate::Result;
use std::path::{Path, PathBuf};

/// Turns an identifier into a raster symbol (typically a QR code).
///
/// Encoding must be deterministic for a given identifier. Implementations are
/// shared across worker threads, hence the `Sync` bound.
pub trait SymbolEncoder: Sync {
    type Image: Send;
    type Error: core::error::Error + Send + Sync + 'static;

    fn encode(&self, identifier: &str) -> Result<Self::Image, Self::Error>;
}

/// A page-based drawing surface. Coordinates are points with the origin at
/// the lower-left corner of the page.
///
/// Calls arrive in placement order from a single thread: `begin_page` once
/// before the first placement of a page, `end_page` once after its last.
pub trait PageCanvas {
    type Image;
    type Error: core::error::Error + Send + Sync + 'static;

    fn begin_page(&mut self) -> Result<(), Self::Error>;

    fn draw_image(
        &mut self,
        image: &Self::Image,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), Self::Error>;

    /// Draws `text` horizontally centred on `x`, with its baseline at `y`.
    fn draw_label(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;

    fn end_page(&mut self) -> Result<(), Self::Error>;

    /// Writes the document and returns the path actually written.
    fn save(&mut self, path: &Path) -> Result<PathBuf, Self::Error>;
}
