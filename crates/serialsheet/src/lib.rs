//! Batch production pipeline for printable serial stickers.
//!
//! Two independent pieces make up the core:
//!
//! - [`SerialGenerator`] draws `count` distinct serials of a fixed length from
//!   a fixed [`Alphabet`] using a cryptographically strong [`RandSource`].
//! - [`SheetLayout`] maps an ordered sequence of serials onto a paginated grid
//!   described by a [`StickerGeometry`], yielding one [`Placement`] per serial.
//!
//! [`render_sheet`] drives an external [`SymbolEncoder`] and [`PageCanvas`]
//! over those placements, and [`Batch`] carries the metadata needed for the
//! tabular export.
//!
//! ```
//! use serialsheet::{PageSize, SheetLayout, StickerGeometry, generate};
//!
//! let serials = generate(5, 10).unwrap();
//! let geometry = StickerGeometry::new("demo", 25.4, 25.4, 5.0, 5.0, 2, 2);
//! let layout = SheetLayout::new(&geometry, PageSize::A4).unwrap();
//! let placements = layout.place(&serials);
//!
//! let pages: Vec<_> = placements.iter().map(|p| p.page).collect();
//! assert_eq!(pages, [0, 0, 0, 0, 1]);
//! ```

mod batch;
mod error;
mod layout;
mod rand;
mod render;
mod serial;

pub use crate::batch::*;
pub use crate::error::*;
pub use crate::layout::*;
pub use crate::rand::*;
pub use crate::render::*;
pub use crate::serial::*;
