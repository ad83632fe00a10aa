mod engine;
mod geometry;
mod grid;
mod page;
pub mod units;

pub use engine::*;
pub use geometry::*;
pub use grid::*;
pub use page::*;
