mod error;
mod interface;
mod sheet;

pub use error::*;
pub use interface::*;
pub use sheet::*;
