mod csv;
mod meta;

pub use csv::*;
pub use meta::*;
