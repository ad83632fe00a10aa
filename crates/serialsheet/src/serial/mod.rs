mod alphabet;
mod generator;
#[cfg(test)]
mod tests;

pub use alphabet::*;
pub use generator::*;
