use crate::{Error, Result};

/// Physical page size in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait, 210 x 297 mm.
    pub const A4: Self = Self::new(210.0, 297.0);

    /// US Letter portrait, 8.5 x 11 in.
    pub const LETTER: Self = Self::new(215.9, 279.4);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Looks up a named page size (`a4` or `letter`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "letter" => Some(Self::LETTER),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless both sides are finite and
    /// strictly positive.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid(format!(
                    "page {field} must be a positive number of millimetres, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}
