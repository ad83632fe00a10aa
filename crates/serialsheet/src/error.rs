//! Error types for serial generation, sheet layout and rendering.
//!
//! Every fallible operation in this crate is all-or-nothing: when an error is
//! returned no partial batch or partial placement list has been produced.
//!
//! ## Error Cases
//! - `InvalidArgument`: a bad count, length, alphabet or geometry.
//! - `ResourceExhaustion`: the serial space is too small for the request, or
//!   the random source could not be read or stopped producing new values.
//! - `Render`: the external encoder or canvas failed.
//! - `Io`: writing an export failed.

use crate::render::RenderError;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors this crate can produce.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An argument violated its documented constraints.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The request cannot be satisfied with the available resources.
    #[error("resource exhausted: {0}")]
    ResourceExhaustion(#[from] Exhaustion),

    /// The symbol encoder or page canvas failed.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// Writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`Error::InvalidArgument`].
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` for [`Error::ResourceExhaustion`].
    pub const fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::ResourceExhaustion(_))
    }
}

/// The resource that ran out.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Exhaustion {
    /// More distinct serials were requested than the alphabet and length can
    /// represent.
    #[error("requested {requested} serials but only {capacity} distinct values exist")]
    SerialSpace { requested: usize, capacity: u128 },

    /// The operating system entropy source could not be read.
    #[error("random source unavailable: {reason}")]
    RandomSourceUnavailable { reason: String },

    /// The random source kept repeating serials already in the batch.
    #[error("random source stalled after {distinct} distinct serials ({duplicates} duplicates in a row)")]
    RandomSourceStalled { distinct: usize, duplicates: u128 },
}
