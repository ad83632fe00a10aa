use crate::Result;

/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. Serial generation needs unpredictable output, so
/// production sources must be cryptographically strong.
///
/// The random type `T` is generic (typically `u64`).
///
/// # Example
/// ```
/// use serialsheet::{RandSource, Result};
///
/// struct FixedRand;
/// impl RandSource<u64> for FixedRand {
///     fn try_rand(&self) -> Result<u64> {
///         Ok(1234)
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.try_rand().unwrap(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Exhaustion::RandomSourceUnavailable`] when the
    /// underlying entropy source cannot be read.
    fn try_rand(&self) -> Result<T>;
}

impl<T, R: RandSource<T> + ?Sized> RandSource<T> for &R {
    fn try_rand(&self) -> Result<T> {
        (**self).try_rand()
    }
}
