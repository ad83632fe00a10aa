use std::collections::HashSet;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Alphabet, Error, Exhaustion, RandSource, Result, ThreadRandom};

/// Serial length used when the caller does not pick one.
pub const DEFAULT_SERIAL_LENGTH: usize = 10;

// A run of duplicate candidates longer than `STALL_FACTOR` times the expected
// run (plus `MIN_STALL_RUN`) is treated as a stuck random source.
const STALL_FACTOR: u128 = 64;
const MIN_STALL_RUN: u128 = 1_024;

/// Longest tolerated run of consecutive duplicates once `distinct` of
/// `capacity` serials have been drawn. `distinct < capacity` holds while the
/// loop runs.
fn stall_limit(capacity: u128, distinct: usize) -> u128 {
    let remaining = capacity - distinct as u128;
    (capacity / remaining)
        .saturating_mul(STALL_FACTOR)
        .saturating_add(MIN_STALL_RUN)
}

/// A generator of per-batch unique serials.
///
/// Every serial is `length` symbols drawn uniformly from an [`Alphabet`]. A
/// batch is produced by rejection sampling: candidates are drawn until the
/// requested number of distinct values has accumulated. Uniqueness is
/// guaranteed within one batch only.
///
/// ## Features
/// - ✅ Cryptographically strong by default ([`ThreadRandom`])
/// - ✅ All-or-nothing: a failed request returns no serials
/// - ✅ Deterministic under a mocked [`RandSource`]
///
/// ## See Also
/// - [`generate`] for the one-call form with default settings
pub struct SerialGenerator<R>
where
    R: RandSource<u64>,
{
    rng: R,
    alphabet: Alphabet,
    length: usize,
}

impl SerialGenerator<ThreadRandom> {
    /// Creates a generator over [`Alphabet::ALPHANUMERIC`] with the
    /// thread-local CSPRNG.
    ///
    /// # Example
    /// ```
    /// use serialsheet::SerialGenerator;
    ///
    /// let serials = SerialGenerator::new(8).generate(3).unwrap();
    /// assert_eq!(serials.len(), 3);
    /// assert!(serials.iter().all(|s| s.len() == 8));
    /// ```
    pub const fn new(length: usize) -> Self {
        Self::from_components(ThreadRandom, Alphabet::ALPHANUMERIC, length)
    }
}

impl Default for SerialGenerator<ThreadRandom> {
    fn default() -> Self {
        Self::new(DEFAULT_SERIAL_LENGTH)
    }
}

impl<R> SerialGenerator<R>
where
    R: RandSource<u64>,
{
    /// Creates a generator from an explicit random source, alphabet and
    /// length.
    ///
    /// The length is validated when generating, so a zero length is reported
    /// as [`Error::InvalidArgument`] at that point.
    pub const fn from_components(rng: R, alphabet: Alphabet, length: usize) -> Self {
        Self {
            rng,
            alphabet,
            length,
        }
    }

    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct serials this generator can produce.
    pub fn capacity(&self) -> u128 {
        self.alphabet.capacity(self.length)
    }

    /// Returns `true` if `serial` has the configured length and only uses
    /// symbols of the configured alphabet.
    pub fn is_well_formed(&self, serial: &str) -> bool {
        serial.len() == self.length && serial.bytes().all(|b| self.alphabet.contains(b))
    }

    /// Draws a single candidate serial. Candidates are not deduplicated.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the random source.
    pub fn candidate(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            buf.push(self.alphabet.sample(&self.rng)?);
        }
        // Alphabets only hold printable ASCII.
        Ok(buf.into_iter().map(char::from).collect())
    }

    /// Generates `count` pairwise distinct serials, in the order they were
    /// first drawn.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `count` or the length is zero.
    /// - [`Exhaustion::SerialSpace`] if `count` exceeds [`Self::capacity`],
    ///   before anything is drawn.
    /// - [`Exhaustion::RandomSourceUnavailable`] if the source fails midway;
    ///   the partial batch is discarded.
    /// - [`Exhaustion::RandomSourceStalled`] if the source keeps producing
    ///   already drawn serials far beyond what chance allows.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), fields(length = self.length)))]
    pub fn generate(&self, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Err(Error::invalid("count must be greater than 0"));
        }
        if self.length == 0 {
            return Err(Error::invalid("serial length must be greater than 0"));
        }
        let capacity = self.capacity();
        if count as u128 > capacity {
            return Err(Exhaustion::SerialSpace {
                requested: count,
                capacity,
            }
            .into());
        }
        #[cfg(feature = "tracing")]
        if count as u128 > capacity / 2 {
            tracing::warn!(
                count,
                capacity = %capacity,
                "request covers more than half of the serial space, sampling will slow down"
            );
        }

        let mut seen = HashSet::with_capacity(count);
        let mut serials = Vec::with_capacity(count);
        let mut _rejected = 0_usize;
        let mut run = 0_u128;
        while serials.len() < count {
            let candidate = self.candidate()?;
            if seen.insert(candidate.clone()) {
                serials.push(candidate);
                run = 0;
                continue;
            }
            _rejected += 1;
            run += 1;
            if run > MIN_STALL_RUN && run > stall_limit(capacity, serials.len()) {
                return Err(Exhaustion::RandomSourceStalled {
                    distinct: serials.len(),
                    duplicates: run,
                }
                .into());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(count, rejected = _rejected, "generated serial batch");
        Ok(serials)
    }
}

/// Generates `count` distinct serials of `length` symbols using
/// [`Alphabet::ALPHANUMERIC`] and [`ThreadRandom`].
///
/// # Example
/// ```
/// let serials = serialsheet::generate(4, serialsheet::DEFAULT_SERIAL_LENGTH).unwrap();
/// assert_eq!(serials.len(), 4);
/// ```
///
/// # Errors
///
/// See [`SerialGenerator::generate`].
pub fn generate(count: usize, length: usize) -> Result<Vec<String>> {
    SerialGenerator::new(length).generate(count)
}
