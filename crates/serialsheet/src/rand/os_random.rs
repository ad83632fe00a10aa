use crate::{Exhaustion, RandSource, Result};
use rand::{TryRngCore, rngs::OsRng};

/// A `RandSource` that reads the operating system entropy pool on every call.
///
/// Slower than [`crate::ThreadRandom`], but it never buffers state in the
/// process and it reports an unavailable entropy source as
/// [`Exhaustion::RandomSourceUnavailable`] instead of panicking.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl RandSource<u64> for OsRandom {
    fn try_rand(&self) -> Result<u64> {
        OsRng.try_next_u64().map_err(|e| {
            Exhaustion::RandomSourceUnavailable {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_random_produces_distinct_words() {
        let rng = OsRandom;
        let a: u64 = rng.try_rand().unwrap();
        let b: u64 = rng.try_rand().unwrap();
        let c: u64 = rng.try_rand().unwrap();
        // Three equal 64-bit draws would mean the source is broken.
        assert!(!(a == b && b == c));
    }
}
