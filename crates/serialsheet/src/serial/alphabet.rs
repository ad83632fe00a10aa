use crate::{Error, RandSource, Result};

const NO_VALUE: u8 = 255;

/// A fixed character set that serials are drawn from.
///
/// The alphabet size and the serial length together bound how many distinct
/// serials exist, so the choice of alphabet affects both collision behaviour
/// and the printed format.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    symbols: &'static [u8],
    lookup: [u8; 256],
}

impl Alphabet {
    /// Uppercase ASCII letters followed by digits: `A-Z0-9`, 36 symbols.
    pub const ALPHANUMERIC: Self = Self::build(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789");

    /// Crockford base32: digits and uppercase letters without `I L O U`, 32
    /// symbols. Avoids characters that are easily misread on a printed label.
    pub const CROCKFORD: Self = Self::build(b"0123456789ABCDEFGHJKMNPQRSTVWXYZ");

    /// Creates a custom alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `symbols` is empty, longer than
    /// 255 entries, contains a byte that is not printable ASCII, or repeats a
    /// symbol.
    pub fn new(symbols: &'static [u8]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::invalid("alphabet must not be empty"));
        }
        if symbols.len() >= usize::from(NO_VALUE) {
            return Err(Error::invalid(format!(
                "alphabet has {} symbols, at most {} are supported",
                symbols.len(),
                NO_VALUE - 1
            )));
        }
        let mut seen = [false; 256];
        for &b in symbols {
            if !b.is_ascii_graphic() {
                return Err(Error::invalid(format!(
                    "alphabet symbol {b:#04x} is not printable ASCII"
                )));
            }
            if seen[usize::from(b)] {
                return Err(Error::invalid(format!(
                    "alphabet repeats symbol '{}'",
                    char::from(b)
                )));
            }
            seen[usize::from(b)] = true;
        }
        Ok(Self::build(symbols))
    }

    /// Builds the lookup table. Callers guarantee `symbols` is valid.
    const fn build(symbols: &'static [u8]) -> Self {
        let mut lookup = [NO_VALUE; 256];
        let mut i = 0;
        while i < symbols.len() {
            lookup[symbols[i] as usize] = i as u8;
            i += 1;
        }
        Self { symbols, lookup }
    }

    /// Number of symbols.
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; alphabets are never empty.
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in index order.
    pub const fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    /// Returns `true` if `byte` belongs to this alphabet.
    pub const fn contains(&self, byte: u8) -> bool {
        self.lookup[byte as usize] != NO_VALUE
    }

    /// Index of `byte` within the alphabet, if present.
    pub const fn index_of(&self, byte: u8) -> Option<usize> {
        match self.lookup[byte as usize] {
            NO_VALUE => None,
            i => Some(i as usize),
        }
    }

    /// Number of distinct strings of `length` symbols, saturating at
    /// `u128::MAX`.
    pub fn capacity(&self, length: usize) -> u128 {
        u32::try_from(length)
            .ok()
            .and_then(|exp| (self.len() as u128).checked_pow(exp))
            .unwrap_or(u128::MAX)
    }

    /// Draws one symbol uniformly at random.
    ///
    /// A 64-bit word is accepted only below the largest multiple of the
    /// alphabet size, so `word % len` carries no modulo bias.
    pub fn sample<R: RandSource<u64>>(&self, rng: &R) -> Result<u8> {
        let len = self.len() as u64;
        let zone = u64::MAX - (u64::MAX % len);
        loop {
            let word = rng.try_rand()?;
            if word < zone {
                return Ok(self.symbols[(word % len) as usize]);
            }
        }
    }
}

impl core::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Alphabet")
            .field(&String::from_utf8_lossy(self.symbols))
            .finish()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::ALPHANUMERIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphanumeric_has_36_symbols_in_documented_order() {
        let alphabet = Alphabet::ALPHANUMERIC;
        assert_eq!(alphabet.len(), 36);
        assert_eq!(alphabet.symbols()[0], b'A');
        assert_eq!(alphabet.symbols()[25], b'Z');
        assert_eq!(alphabet.symbols()[26], b'0');
        assert_eq!(alphabet.symbols()[35], b'9');
    }

    #[test]
    fn crockford_excludes_ambiguous_letters() {
        let alphabet = Alphabet::CROCKFORD;
        assert_eq!(alphabet.len(), 32);
        for b in [b'I', b'L', b'O', b'U'] {
            assert!(!alphabet.contains(b), "{} should be excluded", char::from(b));
        }
    }

    #[test]
    fn lookup_matches_symbol_positions() {
        let alphabet = Alphabet::ALPHANUMERIC;
        for (i, &b) in alphabet.symbols().iter().enumerate() {
            assert_eq!(alphabet.index_of(b), Some(i));
        }
        assert_eq!(alphabet.index_of(b'a'), None);
        assert_eq!(alphabet.index_of(b'-'), None);
    }

    #[test]
    fn custom_alphabet_rejects_bad_input() {
        assert!(Alphabet::new(b"").unwrap_err().is_invalid_argument());
        assert!(Alphabet::new(b"ABCA").unwrap_err().is_invalid_argument());
        assert!(Alphabet::new(b"AB C").unwrap_err().is_invalid_argument());
        assert!(Alphabet::new(b"AB\n").unwrap_err().is_invalid_argument());
        assert_eq!(Alphabet::new(b"01").unwrap().len(), 2);
    }

    #[test]
    fn capacity_is_size_to_the_length() {
        let alphabet = Alphabet::ALPHANUMERIC;
        assert_eq!(alphabet.capacity(0), 1);
        assert_eq!(alphabet.capacity(1), 36);
        assert_eq!(alphabet.capacity(2), 1296);
        assert_eq!(alphabet.capacity(10), 3_656_158_440_062_976);
        assert_eq!(alphabet.capacity(100), u128::MAX);
    }
}
