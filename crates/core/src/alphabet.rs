//! Symbol alphabets used for random fill and counter digits.
//!
//! An [`Alphabet`] is an injective map `{0..N-1} <-> symbol`. The version 1
//! minter draws both its random fill and its counter digits from the same
//! instance so the two uses can never drift apart.

use rand::Rng;

use crate::params::MAX_COUNTER_DIGITS;

/// A fixed, ordered set of distinct ASCII symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    symbols: &'static [u8],
}

impl Alphabet {
    /// Random fill and counter digits of version 1 stamps (65 symbols)
    pub const STAMP: Alphabet = Alphabet {
        symbols: b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/=",
    };

    /// Random run of version 0 stamps (62 symbols)
    pub const ALPHANUMERIC: Alphabet = Alphabet {
        symbols: b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
    };

    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    /// Symbol for digit `index`, if in range.
    #[inline]
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    /// Digit value of `symbol`, if it belongs to the alphabet.
    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.index_of(symbol).is_some()
    }

    /// One symbol drawn uniformly.
    #[inline]
    pub fn random_symbol<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        self.symbols[rng.gen_range(0..self.symbols.len())]
    }

    /// `len` symbols drawn uniformly.
    pub fn random_string<R: Rng + ?Sized>(&self, rng: &mut R, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.random_symbol(rng)).collect()
    }

    /// Encode `value` in base `len()`, least-significant digit first.
    ///
    /// Zero encodes to the empty run.
    pub fn encode_counter(&self, mut value: u64) -> CounterDigits {
        let base = self.symbols.len() as u64;
        let mut digits = CounterDigits::default();

        while value != 0 {
            digits.buf[digits.len] = self.symbols[(value % base) as usize];
            digits.len += 1;
            value /= base;
        }

        digits
    }

    /// Inverse of [`Alphabet::encode_counter`]; `None` on a foreign symbol or overflow.
    pub fn decode_counter(&self, digits: &[u8]) -> Option<u64> {
        let base = self.symbols.len() as u64;
        digits.iter().rev().try_fold(0u64, |acc, &symbol| {
            let digit = self.index_of(symbol)? as u64;
            acc.checked_mul(base)?.checked_add(digit)
        })
    }
}

/// Alphabet digits of a counter, stack allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDigits {
    buf: [u8; MAX_COUNTER_DIGITS],
    len: usize,
}

impl CounterDigits {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FIELD_DELIMITER;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_alphabets_are_injective() {
        for alphabet in [Alphabet::STAMP, Alphabet::ALPHANUMERIC] {
            let unique: HashSet<u8> = alphabet.symbols().iter().copied().collect();
            assert_eq!(unique.len(), alphabet.len());
            assert!(!alphabet.contains(FIELD_DELIMITER));
        }
        assert_eq!(Alphabet::STAMP.len(), 65);
        assert_eq!(Alphabet::ALPHANUMERIC.len(), 62);
    }

    #[test]
    fn test_counter_encoding_is_least_significant_first() {
        let stamp = Alphabet::STAMP;

        assert!(stamp.encode_counter(0).is_empty());
        assert_eq!(stamp.encode_counter(1).as_bytes(), b"1");
        assert_eq!(stamp.encode_counter(64).as_bytes(), b"=");
        // 65 = 0 * 65^0 + 1 * 65^1
        assert_eq!(stamp.encode_counter(65).as_bytes(), b"01");
        // 66 = 1 + 1 * 65
        assert_eq!(stamp.encode_counter(66).as_bytes(), b"11");
    }

    #[test]
    fn test_counter_length_grows_logarithmically() {
        let stamp = Alphabet::STAMP;
        assert_eq!(stamp.encode_counter(64).len(), 1);
        assert_eq!(stamp.encode_counter(65 * 65 - 1).len(), 2);
        assert_eq!(stamp.encode_counter(65 * 65).len(), 3);
        assert_eq!(stamp.encode_counter(u64::MAX).len(), MAX_COUNTER_DIGITS);
    }

    #[test]
    fn test_random_draws_stay_in_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = Alphabet::ALPHANUMERIC.random_string(&mut rng, 256);
        assert_eq!(drawn.len(), 256);
        assert!(drawn.iter().all(|&b| Alphabet::ALPHANUMERIC.contains(b)));
    }

    #[test]
    fn test_decode_rejects_foreign_symbols() {
        assert_eq!(Alphabet::STAMP.decode_counter(b""), Some(0));
        assert_eq!(Alphabet::STAMP.decode_counter(b"1:"), None);
    }

    proptest! {
        #[test]
        fn prop_counter_digits_decode(value in any::<u64>()) {
            let digits = Alphabet::STAMP.encode_counter(value);
            prop_assert_eq!(Alphabet::STAMP.decode_counter(digits.as_bytes()), Some(value));
        }
    }
}
