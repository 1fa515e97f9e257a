//! Randomized mutation search for version 1 stamps.
//!
//! The stamp is built in a buffer padded to a whole number of SHA-1 blocks:
//!
//! ```text
//! | prefix (fixed) | random fill (mutable) | : | counter digits |
//! ^0               ^lower                  ^upper               ^len
//! ```
//!
//! Every attempt writes the attempt counter at the tail, overwrites one
//! random byte in `[lower, upper)` and hashes the whole buffer. Writes are
//! cumulative: a byte changed in one attempt stays changed for the next, so
//! the search walks the buffer rather than resampling it.

use core::ops::Range;

use rand::Rng;

use crate::alphabet::Alphabet;
use crate::difficulty::Predicate;
use crate::digest::{Digest, StampHasher};
use crate::error::{HashcashError, Result};
use crate::params::{FIELD_DELIMITER, MAX_COUNTER_DIGITS};
use crate::search::{SearchLimits, SearchOutcome};
use crate::stamp::padded_length;

/// Stateful mutation search over one padded buffer.
pub struct MutationSearch {
    buffer: Vec<u8>,
    /// Start of the mutable region, i.e. the prefix length
    lower: usize,
    /// End of the mutable region, the separator in front of the counter
    upper: usize,
    counter: u64,
    alphabet: Alphabet,
    hasher: StampHasher,
}

impl MutationSearch {
    /// Lay out `prefix` and at least `minimum_random` filler symbols.
    ///
    /// The filler is seeded from the alphabet so every intermediate buffer is
    /// printable stamp text.
    pub fn new<R: Rng + ?Sized>(prefix: &str, minimum_random: usize, rng: &mut R) -> Result<Self> {
        let alphabet = Alphabet::STAMP;
        let lower = prefix.len();
        let len = padded_length(lower, minimum_random);

        // Room for the longest counter, its separator and one mutable byte
        if len - lower < MAX_COUNTER_DIGITS + 2 {
            return Err(HashcashError::InvalidArgument(format!(
                "{} filler bytes cannot hold a counter; raise minimum_random",
                len - lower
            )));
        }

        let mut buffer = Vec::with_capacity(len);
        buffer.extend_from_slice(prefix.as_bytes());
        buffer.extend((lower..len).map(|_| alphabet.random_symbol(rng)));

        Ok(Self {
            buffer,
            lower,
            upper: len,
            counter: 0,
            alphabet,
            hasher: StampHasher::new(),
        })
    }

    /// Region random writes may touch; never overlaps the prefix.
    pub fn mutable_range(&self) -> Range<usize> {
        self.lower..self.upper
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.counter
    }

    /// Run one attempt and return the digest of the resulting buffer.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Digest {
        self.splice_counter();

        let position = rng.gen_range(self.lower..self.upper);
        self.buffer[position] = self.alphabet.random_symbol(rng);

        self.counter += 1;
        self.hasher.hash(&self.buffer)
    }

    /// Write the counter digits at the tail with a separator in front, and
    /// pull `upper` down to the separator.
    fn splice_counter(&mut self) {
        let digits = self.alphabet.encode_counter(self.counter);
        let len = self.buffer.len();
        let start = len - digits.len();

        self.buffer[start..].copy_from_slice(digits.as_bytes());
        self.upper = start - 1;
        self.buffer[self.upper] = FIELD_DELIMITER;
    }

    fn into_stamp(self) -> Result<String> {
        String::from_utf8(self.buffer)
            .map_err(|e| HashcashError::InvalidArgument(format!("stamp is not UTF-8: {e}")))
    }
}

/// Search for a version 1 stamp behind `prefix` (`1:bits:date:resource::`).
///
/// Passes when the digest has at least `bits` leading zero bits.
pub fn search_mutation<R: Rng + ?Sized>(
    prefix: &str,
    bits: u32,
    minimum_random: usize,
    rng: &mut R,
    limits: &SearchLimits,
) -> Result<SearchOutcome> {
    let mut search = MutationSearch::new(prefix, minimum_random, rng)?;

    loop {
        let attempts = search.attempts();
        limits
            .check(attempts)
            .map_err(|reason| HashcashError::SearchExhausted { reason, attempts })?;

        let digest = search.step(rng);

        if Predicate::LeadingZeroCount.passes(&digest, bits) {
            let attempts = search.attempts();
            return Ok(SearchOutcome {
                stamp: search.into_stamp()?,
                attempts,
                digest,
            });
        }
    }
}
