//! Sequential counter scan for version 0 stamps.
//!
//! The counter starts at `i32::MIN`, not zero, so the whole signed range is
//! available before the search gives up. Reaching `i32::MAX` without a hit
//! is a hard failure; the counter never wraps.

use rand::Rng;

use crate::alphabet::Alphabet;
use crate::difficulty::Predicate;
use crate::digest::StampHasher;
use crate::error::{ExhaustionReason, HashcashError, Result};
use crate::params::LEGACY_RANDOM_LEN;
use crate::search::{SearchLimits, SearchOutcome};
use crate::stamp::LegacySuffix;

/// Search for a version 0 stamp behind `prefix` (`0:date:resource:`).
///
/// A fresh random run is drawn from `rng` for every call, so two calls with
/// identical inputs explore different counter spaces.
pub fn search_sequential<R: Rng + ?Sized>(
    prefix: &str,
    bits: u32,
    rng: &mut R,
    limits: &SearchLimits,
) -> Result<SearchOutcome> {
    let random = Alphabet::ALPHANUMERIC.random_string(rng, LEGACY_RANDOM_LEN);
    scan(prefix, &random, bits, i32::MIN, limits)
}

/// Scan counters from `first` through `i32::MAX`.
pub(crate) fn scan(
    prefix: &str,
    random: &[u8],
    bits: u32,
    first: i32,
    limits: &SearchLimits,
) -> Result<SearchOutcome> {
    let mut hasher = StampHasher::new();
    let mut suffix = LegacySuffix::new(random);
    let mut candidate = String::with_capacity(prefix.len() + 24);
    candidate.push_str(prefix);

    let mut counter = first;
    let mut attempts: u64 = 0;

    loop {
        limits
            .check(attempts)
            .map_err(|reason| HashcashError::SearchExhausted { reason, attempts })?;

        suffix.set_counter(counter);
        candidate.truncate(prefix.len());
        suffix.encode_into(&mut candidate);

        let digest = hasher.hash(candidate.as_bytes());
        attempts += 1;

        if Predicate::PrefixMask.passes(&digest, bits) {
            return Ok(SearchOutcome {
                stamp: candidate,
                attempts,
                digest,
            });
        }

        if counter == i32::MAX {
            return Err(HashcashError::SearchExhausted {
                reason: ExhaustionReason::CounterSpace,
                attempts,
            });
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::meets_difficulty;
    use crate::digest::digest;
    use crate::stamp::{Stamp, StampFormat};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PREFIX: &str = "0:060408170509:foo.bar@foobar.com:";

    #[test]
    fn test_counter_starts_at_minimum() {
        let mut rng = StdRng::seed_from_u64(1);
        // Zero bits: the very first candidate passes.
        let outcome = search_sequential(PREFIX, 0, &mut rng, &SearchLimits::new()).unwrap();

        assert_eq!(outcome.attempts, 1);
        let stamp = Stamp::parse(&outcome.stamp).unwrap();
        assert_eq!(stamp.format(), StampFormat::Version0);
        assert_eq!(stamp.legacy_counter(), Some(i32::MIN));
    }

    #[test]
    fn test_found_stamp_meets_difficulty() {
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = search_sequential(PREFIX, 12, &mut rng, &SearchLimits::new()).unwrap();

        assert!(outcome.stamp.starts_with(PREFIX));
        assert_eq!(digest(outcome.stamp.as_bytes()), outcome.digest);
        assert!(meets_difficulty(&outcome.digest, 12));

        // The counter advanced once per attempt from the minimum.
        let counter = Stamp::parse(&outcome.stamp).unwrap().legacy_counter().unwrap();
        assert_eq!(
            i64::from(counter) - i64::from(i32::MIN) + 1,
            outcome.attempts as i64
        );
    }

    #[test]
    fn test_counter_space_exhaustion() {
        // 161 bits can never be met; the scan must stop at i32::MAX.
        let result = scan(PREFIX, b"ABCDEFGH", 161, i32::MAX - 3, &SearchLimits::new());
        assert_eq!(
            result.unwrap_err(),
            HashcashError::SearchExhausted {
                reason: ExhaustionReason::CounterSpace,
                attempts: 4,
            }
        );
    }

    #[test]
    fn test_attempt_budget_stops_scan() {
        let mut rng = StdRng::seed_from_u64(3);
        let limits = SearchLimits::new().with_max_attempts(100);
        let result = search_sequential(PREFIX, 64, &mut rng, &limits);
        assert_eq!(
            result.unwrap_err(),
            HashcashError::SearchExhausted {
                reason: ExhaustionReason::AttemptBudget,
                attempts: 100,
            }
        );
    }

    #[test]
    fn test_seed_determines_stamp() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            search_sequential(PREFIX, 8, &mut rng, &SearchLimits::new()).unwrap()
        };

        assert_eq!(run(9).stamp, run(9).stamp);
        assert_ne!(run(9).stamp, run(10).stamp);
    }
}
