//! Minting facade: validation, engine selection, randomness ownership.
//!
//! Every [`Minter`] owns its random source. Nothing is shared between
//! minters, so a fixed seed reproduces a stamp exactly and independent
//! searches can run side by side without locking.

use core::fmt;

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::digest::Digest;
use crate::error::{ExhaustionReason, HashcashError, Result};
use crate::mutation::search_mutation;
use crate::params::{
    DEFAULT_BITS, DIGEST_BITS, MAX_BITS, MAX_COUNTER_DIGITS, MIN_BITS, MINIMUM_RANDOM,
};
use crate::search::SearchLimits;
use crate::sequential::search_sequential;
use crate::stamp::{DatePrecision, StampFormat, stamp_prefix, validate_resource};
use crate::verify::Verifier;

/// Filler that always fits the longest counter, its separator and one
/// mutable byte, whatever the prefix length.
const MIN_FILLER: usize = MAX_COUNTER_DIGITS + 2;

/// Minter defaults and bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MinterConfig {
    /// Denomination used when the caller does not give one
    pub default_bits: u32,
    /// Lowest denomination accepted for version 1 stamps
    pub min_bits: u32,
    /// Highest denomination accepted for version 1 stamps
    pub max_bits: u32,
    /// Minimum filler bytes in the version 1 search buffer
    pub minimum_random: usize,
    /// Layout used when the caller does not give one
    pub default_format: StampFormat,
}

impl Default for MinterConfig {
    fn default() -> Self {
        Self {
            default_bits: DEFAULT_BITS,
            min_bits: MIN_BITS,
            max_bits: MAX_BITS,
            minimum_random: MINIMUM_RANDOM,
            default_format: StampFormat::default(),
        }
    }
}

impl MinterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_bits > self.max_bits {
            return Err(HashcashError::InvalidArgument(format!(
                "min_bits ({}) exceeds max_bits ({})",
                self.min_bits, self.max_bits
            )));
        }
        if self.max_bits > DIGEST_BITS {
            return Err(HashcashError::InvalidArgument(format!(
                "max_bits ({}) exceeds the {DIGEST_BITS}-bit digest",
                self.max_bits
            )));
        }
        if self.minimum_random < MIN_FILLER {
            return Err(HashcashError::InvalidArgument(format!(
                "minimum_random ({}) must be at least {MIN_FILLER} to hold a counter",
                self.minimum_random
            )));
        }
        self.check_bits(self.default_format, self.default_bits)
    }

    /// Reject denominations outside what `format` accepts.
    pub fn check_bits(&self, format: StampFormat, bits: u32) -> Result<()> {
        match format {
            StampFormat::Version1 if bits < self.min_bits || bits > self.max_bits => {
                Err(HashcashError::InvalidArgument(format!(
                    "the required denomination must be between {} and {} inclusive, got {bits}",
                    self.min_bits, self.max_bits
                )))
            }
            StampFormat::Version0 if bits > DIGEST_BITS => {
                Err(HashcashError::InvalidArgument(format!(
                    "a {DIGEST_BITS}-bit digest cannot have {bits} leading zero bits"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Inputs of one mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub resource: String,
    pub bits: u32,
    pub date: NaiveDateTime,
    pub format: StampFormat,
    pub precision: DatePrecision,
}

impl MintRequest {
    /// Request with the date width the chosen layout normally uses.
    pub fn new(
        resource: impl Into<String>,
        bits: u32,
        date: NaiveDateTime,
        format: StampFormat,
    ) -> Self {
        Self {
            resource: resource.into(),
            bits,
            date,
            format,
            precision: format.default_precision(),
        }
    }

    pub fn with_precision(mut self, precision: DatePrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Fixed part of the stamp ahead of the searched fields.
    pub fn prefix(&self) -> String {
        let date_text = self.precision.format(&self.date);
        stamp_prefix(self.format, self.bits, &date_text, &self.resource)
    }
}

/// A minted stamp and what it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedStamp {
    pub stamp: String,
    pub format: StampFormat,
    pub bits: u32,
    /// Candidates hashed by the winning search
    pub attempts: u64,
    pub digest: Digest,
}

impl MintedStamp {
    /// Verifier that holds this stamp to the denomination it was minted at.
    ///
    /// Version 0 stamps do not carry their bit count, so the plain
    /// [`verify`](crate::verify) only accepts them at the default
    /// denomination.
    pub fn verifier(&self) -> Verifier {
        Verifier::new().with_legacy_bits(self.bits)
    }
}

impl fmt::Display for MintedStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stamp)
    }
}

/// Stamp minter owning its configuration and random source.
pub struct Minter<R = StdRng> {
    config: MinterConfig,
    rng: R,
}

impl Minter<StdRng> {
    /// Minter seeded from the operating system.
    pub fn from_entropy() -> Result<Self> {
        Self::from_entropy_with_config(MinterConfig::default())
    }

    pub fn from_entropy_with_config(config: MinterConfig) -> Result<Self> {
        let mut seed = [0u8; 32];
        getrandom::getrandom(&mut seed).map_err(|e| HashcashError::Entropy(e.to_string()))?;
        Ok(Self::with_rng(config, StdRng::from_seed(seed)))
    }

    /// Deterministic minter, for tests and reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(MinterConfig::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Minter<R> {
    pub fn with_rng(config: MinterConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Replace the configuration, keeping the random source.
    pub fn with_config(mut self, config: MinterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MinterConfig {
        &self.config
    }

    /// Check everything that can be rejected before hashing starts.
    pub fn validate(&self, request: &MintRequest) -> Result<()> {
        validate_resource(&request.resource)?;
        self.config.validate()?;
        self.config.check_bits(request.format, request.bits)
    }

    /// Mint a stamp for `request`, bounded by `limits`.
    pub fn mint(&mut self, request: &MintRequest, limits: &SearchLimits) -> Result<MintedStamp> {
        self.validate(request)?;
        run_search(&self.config, request, &mut self.rng, limits)
    }

    /// Mint with the configured default denomination and layout.
    pub fn mint_resource(&mut self, resource: &str, date: NaiveDateTime) -> Result<MintedStamp> {
        let request = MintRequest::new(
            resource,
            self.config.default_bits,
            date,
            self.config.default_format,
        );
        self.mint(&request, &SearchLimits::default())
    }
}

#[cfg(feature = "parallel")]
impl<R: Rng> Minter<R> {
    /// Race `workers` independently seeded searches; the first stamp found
    /// cancels the rest.
    ///
    /// Each worker draws its own random run, so version 0 workers scan
    /// disjoint stamps even though all counters start at `i32::MIN`.
    pub fn mint_parallel(
        &mut self,
        request: &MintRequest,
        limits: &SearchLimits,
        workers: usize,
    ) -> Result<MintedStamp> {
        use rayon::prelude::*;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        self.validate(request)?;

        let seeds: Vec<u64> = (0..workers.max(1)).map(|_| self.rng.next_u64()).collect();
        let found = Arc::new(AtomicBool::new(false));
        let limits = limits.clone().with_cancel(Arc::clone(&found));
        let config = &self.config;

        let results: Vec<Result<MintedStamp>> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let result = run_search(config, request, &mut rng, &limits);
                if result.is_ok() {
                    found.store(true, Ordering::SeqCst);
                }
                result
            })
            .collect();

        let mut failure: Option<HashcashError> = None;
        for result in results {
            match result {
                Ok(minted) => return Ok(minted),
                // A sibling cancellation only stands in until a real reason shows up.
                Err(e) => {
                    if failure.as_ref().is_none_or(is_cancellation) {
                        failure = Some(e);
                    }
                }
            }
        }
        Err(failure.unwrap_or(HashcashError::SearchExhausted {
            reason: ExhaustionReason::Cancelled,
            attempts: 0,
        }))
    }
}

#[cfg(feature = "parallel")]
fn is_cancellation(error: &HashcashError) -> bool {
    matches!(
        error,
        HashcashError::SearchExhausted {
            reason: ExhaustionReason::Cancelled,
            ..
        }
    )
}

fn run_search<G: Rng + ?Sized>(
    config: &MinterConfig,
    request: &MintRequest,
    rng: &mut G,
    limits: &SearchLimits,
) -> Result<MintedStamp> {
    let prefix = request.prefix();
    debug!(
        format = %request.format,
        bits = request.bits,
        resource = %request.resource,
        "searching for stamp"
    );

    let outcome = match request.format {
        StampFormat::Version0 => search_sequential(&prefix, request.bits, rng, limits),
        StampFormat::Version1 => {
            search_mutation(&prefix, request.bits, config.minimum_random, rng, limits)
        }
    };

    match outcome {
        Ok(outcome) => {
            debug!(attempts = outcome.attempts, stamp = %outcome.stamp, "stamp minted");
            Ok(MintedStamp {
                stamp: outcome.stamp,
                format: request.format,
                bits: request.bits,
                attempts: outcome.attempts,
                digest: outcome.digest,
            })
        }
        Err(HashcashError::SearchExhausted { reason, attempts }) => {
            if reason == ExhaustionReason::Cancelled {
                debug!(attempts, "search cancelled");
            } else {
                warn!(%reason, attempts, bits = request.bits, "no stamp found");
            }
            Err(HashcashError::SearchExhausted { reason, attempts })
        }
        Err(e) => Err(e),
    }
}

/// Mint a stamp with a freshly seeded minter and default limits.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use hashcash_core::{StampFormat, Verifier, mint};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
/// let minted = mint("foo.bar@foobar.com", 8, date, StampFormat::Version0).unwrap();
/// assert!(Verifier::new().with_legacy_bits(8).verify(&minted.stamp));
/// ```
pub fn mint(
    resource: &str,
    bits: u32,
    date: NaiveDateTime,
    format: StampFormat,
) -> Result<MintedStamp> {
    let request = MintRequest::new(resource, bits, date, format);
    Minter::from_entropy()?.mint(&request, &SearchLimits::default())
}
