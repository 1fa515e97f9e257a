//! # Hashcash Core
//!
//! Client-puzzle proof-of-work: a requester spends adjustable, provable CPU
//! effort to mint a compact stamp bound to a resource and a date, and a
//! verifier checks it with a single SHA-1.
//!
//! ## Stamp Layouts
//!
//! ```text
//! version 0:  0:YYMMDDhhmmss:resource:suffix
//! version 1:  1:bits:YYMMDD:resource::random:counter
//! ```
//!
//! - **Version 0** is minted by a sequential scan of a signed 32-bit counter,
//!   starting at `i32::MIN`, embedded little-endian and base64 encoded.
//! - **Version 1** is minted by randomized mutation of a block-padded buffer,
//!   with the attempt counter written in the same alphabet as the fill.
//!
//! Both minters and the verifier share one difficulty predicate: the digest
//! must start with `bits` zero bits.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hashcash_core::{MintRequest, Minter, SearchLimits, StampFormat, verify};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let request = MintRequest::new("foo.bar@foobar.com", 16, date, StampFormat::Version1);
//!
//! // Fixed seed: the same stamp every run
//! let mut minter = Minter::from_seed(7);
//! let minted = minter.mint(&request, &SearchLimits::default()).unwrap();
//!
//! assert!(verify(&minted.stamp));
//! ```

mod alphabet;
mod difficulty;
mod digest;
mod error;
mod ffi;
mod minter;
mod mutation;
mod params;
mod search;
mod sequential;
mod stamp;
mod verify;

pub use alphabet::{Alphabet, CounterDigits};
pub use difficulty::{Predicate, leading_zero_bits, meets_difficulty, meets_difficulty_by_count};
pub use digest::{Digest, StampHasher, digest};
pub use error::{ExhaustionReason, HashcashError, Result};
pub use ffi::{hashcash_leading_zero_bits, hashcash_verify};
pub use minter::{MintRequest, MintedStamp, Minter, MinterConfig, mint};
pub use mutation::{MutationSearch, search_mutation};
pub use params::*;
pub use search::{SearchLimits, SearchOutcome};
pub use sequential::search_sequential;
pub use stamp::{
    DatePrecision, LegacySuffix, Stamp, StampFormat, legacy_suffix, padded_length, parse_date,
    stamp_prefix, validate_resource,
};
pub use verify::{StampReport, Verifier, verify};

#[cfg(test)]
mod tests;
