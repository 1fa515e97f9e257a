//! Hashcash Minter Library
//!
//! Mints and verifies hashcash stamps: a resource-bound proof that the
//! sender spent a chosen amount of CPU time, checkable with one SHA-1.
//!
//! # Overview
//!
//! A stamp such as
//!
//! ```text
//! X-Hashcash: 1:20:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi
//! ```
//!
//! is worth its `bits` when the SHA-1 of the whole line (without the header
//! name) starts with that many zero bits.
//!
//! # Example
//!
//! ```rust
//! use hashcash::algorithm::{MintRequest, Minter, SearchLimits, StampFormat};
//! use hashcash::config::Config;
//!
//! let config = Config::default();
//! let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//!
//! let mut minter = Minter::from_seed(1).with_config(config.minter.clone());
//! let request = MintRequest::new("foo.bar@foobar.com", 16, date, StampFormat::Version1);
//! let minted = minter.mint(&request, &config.search_limits()).unwrap();
//!
//! assert!(config.verifier().verify(&minted.stamp));
//! ```

// Re-export the core algorithm
pub use hashcash_core as algorithm;

pub mod config;

// Convenience re-exports
pub use algorithm::{mint, verify, MintRequest, MintedStamp, Minter, StampFormat, Verifier};
