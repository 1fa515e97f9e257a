//! Hashcash Stamp Parameters
//!
//! Fixed sizes of the hash primitive plus the defaults both minters and the
//! verifier agree on.

/// SHA-1 digest size in bytes
pub const DIGEST_SIZE: usize = 20;

/// Bits in a digest; no difficulty above this can ever be met
pub const DIGEST_BITS: u32 = (DIGEST_SIZE * 8) as u32;

/// SHA-1 compression block size in bytes
pub const BLOCK_SIZE: usize = 64;

/// Default denomination (leading zero bits)
pub const DEFAULT_BITS: u32 = 20;

/// Lowest denomination accepted for version 1 stamps
pub const MIN_BITS: u32 = 16;

/// Highest denomination accepted for version 1 stamps
pub const MAX_BITS: u32 = 32;

/// Minimum number of filler bytes after the version 1 prefix
pub const MINIMUM_RANDOM: usize = 16;

/// Length of the random alphanumeric run in a version 0 stamp
pub const LEGACY_RANDOM_LEN: usize = 8;

/// Field separator of the stamp wire format
pub const FIELD_DELIMITER: u8 = b':';

/// Attempt ceiling applied when the caller does not pass one
pub const DEFAULT_ATTEMPT_BUDGET: u64 = 1 << 40;

/// Longest alphabet encoding of a `u64` counter (65^11 > 2^64)
pub const MAX_COUNTER_DIGITS: usize = 11;
