//! Stamp verification.
//!
//! Re-hashes the full stamp text and applies the prefix predicate with the
//! stamp's denomination. Date windows, replay databases and resource
//! matching belong to the caller.

use crate::difficulty::{Predicate, leading_zero_bits};
use crate::digest::{Digest, digest};
use crate::error::Result;
use crate::params::DEFAULT_BITS;
use crate::stamp::{Stamp, StampFormat};

/// Verifies stamps of both layouts.
///
/// Version 1 stamps state their denomination in the `bits` field. Version 0
/// stamps carry none, so minter and verifier agree on `legacy_bits` out of
/// band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verifier {
    legacy_bits: u32,
}

/// Everything the verifier derived from one stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampReport {
    pub format: StampFormat,
    pub required_bits: u32,
    pub digest: Digest,
    pub leading_zero_bits: u32,
    pub valid: bool,
}

impl Verifier {
    pub fn new() -> Self {
        Self {
            legacy_bits: DEFAULT_BITS,
        }
    }

    /// Denomination applied to version 0 stamps.
    pub fn with_legacy_bits(mut self, bits: u32) -> Self {
        self.legacy_bits = bits;
        self
    }

    pub fn legacy_bits(&self) -> u32 {
        self.legacy_bits
    }

    pub fn required_bits(&self, stamp: &Stamp<'_>) -> u32 {
        stamp.bits().unwrap_or(self.legacy_bits)
    }

    /// `Ok(false)` when the digest falls short, `Err` when the text is not a stamp.
    pub fn check(&self, text: &str) -> Result<bool> {
        let stamp = Stamp::parse(text)?;
        let hash = digest(stamp.as_bytes());
        Ok(Predicate::PrefixMask.passes(&hash, self.required_bits(&stamp)))
    }

    /// Like [`Verifier::check`], folding malformed stamps into `false`.
    pub fn verify(&self, text: &str) -> bool {
        self.check(text).unwrap_or(false)
    }

    pub fn inspect(&self, text: &str) -> Result<StampReport> {
        let stamp = Stamp::parse(text)?;
        let hash = digest(stamp.as_bytes());
        let required_bits = self.required_bits(&stamp);

        Ok(StampReport {
            format: stamp.format(),
            required_bits,
            digest: hash,
            leading_zero_bits: leading_zero_bits(&hash),
            valid: Predicate::PrefixMask.passes(&hash, required_bits),
        })
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify a stamp with the default verifier.
///
/// Version 0 stamps are held to [`DEFAULT_BITS`](crate::DEFAULT_BITS); use
/// [`MintedStamp::verifier`](crate::MintedStamp::verifier) or
/// [`Verifier::with_legacy_bits`] for any other agreed denomination.
///
/// # Example
///
/// ```rust
/// use hashcash_core::verify;
///
/// assert!(verify("1:20:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi"));
/// assert!(!verify("1:21:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi"));
/// assert!(!verify("not a stamp"));
/// ```
pub fn verify(stamp: &str) -> bool {
    Verifier::default().verify(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HashcashError;

    const REFERENCE: &str = "1:20:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi";

    #[test]
    fn test_reference_stamp() {
        let report = Verifier::new().inspect(REFERENCE).unwrap();

        assert!(report.valid);
        assert_eq!(report.format, StampFormat::Version1);
        assert_eq!(report.required_bits, 20);
        assert_eq!(report.leading_zero_bits, 20);
        assert_eq!(
            hex::encode(report.digest),
            "00000b7c65ac70650eb8d4f034e86d7d5cd1852f"
        );
    }

    #[test]
    fn test_raised_bits_field_fails() {
        for bits in [21, 24, 32] {
            let forged = REFERENCE.replacen(":20:", &format!(":{bits}:"), 1);
            assert_eq!(Verifier::new().check(&forged), Ok(false), "{forged}");
        }
    }

    #[test]
    fn test_malformed_is_error_or_false() {
        let verifier = Verifier::new();
        for text in ["", "garbage", "1:twenty:1303030600:a::b:c", "9:20:x:y::z:w"] {
            assert!(matches!(
                verifier.check(text),
                Err(HashcashError::MalformedStamp(_))
            ));
            assert!(!verifier.verify(text));
        }
    }

    #[test]
    fn test_legacy_bits_are_out_of_band() {
        // Any version 0 text passes a zero-bit agreement.
        let text = "0:060408:foo.bar@foobar.com:QUJDREVGR0gAAACA";
        assert_eq!(Verifier::new().with_legacy_bits(0).check(text), Ok(true));
        assert_eq!(Verifier::new().with_legacy_bits(161).check(text), Ok(false));
    }
}
