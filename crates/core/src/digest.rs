//! SHA-1 hash primitive.
//!
//! SHA-1 is fixed by the stamp format. Collision resistance is irrelevant
//! here; the only property relied on is that partial pre-images (leading
//! zero bits) cost brute force.

use sha1::{Digest as _, Sha1};

use crate::params::DIGEST_SIZE;

/// A 160-bit stamp digest
pub type Digest = [u8; DIGEST_SIZE];

/// Reusable SHA-1 hasher
///
/// The search loops hash millions of candidates; keeping one hasher around
/// avoids re-creating the state on every attempt.
#[derive(Clone, Default)]
pub struct StampHasher {
    inner: Sha1,
}

impl StampHasher {
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    /// Hash `input` and leave the hasher ready for the next call.
    #[inline]
    pub fn hash(&mut self, input: &[u8]) -> Digest {
        self.inner.update(input);
        self.inner.finalize_reset().into()
    }
}

/// Convenience function for single-shot hashing
pub fn digest(input: &[u8]) -> Digest {
    Sha1::digest(input).into()
}
