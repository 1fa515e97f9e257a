//! C FFI bindings for embedding the verifier

use crate::difficulty::leading_zero_bits;
use crate::digest::digest;
use crate::verify::Verifier;
use core::slice;

/// Verify a stamp
/// - stamp: pointer to the stamp bytes (UTF-8, not NUL terminated)
/// - stamp_len: length of the stamp
/// - legacy_bits: denomination agreed for version 0 stamps
///
/// Returns 1 if valid, 0 if the digest falls short, -1 if the input is null
/// or not a stamp.
///
/// # Safety
///
/// A non-null `stamp` must point to `stamp_len` initialized bytes that stay
/// valid and unmodified for the duration of the call.
#[unsafe(no_mangle)]
pub extern "C" fn hashcash_verify(stamp: *const u8, stamp_len: usize, legacy_bits: u32) -> i32 {
    if stamp.is_null() {
        return -1;
    }

    // SAFETY: caller guarantees `stamp` points to `stamp_len` readable bytes
    let bytes = unsafe { slice::from_raw_parts(stamp, stamp_len) };
    let Ok(text) = core::str::from_utf8(bytes) else {
        return -1;
    };

    match Verifier::new().with_legacy_bits(legacy_bits).check(text) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(_) => -1,
    }
}

/// Leading zero bits of the SHA-1 digest of `input`, or -1 on a null pointer
///
/// # Safety
///
/// A non-null `input` must point to `input_len` initialized bytes that stay
/// valid and unmodified for the duration of the call.
#[unsafe(no_mangle)]
pub extern "C" fn hashcash_leading_zero_bits(input: *const u8, input_len: usize) -> i32 {
    if input.is_null() {
        return -1;
    }

    // SAFETY: caller guarantees `input` points to `input_len` readable bytes
    let bytes = unsafe { slice::from_raw_parts(input, input_len) };
    leading_zero_bits(&digest(bytes)) as i32
}
