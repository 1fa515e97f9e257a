//! End-to-end tests: mint with both layouts, verify independently.

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::{
    DEFAULT_BITS, HashcashError, MintRequest, Minter, Predicate, SearchLimits, Stamp, StampFormat,
    Verifier, digest, hashcash_leading_zero_bits, hashcash_verify, leading_zero_bits, mint, verify,
};

/// Reference stamp with exactly 20 leading zero bits
const REFERENCE: &str = "1:20:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi";

const RESOURCE: &str = "foo.bar@foobar.com";

fn fixed_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2011, 3, 3)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .unwrap()
}

#[test]
fn test_reference_vector() {
    assert!(verify(REFERENCE));
    assert_eq!(leading_zero_bits(&digest(REFERENCE.as_bytes())), 20);
}

#[test]
fn test_version0_round_trip() {
    for (seed, bits) in [(1, 0), (2, 4), (3, 8), (4, 12)] {
        let request = MintRequest::new(RESOURCE, bits, fixed_date(), StampFormat::Version0);
        let minted = Minter::from_seed(seed)
            .mint(&request, &SearchLimits::default())
            .unwrap();

        let verifier = Verifier::new().with_legacy_bits(bits);
        assert!(verifier.verify(&minted.stamp), "{minted}");
        assert!(minted.attempts >= 1);
    }
}

#[test]
fn test_version1_round_trip() {
    for (seed, bits) in [(1, 16), (2, 16), (3, 17)] {
        let request = MintRequest::new(RESOURCE, bits, fixed_date(), StampFormat::Version1);
        let minted = Minter::from_seed(seed)
            .mint(&request, &SearchLimits::default())
            .unwrap();

        // The verifier reads the denomination from the stamp itself.
        assert!(verify(&minted.stamp), "{minted}");

        let stamp = Stamp::parse(&minted.stamp).unwrap();
        assert_eq!(stamp.bits(), Some(bits));
        assert_eq!(stamp.date_text(), "110303");
        assert_eq!(stamp.resource(), RESOURCE);
        assert_eq!(stamp.fields()[4], "");
    }
}

#[test]
fn test_version0_default_denomination_scenario() {
    // The legacy scenario: 20 bits, minted now, checked right away.
    let now = Utc::now().naive_utc();
    let minted = mint(RESOURCE, DEFAULT_BITS, now, StampFormat::Version0).unwrap();

    assert!(verify(&minted.stamp));
    assert!(minted.attempts > 0);
    assert!(minted.attempts <= 1 << 32);
    assert!(minted.stamp.starts_with("0:"));
}

/// Average attempts over many fixed seeds, for a geometric cost check.
fn mean_attempts(format: StampFormat, bits: u32, seeds: u64) -> f64 {
    let request = MintRequest::new(RESOURCE, bits, fixed_date(), format);
    let total: u64 = (0..seeds)
        .map(|seed| {
            Minter::from_seed(seed)
                .mint(&request, &SearchLimits::default())
                .unwrap()
                .attempts
        })
        .sum();
    total as f64 / seeds as f64
}

#[test]
fn test_attempts_average_two_to_the_bits() {
    // 400 geometric samples put the mean within a few percent; 25% is slack.
    for (format, bits) in [(StampFormat::Version0, 10), (StampFormat::Version1, 16)] {
        let expected = (1u64 << bits) as f64;
        let mean = mean_attempts(format, bits, 400);
        assert!(
            (mean - expected).abs() <= expected / 4.0,
            "version {format} at {bits} bits: mean {mean}, expected about {expected}"
        );
    }
}

#[test]
fn test_minted_stamp_verifies_at_its_own_bits() {
    for bits in [8, 12, 16] {
        let minted = mint(RESOURCE, bits, fixed_date(), StampFormat::Version0).unwrap();
        assert!(minted.verifier().verify(&minted.stamp), "{minted}");
        assert_eq!(verify(&minted.stamp), leading_zero_bits(&minted.digest) >= DEFAULT_BITS);
    }
}

#[test]
fn test_different_seeds_different_stamps() {
    let request = MintRequest::new(RESOURCE, 10, fixed_date(), StampFormat::Version0);
    let a = Minter::from_seed(100)
        .mint(&request, &SearchLimits::default())
        .unwrap();
    let b = Minter::from_seed(200)
        .mint(&request, &SearchLimits::default())
        .unwrap();

    assert_ne!(a.stamp, b.stamp);
    let verifier = Verifier::new().with_legacy_bits(10);
    assert!(verifier.verify(&a.stamp));
    assert!(verifier.verify(&b.stamp));
}

#[test]
fn test_minted_digest_matches_both_predicates() {
    let request = MintRequest::new(RESOURCE, 16, fixed_date(), StampFormat::Version1);
    let minted = Minter::from_seed(8)
        .mint(&request, &SearchLimits::default())
        .unwrap();

    assert_eq!(digest(minted.stamp.as_bytes()), minted.digest);
    for predicate in [Predicate::PrefixMask, Predicate::LeadingZeroCount] {
        assert!(predicate.passes(&minted.digest, 16));
    }
}

#[test]
fn test_forged_denomination_fails() {
    let request = MintRequest::new(RESOURCE, 16, fixed_date(), StampFormat::Version1);
    let minted = Minter::from_seed(21)
        .mint(&request, &SearchLimits::default())
        .unwrap();
    let surplus = leading_zero_bits(&minted.digest);

    // Claiming more bits rewrites the hashed text as well, so only an
    // astronomically lucky digest would still pass.
    let forged = minted
        .stamp
        .replacen(":16:", &format!(":{}:", surplus + 8), 1);
    assert!(!verify(&forged));
}

#[test]
fn test_deadline_bounds_version1() {
    let request = MintRequest::new(RESOURCE, 32, fixed_date(), StampFormat::Version1);
    let limits = SearchLimits::default().with_deadline(std::time::Instant::now());
    let err = Minter::from_seed(5).mint(&request, &limits).unwrap_err();

    assert!(matches!(err, HashcashError::SearchExhausted { .. }));
}

#[test]
fn test_ffi_verify() {
    assert_eq!(hashcash_verify(REFERENCE.as_ptr(), REFERENCE.len(), 20), 1);

    let forged = REFERENCE.replacen(":20:", ":24:", 1);
    assert_eq!(hashcash_verify(forged.as_ptr(), forged.len(), 20), 0);

    let garbage = b"not a stamp";
    assert_eq!(hashcash_verify(garbage.as_ptr(), garbage.len(), 20), -1);
    assert_eq!(hashcash_verify(core::ptr::null(), 0, 20), -1);
}

#[test]
fn test_ffi_leading_zero_bits() {
    assert_eq!(
        hashcash_leading_zero_bits(REFERENCE.as_ptr(), REFERENCE.len()),
        20
    );
    assert_eq!(hashcash_leading_zero_bits(core::ptr::null(), 0), -1);
}
