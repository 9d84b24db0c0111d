//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_claims::EntitlementSplit;
use domain_lifecycle::{ErrorKind, LifecycleError};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value has exactly the given amount
pub fn assert_amount(money: &Money, expected: Decimal) {
    assert_eq!(
        money.amount(),
        expected,
        "Expected {} {}, got {}",
        money.currency().symbol(),
        expected,
        money
    );
}

/// Asserts the accounting identities of an entitlement split
///
/// Patient share, insurer share and the uncovered remainder add up to the
/// approved amount, and no part is negative.
pub fn assert_split_balances(split: &EntitlementSplit) {
    for (label, part) in [
        ("patient_share", split.patient_share),
        ("insurer_share", split.insurer_share),
        ("uncovered", split.uncovered),
    ] {
        assert!(!part.is_negative(), "{} is negative: {}", label, part);
    }

    let total =
        split.patient_share.amount() + split.insurer_share.amount() + split.uncovered.amount();
    assert_eq!(
        total,
        split.approved_amount.amount(),
        "Split does not balance: patient={} insurer={} uncovered={} approved={}",
        split.patient_share,
        split.insurer_share,
        split.uncovered,
        split.approved_amount
    );
}

/// Asserts that a result failed with the given error kind
pub fn assert_error_kind<T: std::fmt::Debug>(
    result: Result<T, LifecycleError>,
    expected: ErrorKind,
) {
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok({:?})", expected, value),
        Err(err) => assert_eq!(
            err.kind(),
            expected,
            "Expected {:?} error, got {:?}: {}",
            expected,
            err.kind(),
            err
        ),
    }
}
