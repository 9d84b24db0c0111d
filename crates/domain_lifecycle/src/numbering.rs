//! Human-readable record numbers
//!
//! Policies, claims and payments carry a number such as `POL0123456789`
//! alongside their UUID. Numbers are assigned once at creation; uniqueness is
//! ultimately enforced by the store, which rejects a duplicate with a conflict.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

const NUMBER_SPACE: u128 = 10_000_000_000;

/// The kind of record being numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Policy,
    Claim,
    Payment,
}

impl NumberKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            NumberKind::Policy => "POL",
            NumberKind::Claim => "CLM",
            NumberKind::Payment => "PAY",
        }
    }
}

/// Supplies numbers for new records
pub trait NumberGenerator: Send + Sync {
    fn next_number(&self, kind: NumberKind) -> String;
}

/// Prefix plus ten digits taken from a random v4 UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNumberGenerator;

impl NumberGenerator for RandomNumberGenerator {
    fn next_number(&self, kind: NumberKind) -> String {
        let digits = Uuid::new_v4().as_u128() % NUMBER_SPACE;
        format!("{}{:010}", kind.prefix(), digits)
    }
}

/// Deterministic counter, shared across kinds
#[derive(Debug, Default)]
pub struct SequentialNumberGenerator {
    counter: AtomicU64,
}

impl SequentialNumberGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NumberGenerator for SequentialNumberGenerator {
    fn next_number(&self, kind: NumberKind) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{:010}", kind.prefix(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_numbers_have_prefix_and_ten_digits() {
        let gen = RandomNumberGenerator;
        for kind in [NumberKind::Policy, NumberKind::Claim, NumberKind::Payment] {
            let number = gen.next_number(kind);
            assert!(number.starts_with(kind.prefix()));
            assert_eq!(number.len(), 13);
            assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_sequential_numbers_increase() {
        let gen = SequentialNumberGenerator::new();
        assert_eq!(gen.next_number(NumberKind::Policy), "POL0000000001");
        assert_eq!(gen.next_number(NumberKind::Claim), "CLM0000000002");
    }
}
