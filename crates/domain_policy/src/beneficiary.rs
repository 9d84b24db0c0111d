//! Policy beneficiaries

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// A person designated to receive benefits under a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    /// Relationship to the policy owner (spouse, child, ...)
    pub relationship: String,
    /// Share of benefits in percent
    pub share_percent: Decimal,
}

impl Beneficiary {
    pub fn new(
        name: impl Into<String>,
        relationship: impl Into<String>,
        share_percent: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            share_percent,
        }
    }
}

/// Validates a beneficiary designation
///
/// Names and relationships must be non-empty, every share must lie in
/// (0, 100] and the shares together may not exceed 100%.
pub fn validate_beneficiaries(beneficiaries: &[Beneficiary]) -> Result<(), PolicyError> {
    let mut total = Decimal::ZERO;

    for (idx, b) in beneficiaries.iter().enumerate() {
        if b.name.trim().is_empty() {
            return Err(PolicyError::beneficiary(format!(
                "beneficiary {} has no name",
                idx + 1
            )));
        }
        if b.relationship.trim().is_empty() {
            return Err(PolicyError::beneficiary(format!(
                "beneficiary '{}' has no relationship",
                b.name
            )));
        }
        if b.share_percent <= Decimal::ZERO || b.share_percent > dec!(100) {
            return Err(PolicyError::beneficiary(format!(
                "share for '{}' must be between 0 and 100, got {}",
                b.name, b.share_percent
            )));
        }
        total += b.share_percent;
    }

    if total > dec!(100) {
        return Err(PolicyError::beneficiary(format!(
            "shares total {}%, at most 100% allowed",
            total
        )));
    }

    Ok(())
}
