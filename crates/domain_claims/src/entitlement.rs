//! Entitlement computation
//!
//! Splits an approved claim amount between the insurer and the patient
//! according to the plan's cost-sharing terms and what the policy has
//! already consumed in earlier claims.
//!
//! ```text
//! deductible_applied = min(A, max(D - deductible_met, 0))
//! coinsurance        = (A - deductible_applied) * copay
//! patient_share      = min(deductible_applied + coinsurance, max(M - out_of_pocket, 0))
//! insurer_share      = min(A - patient_share, max(C - insurer_paid, 0))
//! uncovered          = A - patient_share - insurer_share
//! ```
//!
//! `uncovered` is what is left once coverage is exhausted. The patient owes
//! it but it does not count toward the out-of-pocket maximum.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, Rate};

use crate::claim::Claim;
use crate::error::ClaimError;

/// Cost-sharing terms of the plan behind a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSharingTerms {
    pub coverage_amount: Money,
    pub deductible: Money,
    pub copay: Rate,
    pub max_out_of_pocket: Option<Money>,
}

impl CostSharingTerms {
    pub fn currency(&self) -> Currency {
        self.coverage_amount.currency()
    }
}

/// What a policy has consumed through previously approved or paid claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulators {
    pub deductible_met: Money,
    pub patient_out_of_pocket: Money,
    pub insurer_paid: Money,
}

impl Accumulators {
    pub fn zero(currency: Currency) -> Self {
        Self {
            deductible_met: Money::zero(currency),
            patient_out_of_pocket: Money::zero(currency),
            insurer_paid: Money::zero(currency),
        }
    }

    /// Sums the splits of every approved or paid claim in `claims`
    pub fn from_claims<'a>(
        currency: Currency,
        claims: impl IntoIterator<Item = &'a Claim>,
    ) -> Result<Self, ClaimError> {
        let mut acc = Self::zero(currency);
        for split in claims
            .into_iter()
            .filter(|c| c.status.counts_toward_accumulators())
            .filter_map(|c| c.entitlement.as_ref())
        {
            acc.deductible_met = acc.deductible_met.checked_add(&split.deductible_applied)?;
            acc.patient_out_of_pocket =
                acc.patient_out_of_pocket.checked_add(&split.patient_share)?;
            acc.insurer_paid = acc.insurer_paid.checked_add(&split.insurer_share)?;
        }
        Ok(acc)
    }
}

/// The insurer/patient split of one approved claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementSplit {
    pub approved_amount: Money,
    pub deductible_applied: Money,
    pub coinsurance: Money,
    /// Deductible plus coinsurance after the out-of-pocket cap
    pub patient_share: Money,
    pub insurer_share: Money,
    /// Approved amount beyond the remaining coverage
    pub uncovered: Money,
}

impl EntitlementSplit {
    /// Everything the patient owes for this claim
    pub fn patient_responsibility(&self) -> Money {
        self.patient_share + self.uncovered
    }
}

/// Coverage still available to a policy
pub fn remaining_coverage(
    terms: &CostSharingTerms,
    acc: &Accumulators,
) -> Result<Money, ClaimError> {
    Ok(terms.coverage_amount.checked_sub(&acc.insurer_paid)?.floor_zero())
}

/// Computes the split for an approved amount
///
/// # Errors
///
/// * `InvalidAmount` - negative approved amount
/// * `Financial` - currency mismatch between the amount and the terms
pub fn compute_entitlement(
    approved: Money,
    terms: &CostSharingTerms,
    acc: &Accumulators,
) -> Result<EntitlementSplit, ClaimError> {
    if approved.is_negative() {
        return Err(ClaimError::invalid_amount("approved amount must not be negative"));
    }
    let approved = approved.round_to_currency();

    let deductible_left = terms.deductible.checked_sub(&acc.deductible_met)?.floor_zero();
    let deductible_applied = approved.checked_min(&deductible_left)?;

    let coinsurance = terms
        .copay
        .apply(&approved.checked_sub(&deductible_applied)?)
        .round_to_currency();

    let mut patient_share = deductible_applied.checked_add(&coinsurance)?;
    if let Some(max_oop) = terms.max_out_of_pocket {
        let oop_left = max_oop.checked_sub(&acc.patient_out_of_pocket)?.floor_zero();
        patient_share = patient_share.checked_min(&oop_left)?;
    }

    let insurer_share = approved
        .checked_sub(&patient_share)?
        .checked_min(&remaining_coverage(terms, acc)?)?;

    let uncovered = approved
        .checked_sub(&patient_share)?
        .checked_sub(&insurer_share)?;

    Ok(EntitlementSplit {
        approved_amount: approved,
        deductible_applied,
        coinsurance,
        patient_share,
        insurer_share,
        uncovered,
    })
}
