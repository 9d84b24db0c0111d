//! Claim aggregate

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, Currency, Money, PolicyId, UserId};

use crate::entitlement::{
    compute_entitlement, remaining_coverage, Accumulators, CostSharingTerms, EntitlementSplit,
};
use crate::error::ClaimError;

/// Claim status
///
/// ```text
/// submitted -> under_review -> approved -> paid
///          \               \-> rejected
///           \-> approved / rejected (direct decision)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Received, awaiting a reviewer
    Submitted,
    /// Picked up by a reviewer
    UnderReview,
    /// Approved for payment
    Approved,
    /// Denied
    Rejected,
    /// Settled
    Paid,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::Submitted,
        ClaimStatus::UnderReview,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::UnderReview => "under_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Paid => "paid",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Rejected | ClaimStatus::Paid)
    }

    /// Approved and paid claims consume the policy's deductible and coverage
    pub fn counts_toward_accumulators(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Paid)
    }

    /// Allowed source/target pairs
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Submitted, UnderReview)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Paid)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ClaimError::validation(format!("unknown claim status: {}", s)))
    }
}

/// Claim submission input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClaim {
    pub policy_id: PolicyId,
    pub service_date: NaiveDate,
    pub provider_name: String,
    #[serde(default)]
    pub diagnosis_code: Option<String>,
    #[serde(default)]
    pub procedure_code: Option<String>,
    pub claimed_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A reviewer's decision on a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub status: ClaimStatus,
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A claim against a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub claim_number: String,
    /// Owner of the policy the claim is made against
    pub owner_id: UserId,
    /// Caller who filed the claim
    pub submitted_by: UserId,
    pub policy_id: PolicyId,
    pub claim_date: DateTime<Utc>,
    pub service_date: NaiveDate,
    pub provider_name: String,
    pub diagnosis_code: Option<String>,
    pub procedure_code: Option<String>,
    pub claimed_amount: Money,
    pub approved_amount: Option<Money>,
    pub entitlement: Option<EntitlementSplit>,
    pub status: ClaimStatus,
    pub notes: Option<String>,
    pub reviewed_by: Option<UserId>,
    pub review_date: Option<DateTime<Utc>>,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Files a new claim in `submitted` status
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - claimed amount not greater than zero once rounded
    ///   to the currency, or above [`core_kernel::MAX_AMOUNT`]
    /// * `Validation` - blank provider name
    pub fn submit(
        claim_number: String,
        owner_id: UserId,
        submitted_by: UserId,
        input: NewClaim,
        currency: Currency,
    ) -> Result<Self, ClaimError> {
        let claimed_amount = Money::positive_input(input.claimed_amount, currency)
            .map_err(|e| ClaimError::invalid_amount(format!("claimed amount: {}", e)))?;
        if input.provider_name.trim().is_empty() {
            return Err(ClaimError::validation("provider name must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number,
            owner_id,
            submitted_by,
            policy_id: input.policy_id,
            claim_date: now,
            service_date: input.service_date,
            provider_name: input.provider_name.trim().to_string(),
            diagnosis_code: input.diagnosis_code,
            procedure_code: input.procedure_code,
            claimed_amount,
            approved_amount: None,
            entitlement: None,
            status: ClaimStatus::Submitted,
            notes: input.notes,
            reviewed_by: None,
            review_date: None,
            currency,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a reviewer decision
    ///
    /// `terms` and `acc` describe the policy's plan and its prior consumption;
    /// they are only used when the decision approves the claim. Nothing on the
    /// claim changes unless every check passes.
    ///
    /// # Errors
    ///
    /// * `InvalidStatusTransition` - pair not in the transition table
    /// * `InvalidAmount` - approved amount negative, above the claimed amount,
    ///   or supplied with a non-approval decision
    pub fn review(
        &mut self,
        reviewer: UserId,
        decision: ReviewDecision,
        terms: &CostSharingTerms,
        acc: &Accumulators,
    ) -> Result<(), ClaimError> {
        let target = decision.status;
        if !self.status.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        if target != ClaimStatus::Approved && decision.approved_amount.is_some() {
            return Err(ClaimError::invalid_amount(format!(
                "approved amount only applies to approval, not {}",
                target
            )));
        }

        let (approved_amount, entitlement) = match target {
            ClaimStatus::Approved => {
                let amount = match decision.approved_amount {
                    Some(value) => self.checked_approval(value)?,
                    None => self.claimed_amount.checked_min(&remaining_coverage(terms, acc)?)?,
                };
                let split = compute_entitlement(amount, terms, acc)?;
                (Some(split.approved_amount), Some(split))
            }
            ClaimStatus::Rejected => (Some(Money::zero(self.currency)), None),
            _ => (self.approved_amount, self.entitlement),
        };

        let now = Utc::now();
        self.status = target;
        self.approved_amount = approved_amount;
        self.entitlement = entitlement;
        if decision.notes.is_some() {
            self.notes = decision.notes;
        }
        self.reviewed_by = Some(reviewer);
        self.review_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn checked_approval(&self, value: Decimal) -> Result<Money, ClaimError> {
        let amount = Money::non_negative_input(value, self.currency)
            .map_err(|e| ClaimError::invalid_amount(format!("approved amount: {}", e)))?;
        if amount.amount() > self.claimed_amount.amount() {
            return Err(ClaimError::invalid_amount(format!(
                "approved amount {} exceeds claimed amount {}",
                amount.amount(),
                self.claimed_amount.amount()
            )));
        }
        Ok(amount)
    }

    /// Patient share recorded at approval, zero otherwise
    pub fn patient_share(&self) -> Money {
        self.entitlement
            .map(|s| s.patient_responsibility())
            .unwrap_or_else(|| Money::zero(self.currency))
    }
}
