//! Policy aggregate
//!
//! A policy is a customer's enrollment in a plan for one coverage term.
//!
//! # Invariants
//!
//! - `end_date = start_date + term` is fixed at issuance
//! - `premium_amount` is fixed at issuance and never changes
//! - Status changes follow the transition table in [`PolicyStatus::can_transition_to`]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{CoveragePeriod, Currency, Money, PlanId, PolicyId, UserId};

use crate::beneficiary::{validate_beneficiaries, Beneficiary};
use crate::error::PolicyError;
use crate::plan::InsurancePlan;

/// Policy lifecycle status
///
/// ```text
/// pending -> active -> expired
///                   \-> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "pending",
            PolicyStatus::Active => "active",
            PolicyStatus::Expired => "expired",
            PolicyStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PolicyStatus::Expired | PolicyStatus::Cancelled)
    }

    /// Allowed source/target pairs
    pub fn can_transition_to(&self, target: PolicyStatus) -> bool {
        use PolicyStatus::*;
        matches!(
            (self, target),
            (Pending, Active) |
            (Active, Expired) |
            (Active, Cancelled)
        )
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PolicyStatus::Pending),
            "active" => Ok(PolicyStatus::Active),
            "expired" => Ok(PolicyStatus::Expired),
            "cancelled" => Ok(PolicyStatus::Cancelled),
            other => Err(PolicyError::validation(format!("unknown policy status: {}", other))),
        }
    }
}

/// How often the policy premium is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Monthly,
    Annual,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Annual => "annual",
        }
    }
}

impl Default for PaymentFrequency {
    fn default() -> Self {
        PaymentFrequency::Monthly
    }
}

impl FromStr for PaymentFrequency {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "annual" => Ok(PaymentFrequency::Annual),
            other => Err(PolicyError::validation(format!("unknown payment frequency: {}", other))),
        }
    }
}

/// Everything needed to issue a policy besides the plan itself
#[derive(Debug, Clone)]
pub struct PolicyTerms {
    pub policy_number: String,
    pub owner_id: UserId,
    pub start_date: NaiveDate,
    pub frequency: PaymentFrequency,
    pub beneficiaries: Vec<Beneficiary>,
    pub term_days: i64,
}

/// A policy issued against an insurance plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub owner_id: UserId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
    pub premium_amount: Money,
    pub payment_frequency: PaymentFrequency,
    pub beneficiaries: Vec<Beneficiary>,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Issues a new pending policy
    ///
    /// # Errors
    ///
    /// * `PlanUnavailable` - the plan has been retired
    /// * `BeneficiaryError` - the beneficiary designation is invalid
    /// * `Period` - the term cannot be represented
    pub fn issue(plan: &InsurancePlan, terms: PolicyTerms) -> Result<Self, PolicyError> {
        if !plan.is_active {
            return Err(PolicyError::PlanUnavailable(plan.id.to_string()));
        }
        validate_beneficiaries(&terms.beneficiaries)?;

        let period = CoveragePeriod::from_start(terms.start_date, terms.term_days)?;
        let now = Utc::now();

        Ok(Self {
            id: PolicyId::new_v7(),
            policy_number: terms.policy_number,
            owner_id: terms.owner_id,
            plan_id: plan.id,
            start_date: period.start(),
            end_date: period.end(),
            status: PolicyStatus::Pending,
            premium_amount: plan.premium_for(terms.frequency),
            payment_frequency: terms.frequency,
            beneficiaries: terms.beneficiaries,
            currency: plan.currency,
            created_at: now,
            updated_at: now,
        })
    }

    /// Coverage period rebuilt from the stored bounds
    pub fn period(&self) -> Result<CoveragePeriod, PolicyError> {
        Ok(CoveragePeriod::new(self.start_date, self.end_date)?)
    }

    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Moves the policy from pending to active
    pub fn activate(&mut self) -> Result<(), PolicyError> {
        self.transition_to(PolicyStatus::Active)
    }

    /// Cancels an active policy
    pub fn cancel(&mut self) -> Result<(), PolicyError> {
        self.transition_to(PolicyStatus::Cancelled)
    }

    /// Expires an active policy whose term has run out by `today`
    pub fn expire(&mut self, today: NaiveDate) -> Result<(), PolicyError> {
        if !self.status.can_transition_to(PolicyStatus::Expired) {
            return Err(self.invalid_transition(PolicyStatus::Expired));
        }
        if !self.period()?.has_lapsed(today) {
            return Err(PolicyError::NotYetExpired {
                end_date: self.end_date,
            });
        }
        self.transition_to(PolicyStatus::Expired)
    }

    fn transition_to(&mut self, target: PolicyStatus) -> Result<(), PolicyError> {
        if !self.status.can_transition_to(target) {
            return Err(self.invalid_transition(target));
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn invalid_transition(&self, target: PolicyStatus) -> PolicyError {
        PolicyError::InvalidStateTransition {
            from: self.status.to_string(),
            to: target.to_string(),
        }
    }
}
