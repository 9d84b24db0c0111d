//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{Currency, PolicyId};
use domain_claims::NewClaim;
use domain_policy::{NewPlan, PlanType};
use rust_decimal::Decimal;

use crate::fixtures::{ClaimFixtures, PlanFixtures};

/// Builder for plan creation input
pub struct TestPlanBuilder {
    plan: NewPlan,
}

impl Default for TestPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPlanBuilder {
    /// Starts from the standard plan fixture
    pub fn new() -> Self {
        Self {
            plan: PlanFixtures::standard(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.plan.name = name.into();
        self
    }

    pub fn with_plan_type(mut self, plan_type: PlanType) -> Self {
        self.plan.plan_type = plan_type;
        self
    }

    /// Sets both premiums
    pub fn with_premiums(mut self, monthly: Decimal, annual: Decimal) -> Self {
        self.plan.monthly_premium = monthly;
        self.plan.annual_premium = annual;
        self
    }

    pub fn with_coverage(mut self, coverage: Decimal) -> Self {
        self.plan.coverage_amount = coverage;
        self
    }

    pub fn with_deductible(mut self, deductible: Decimal) -> Self {
        self.plan.deductible = deductible;
        self
    }

    /// Sets the patient coinsurance in percent
    pub fn with_copay(mut self, percentage: Decimal) -> Self {
        self.plan.copay_percentage = percentage;
        self
    }

    pub fn with_max_out_of_pocket(mut self, max: Decimal) -> Self {
        self.plan.max_out_of_pocket = Some(max);
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.plan.currency = currency;
        self
    }

    pub fn build(self) -> NewPlan {
        self.plan
    }
}

/// Builder for claim submission input
pub struct TestClaimBuilder {
    claim: NewClaim,
}

impl TestClaimBuilder {
    /// Starts from an office visit against `policy_id`
    pub fn new(policy_id: PolicyId, amount: Decimal) -> Self {
        Self {
            claim: ClaimFixtures::office_visit(policy_id, amount),
        }
    }

    pub fn with_service_date(mut self, date: NaiveDate) -> Self {
        self.claim.service_date = date;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.claim.provider_name = provider.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.claim.notes = Some(notes.into());
        self
    }

    /// Drops the diagnosis and procedure codes
    pub fn without_codes(mut self) -> Self {
        self.claim.diagnosis_code = None;
        self.claim.procedure_code = None;
        self
    }

    pub fn build(self) -> NewClaim {
        self.claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_builder_overrides_only_given_fields() {
        let plan = TestPlanBuilder::new()
            .with_deductible(dec!(250))
            .with_max_out_of_pocket(dec!(800))
            .build();

        assert_eq!(plan.deductible, dec!(250));
        assert_eq!(plan.max_out_of_pocket, Some(dec!(800)));
        assert_eq!(plan.coverage_amount, dec!(1000));
    }

    #[test]
    fn test_claim_builder_without_codes() {
        let claim = TestClaimBuilder::new(PolicyId::new(), dec!(75))
            .without_codes()
            .build();

        assert!(claim.diagnosis_code.is_none());
        assert_eq!(claim.claimed_amount, dec!(75));
    }
}
