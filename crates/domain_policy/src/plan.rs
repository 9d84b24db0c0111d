//! Insurance plan catalog entries
//!
//! A plan fixes the price and cost-sharing terms that every policy issued
//! against it inherits: premiums, the coverage ceiling, the deductible, the
//! copay (coinsurance) percentage and an optional out-of-pocket maximum.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money, PlanId, Rate};

use crate::error::PolicyError;
use crate::policy::PaymentFrequency;

/// Plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Basic,
    Standard,
    Premium,
    Enterprise,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Basic => "basic",
            PlanType::Standard => "standard",
            PlanType::Premium => "premium",
            PlanType::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(PlanType::Basic),
            "standard" => Ok(PlanType::Standard),
            "premium" => Ok(PlanType::Premium),
            "enterprise" => Ok(PlanType::Enterprise),
            other => Err(PolicyError::validation(format!("unknown plan type: {}", other))),
        }
    }
}

/// A benefit line advertised by a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Per-benefit limit, if any
    #[serde(default)]
    pub limit: Option<Decimal>,
}

/// Input for creating a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub plan_type: PlanType,
    #[serde(default)]
    pub description: Option<String>,
    pub monthly_premium: Decimal,
    pub annual_premium: Decimal,
    pub coverage_amount: Decimal,
    #[serde(default)]
    pub deductible: Decimal,
    #[serde(default = "default_copay")]
    pub copay_percentage: Decimal,
    #[serde(default)]
    pub max_out_of_pocket: Option<Decimal>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub currency: Currency,
}

fn default_copay() -> Decimal {
    dec!(20)
}

/// An insurance plan offered in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub id: PlanId,
    pub name: String,
    pub plan_type: PlanType,
    pub description: Option<String>,
    pub monthly_premium: Money,
    pub annual_premium: Money,
    pub coverage_amount: Money,
    pub deductible: Money,
    /// Patient coinsurance share in percent
    pub copay_percentage: Decimal,
    pub max_out_of_pocket: Option<Money>,
    pub benefits: Vec<Benefit>,
    pub exclusions: Vec<String>,
    pub is_active: bool,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InsurancePlan {
    /// Creates an active plan after checking the catalog invariants
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - premiums or coverage not positive, an amount above
    ///   [`core_kernel::MAX_AMOUNT`], negative deductible or deductible above
    ///   coverage, copay outside 0-100, or out-of-pocket max below the deductible
    /// * `Validation` - blank name or blank benefit/exclusion entries
    pub fn create(input: NewPlan) -> Result<Self, PolicyError> {
        if input.name.trim().is_empty() {
            return Err(PolicyError::validation("plan name must not be empty"));
        }
        let currency = input.currency;
        let monthly_premium = positive("monthly premium", input.monthly_premium, currency)?;
        let annual_premium = positive("annual premium", input.annual_premium, currency)?;
        let coverage_amount = positive("coverage amount", input.coverage_amount, currency)?;
        let deductible = non_negative("deductible", input.deductible, currency)?;
        if deductible.amount() > coverage_amount.amount() {
            return Err(PolicyError::invalid_amount(
                "deductible must not exceed the coverage amount",
            ));
        }
        if !Rate::from_percentage(input.copay_percentage).is_proportion() {
            return Err(PolicyError::invalid_amount(format!(
                "copay percentage must be between 0 and 100, got {}",
                input.copay_percentage
            )));
        }
        let max_out_of_pocket = input
            .max_out_of_pocket
            .map(|m| non_negative("max out-of-pocket", m, currency))
            .transpose()?;
        if max_out_of_pocket.is_some_and(|m| m.amount() < deductible.amount()) {
            return Err(PolicyError::invalid_amount(
                "max out-of-pocket must not be below the deductible",
            ));
        }
        if input.benefits.iter().any(|b| b.name.trim().is_empty()) {
            return Err(PolicyError::validation("benefit names must not be empty"));
        }
        for limit in input.benefits.iter().filter_map(|b| b.limit) {
            non_negative("benefit limit", limit, currency)?;
        }
        if input.exclusions.iter().any(|e| e.trim().is_empty()) {
            return Err(PolicyError::validation("exclusions must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: PlanId::new_v7(),
            name: input.name.trim().to_string(),
            plan_type: input.plan_type,
            description: input.description,
            monthly_premium,
            annual_premium,
            coverage_amount,
            deductible,
            copay_percentage: input.copay_percentage,
            max_out_of_pocket,
            benefits: input.benefits,
            exclusions: input.exclusions,
            is_active: true,
            currency,
            created_at: now,
            updated_at: now,
        })
    }

    /// Copay as a rate
    pub fn copay_rate(&self) -> Rate {
        Rate::from_percentage(self.copay_percentage)
    }

    /// Premium charged for the given payment frequency
    pub fn premium_for(&self, frequency: PaymentFrequency) -> Money {
        match frequency {
            PaymentFrequency::Monthly => self.monthly_premium,
            PaymentFrequency::Annual => self.annual_premium,
        }
    }

    /// Retires the plan from the catalog; existing policies are unaffected
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

fn positive(field: &str, amount: Decimal, currency: Currency) -> Result<Money, PolicyError> {
    Money::positive_input(amount, currency)
        .map_err(|e| PolicyError::invalid_amount(format!("{}: {}", field, e)))
}

fn non_negative(field: &str, amount: Decimal, currency: Currency) -> Result<Money, PolicyError> {
    Money::non_negative_input(amount, currency)
        .map_err(|e| PolicyError::invalid_amount(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_plan() -> NewPlan {
        NewPlan {
            name: "Silver".to_string(),
            plan_type: PlanType::Standard,
            description: None,
            monthly_premium: dec!(200),
            annual_premium: dec!(2200),
            coverage_amount: dec!(1000),
            deductible: dec!(0),
            copay_percentage: dec!(20),
            max_out_of_pocket: None,
            benefits: vec![],
            exclusions: vec![],
            currency: Currency::USD,
        }
    }

    #[test]
    fn test_premium_by_frequency() {
        let plan = InsurancePlan::create(new_plan()).unwrap();
        assert_eq!(plan.premium_for(PaymentFrequency::Monthly).amount(), dec!(200));
        assert_eq!(plan.premium_for(PaymentFrequency::Annual).amount(), dec!(2200));
    }

    #[test]
    fn test_copay_bounds() {
        let mut input = new_plan();
        input.copay_percentage = dec!(101);
        assert!(matches!(
            InsurancePlan::create(input),
            Err(PolicyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_deductible_above_coverage_rejected() {
        let mut input = new_plan();
        input.deductible = dec!(1000.01);
        assert!(matches!(
            InsurancePlan::create(input),
            Err(PolicyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_premium_rounding_to_zero_rejected() {
        let mut input = new_plan();
        input.monthly_premium = dec!(0.004);
        assert!(matches!(
            InsurancePlan::create(input),
            Err(PolicyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_coverage_above_maximum_rejected() {
        let mut input = new_plan();
        input.coverage_amount = Decimal::MAX;
        assert!(matches!(
            InsurancePlan::create(input),
            Err(PolicyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_copay_default_when_omitted() {
        let json = r#"{
            "name": "Bronze", "plan_type": "basic",
            "monthly_premium": "50", "annual_premium": "550", "coverage_amount": "5000"
        }"#;
        let input: NewPlan = serde_json::from_str(json).unwrap();
        assert_eq!(input.copay_percentage, dec!(20));
        assert_eq!(input.deductible, Decimal::ZERO);
    }
}
