//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the insurance system.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, PolicyId};
use domain_billing::{NewPayment, PaymentMethod};
use domain_claims::{ClaimStatus, NewClaim, ReviewDecision};
use domain_identity::{NewUser, UserRole};
use domain_policy::{Benefit, NewPlan, PlanType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a standard USD amount for testing
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// Monthly premium of the standard plan
    pub fn usd_monthly_premium() -> Money {
        Money::new(dec!(200.00), Currency::USD)
    }

    /// Coverage limit of the standard plan
    pub fn usd_coverage() -> Money {
        Money::new(dec!(1000.00), Currency::USD)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for calendar dates
pub struct DateFixtures;

impl DateFixtures {
    /// Standard policy start date (Jan 1, 2024)
    pub fn policy_start() -> NaiveDate {
        date(2024, 1, 1)
    }

    /// End date of a 365-day term starting on [`DateFixtures::policy_start`]
    pub fn policy_end() -> NaiveDate {
        date(2024, 12, 31)
    }

    /// A service date inside the standard term
    pub fn service_date() -> NaiveDate {
        date(2024, 3, 10)
    }
}

/// Fixture for string identifiers and free text
pub struct StringFixtures;

impl StringFixtures {
    pub fn provider_name() -> &'static str {
        "City Clinic"
    }

    /// ICD-10 code for acute bronchitis
    pub fn diagnosis_code() -> &'static str {
        "J20.9"
    }

    /// CPT code for an office visit
    pub fn procedure_code() -> &'static str {
        "99213"
    }

    pub fn password() -> &'static str {
        "Secret123!"
    }
}

/// Fixture for insurance plans
pub struct PlanFixtures;

impl PlanFixtures {
    /// 200/month, 2200/year, 1000 coverage, no deductible, 20% copay
    pub fn standard() -> NewPlan {
        NewPlan {
            name: "Standard Care".to_string(),
            plan_type: PlanType::Standard,
            description: Some("Everyday outpatient and inpatient care".to_string()),
            monthly_premium: dec!(200),
            annual_premium: dec!(2200),
            coverage_amount: dec!(1000),
            deductible: dec!(0),
            copay_percentage: dec!(20),
            max_out_of_pocket: None,
            benefits: vec![Benefit {
                name: "Outpatient visits".to_string(),
                description: None,
                limit: None,
            }],
            exclusions: vec!["Cosmetic surgery".to_string()],
            currency: Currency::USD,
        }
    }

    /// Plan with a 200 deductible and a 500 out-of-pocket cap
    pub fn high_deductible() -> NewPlan {
        NewPlan {
            name: "Saver".to_string(),
            plan_type: PlanType::Basic,
            description: None,
            monthly_premium: dec!(90),
            annual_premium: dec!(1000),
            coverage_amount: dec!(5000),
            deductible: dec!(200),
            copay_percentage: dec!(30),
            max_out_of_pocket: Some(dec!(500)),
            benefits: vec![],
            exclusions: vec![],
            currency: Currency::USD,
        }
    }
}

/// Fixture for registrations
pub struct UserFixtures;

impl UserFixtures {
    /// A customer registration; `handle` keeps username and email unique
    pub fn customer(handle: &str) -> NewUser {
        NewUser {
            email: format!("{}@example.com", handle),
            username: handle.to_string(),
            password: StringFixtures::password().to_string(),
            full_name: format!("Test {}", handle),
            phone: None,
            address: None,
            role: None,
        }
    }

    /// A registration requesting a specific role
    pub fn with_role(handle: &str, role: UserRole) -> NewUser {
        NewUser {
            role: Some(role),
            ..Self::customer(handle)
        }
    }
}

/// Fixture for claims and review decisions
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub fn office_visit(policy_id: PolicyId, amount: Decimal) -> NewClaim {
        NewClaim {
            policy_id,
            service_date: DateFixtures::service_date(),
            provider_name: StringFixtures::provider_name().to_string(),
            diagnosis_code: Some(StringFixtures::diagnosis_code().to_string()),
            procedure_code: Some(StringFixtures::procedure_code().to_string()),
            claimed_amount: amount,
            notes: None,
        }
    }

    pub fn approve(amount: Option<Decimal>) -> ReviewDecision {
        ReviewDecision {
            status: ClaimStatus::Approved,
            approved_amount: amount,
            notes: None,
        }
    }

    pub fn decide(status: ClaimStatus) -> ReviewDecision {
        ReviewDecision {
            status,
            approved_amount: None,
            notes: None,
        }
    }
}

/// Fixture for premium payments
pub struct PaymentFixtures;

impl PaymentFixtures {
    pub fn card(policy_id: PolicyId, amount: Decimal) -> NewPayment {
        NewPayment {
            policy_id,
            amount,
            method: PaymentMethod::CreditCard,
            transaction_id: None,
            description: Some("Monthly premium".to_string()),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_term_spans_365_days() {
        let days = (DateFixtures::policy_end() - DateFixtures::policy_start()).num_days();
        assert_eq!(days, 365);
    }

    #[test]
    fn test_customer_fixture_has_no_role() {
        let user = UserFixtures::customer("alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(user.role.is_none());
    }
}
