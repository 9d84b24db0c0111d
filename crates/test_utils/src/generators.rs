//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Currency, Money};
use domain_billing::PaymentMethod;
use domain_claims::ClaimStatus;
use domain_policy::{NewPlan, PlanType};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values with two decimal places
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::CAD),
        Just(Currency::AUD),
        Just(Currency::INR),
    ]
}

/// Strategy for generating positive amounts in cents, up to 100 000.00
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating valid USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_strategy().prop_map(|amount| Money::new(amount, Currency::USD))
}

/// Strategy for copay percentages in whole percent (0 to 100)
pub fn copay_percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=100u32).prop_map(Decimal::from)
}

pub fn plan_type_strategy() -> impl Strategy<Value = PlanType> {
    prop_oneof![
        Just(PlanType::Basic),
        Just(PlanType::Standard),
        Just(PlanType::Premium),
        Just(PlanType::Enterprise),
    ]
}

pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    proptest::sample::select(ClaimStatus::ALL.to_vec())
}

pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    proptest::sample::select(PaymentMethod::ALL.to_vec())
}

/// Strategy for plan input that passes plan validation
///
/// The deductible stays below the coverage and the out-of-pocket cap, when
/// present, is never below the deductible.
pub fn valid_plan_strategy() -> impl Strategy<Value = NewPlan> {
    (
        plan_type_strategy(),
        positive_amount_strategy(),
        positive_amount_strategy(),
        0i64..100_000i64,
        copay_percentage_strategy(),
        proptest::option::of(0i64..100_000i64),
    )
        .prop_map(|(plan_type, monthly, coverage, deductible_cents, copay, oop_extra)| {
            let deductible = Decimal::new(deductible_cents, 2);
            NewPlan {
                name: format!("{} plan", plan_type),
                plan_type,
                description: None,
                monthly_premium: monthly,
                annual_premium: monthly * Decimal::from(11),
                coverage_amount: coverage + deductible,
                deductible,
                copay_percentage: copay,
                max_out_of_pocket: oop_extra.map(|extra| deductible + Decimal::new(extra, 2)),
                benefits: vec![],
                exclusions: vec![],
                currency: Currency::USD,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_policy::InsurancePlan;

    proptest! {
        #[test]
        fn test_generated_plans_are_valid(plan in valid_plan_strategy()) {
            prop_assert!(InsurancePlan::create(plan).is_ok());
        }

        #[test]
        fn test_amounts_are_positive(amount in positive_amount_strategy()) {
            prop_assert!(amount > Decimal::ZERO);
        }
    }
}
