//! Plan DTOs

use chrono::{DateTime, Utc};
use core_kernel::Currency;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use domain_policy::{Benefit, InsurancePlan, PlanType};

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub plan_type: PlanType,
    pub description: Option<String>,
    pub monthly_premium: Decimal,
    pub annual_premium: Decimal,
    pub coverage_amount: Decimal,
    pub deductible: Decimal,
    pub copay_percentage: Decimal,
    pub max_out_of_pocket: Option<Decimal>,
    pub benefits: Vec<Benefit>,
    pub exclusions: Vec<String>,
    pub currency: Currency,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<InsurancePlan> for PlanResponse {
    fn from(plan: InsurancePlan) -> Self {
        Self {
            id: plan.id.into(),
            name: plan.name,
            plan_type: plan.plan_type,
            description: plan.description,
            monthly_premium: plan.monthly_premium.amount(),
            annual_premium: plan.annual_premium.amount(),
            coverage_amount: plan.coverage_amount.amount(),
            deductible: plan.deductible.amount(),
            copay_percentage: plan.copay_percentage,
            max_out_of_pocket: plan.max_out_of_pocket.map(|m| m.amount()),
            benefits: plan.benefits,
            exclusions: plan.exclusions,
            currency: plan.currency,
            is_active: plan.is_active,
            created_at: plan.created_at,
        }
    }
}
