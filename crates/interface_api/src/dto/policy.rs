//! Policy DTOs

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_policy::{Beneficiary, PaymentFrequency, Policy, PolicyStatus};

use super::Pagination;

#[derive(Debug, Deserialize)]
pub struct PolicyListParams {
    pub status: Option<PolicyStatus>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl PolicyListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

/// Optional body for the expire action; defaults to today (UTC)
#[derive(Debug, Default, Deserialize)]
pub struct ExpirePolicyRequest {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub id: Uuid,
    pub policy_number: String,
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
    pub premium_amount: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub beneficiaries: Vec<Beneficiary>,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Policy> for PolicyResponse {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id.into(),
            policy_number: policy.policy_number,
            owner_id: policy.owner_id.into(),
            plan_id: policy.plan_id.into(),
            start_date: policy.start_date,
            end_date: policy.end_date,
            status: policy.status,
            premium_amount: policy.premium_amount.amount(),
            payment_frequency: policy.payment_frequency,
            beneficiaries: policy.beneficiaries,
            currency: policy.currency,
            created_at: policy.created_at,
            updated_at: policy.updated_at,
        }
    }
}
