//! Claims DTOs

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::{Claim, ClaimStatus, EntitlementSplit};

use super::Pagination;

#[derive(Debug, Deserialize)]
pub struct ClaimListParams {
    pub status: Option<ClaimStatus>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ClaimListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

/// How an approved amount divides between patient and insurer
#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub approved_amount: Decimal,
    pub deductible_applied: Decimal,
    pub coinsurance: Decimal,
    pub patient_share: Decimal,
    pub insurer_share: Decimal,
    pub uncovered: Decimal,
}

impl From<EntitlementSplit> for EntitlementResponse {
    fn from(split: EntitlementSplit) -> Self {
        Self {
            approved_amount: split.approved_amount.amount(),
            deductible_applied: split.deductible_applied.amount(),
            coinsurance: split.coinsurance.amount(),
            patient_share: split.patient_share.amount(),
            insurer_share: split.insurer_share.amount(),
            uncovered: split.uncovered.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
    pub policy_id: Uuid,
    pub owner_id: Uuid,
    pub submitted_by: Uuid,
    pub status: ClaimStatus,
    pub claim_date: DateTime<Utc>,
    pub service_date: NaiveDate,
    pub provider_name: String,
    pub diagnosis_code: Option<String>,
    pub procedure_code: Option<String>,
    pub claimed_amount: Decimal,
    pub approved_amount: Option<Decimal>,
    pub entitlement: Option<EntitlementResponse>,
    pub notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub review_date: Option<DateTime<Utc>>,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.into(),
            claim_number: claim.claim_number,
            policy_id: claim.policy_id.into(),
            owner_id: claim.owner_id.into(),
            submitted_by: claim.submitted_by.into(),
            status: claim.status,
            claim_date: claim.claim_date,
            service_date: claim.service_date,
            provider_name: claim.provider_name,
            diagnosis_code: claim.diagnosis_code,
            procedure_code: claim.procedure_code,
            claimed_amount: claim.claimed_amount.amount(),
            approved_amount: claim.approved_amount.map(|m| m.amount()),
            entitlement: claim.entitlement.map(EntitlementResponse::from),
            notes: claim.notes,
            reviewed_by: claim.reviewed_by.map(Uuid::from),
            review_date: claim.review_date,
            currency: claim.currency,
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}
