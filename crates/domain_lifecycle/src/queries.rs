//! Owner-scoped reads of policies, claims and payments
//!
//! Callers see their own records. Admins see everything, and agents see
//! every claim so that they can work the review queue.

use std::sync::Arc;

use core_kernel::{ClaimId, PolicyId, UserId};
use domain_billing::Payment;
use domain_claims::{Claim, ClaimStatus};
use domain_identity::{Actor, Capability};
use domain_policy::{Policy, PolicyStatus};

use crate::error::LifecycleError;
use crate::ports::{ClaimFilter, InsuranceStore, Lock, Page, PaymentFilter, PolicyFilter};

/// Owner restriction for a listing, `None` when the caller may see everything
pub(crate) fn scope(actor: &Actor, capability: Capability) -> Option<UserId> {
    if actor.can(capability) {
        None
    } else {
        Some(actor.user_id)
    }
}

#[derive(Clone)]
pub struct RecordQueries {
    store: Arc<dyn InsuranceStore>,
}

impl RecordQueries {
    pub fn new(store: Arc<dyn InsuranceStore>) -> Self {
        Self { store }
    }

    pub async fn get_policy(
        &self,
        actor: &Actor,
        policy_id: PolicyId,
    ) -> Result<Policy, LifecycleError> {
        let mut tx = self.store.begin().await?;
        let policy = tx
            .find_policy(policy_id, Lock::None)
            .await?
            .ok_or(LifecycleError::PolicyNotFound(policy_id))?;
        if !actor.owns_or_can(policy.owner_id, Capability::ViewAllRecords) {
            return Err(LifecycleError::forbidden("not authorized to view this policy"));
        }
        Ok(policy)
    }

    pub async fn list_policies(
        &self,
        actor: &Actor,
        status: Option<PolicyStatus>,
        page: Page,
    ) -> Result<Vec<Policy>, LifecycleError> {
        let filter = PolicyFilter {
            owner_id: scope(actor, Capability::ViewAllRecords),
            status,
            page: Some(page),
        };
        let mut tx = self.store.begin().await?;
        Ok(tx.list_policies(&filter).await?)
    }

    pub async fn get_claim(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
    ) -> Result<Claim, LifecycleError> {
        let mut tx = self.store.begin().await?;
        let claim = tx
            .find_claim(claim_id, Lock::None)
            .await?
            .ok_or(LifecycleError::ClaimNotFound(claim_id))?;
        if !actor.owns_or_can(claim.owner_id, Capability::ViewAllClaims) {
            return Err(LifecycleError::forbidden("not authorized to view this claim"));
        }
        Ok(claim)
    }

    pub async fn list_claims(
        &self,
        actor: &Actor,
        status: Option<ClaimStatus>,
        page: Page,
    ) -> Result<Vec<Claim>, LifecycleError> {
        let filter = ClaimFilter {
            owner_id: scope(actor, Capability::ViewAllClaims),
            status,
            page: Some(page),
            ..Default::default()
        };
        let mut tx = self.store.begin().await?;
        Ok(tx.list_claims(&filter).await?)
    }

    pub async fn list_payments(
        &self,
        actor: &Actor,
        page: Page,
    ) -> Result<Vec<Payment>, LifecycleError> {
        let filter = PaymentFilter {
            owner_id: scope(actor, Capability::ViewAllRecords),
            page: Some(page),
            ..Default::default()
        };
        let mut tx = self.store.begin().await?;
        Ok(tx.list_payments(&filter).await?)
    }
}
