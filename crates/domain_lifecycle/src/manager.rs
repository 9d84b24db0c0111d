//! Entitlement & lifecycle manager
//!
//! Owns every status change on policies and claims, the creation of payments,
//! and the insurer/patient split of approved claims. Each operation runs in a
//! single store transaction: read with row locks, validate, write, commit.
//! Any failure drops the transaction, so nothing is persisted.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use core_kernel::{ClaimId, PlanId, PolicyId, DEFAULT_TERM_DAYS};
use domain_billing::{NewPayment, Payment};
use domain_claims::{Accumulators, Claim, CostSharingTerms, NewClaim, ReviewDecision};
use domain_identity::{Actor, Capability};
use domain_policy::{
    Beneficiary, InsurancePlan, PaymentFrequency, Policy, PolicyError, PolicyTerms,
};

use crate::access::{ensure_may_act_on, require};
use crate::error::LifecycleError;
use crate::numbering::{NumberGenerator, NumberKind};
use crate::ports::{ClaimFilter, InsuranceStore, Lock};

/// Tunables passed in at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Length of a policy term in days
    pub policy_term_days: i64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            policy_term_days: DEFAULT_TERM_DAYS,
        }
    }
}

/// Request to issue a policy to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePolicy {
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
}

/// Cost-sharing terms of a plan as the entitlement calculator sees them
pub fn cost_sharing_terms(plan: &InsurancePlan) -> CostSharingTerms {
    CostSharingTerms {
        coverage_amount: plan.coverage_amount,
        deductible: plan.deductible,
        copay: plan.copay_rate(),
        max_out_of_pocket: plan.max_out_of_pocket,
    }
}

/// The entitlement & lifecycle manager
#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn InsuranceStore>,
    numbers: Arc<dyn NumberGenerator>,
    config: ManagerConfig,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn InsuranceStore>,
        numbers: Arc<dyn NumberGenerator>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            store,
            numbers,
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Issues a pending policy on an active plan to the caller
    ///
    /// The premium is fixed here from the plan and the payment frequency and
    /// no later operation changes it.
    ///
    /// # Errors
    ///
    /// * `PlanNotFound` - the plan is missing or inactive
    /// * `Validation` - the beneficiary designation is invalid
    #[instrument(
        skip(self, actor, request),
        fields(user = %actor.user_id, plan = %request.plan_id)
    )]
    pub async fn issue_policy(
        &self,
        actor: &Actor,
        request: IssuePolicy,
    ) -> Result<Policy, LifecycleError> {
        let mut tx = self.store.begin().await?;

        let plan = tx
            .find_plan(request.plan_id)
            .await?
            .filter(|plan| plan.is_active)
            .ok_or_else(|| LifecycleError::plan_not_found(request.plan_id))?;

        let policy = Policy::issue(
            &plan,
            PolicyTerms {
                policy_number: self.numbers.next_number(NumberKind::Policy),
                owner_id: actor.user_id,
                start_date: request.start_date,
                frequency: request.payment_frequency,
                beneficiaries: request.beneficiaries,
                term_days: self.config.policy_term_days,
            },
        )?;

        tx.insert_policy(&policy).await?;
        tx.commit().await?;

        info!(
            policy_number = %policy.policy_number,
            premium = %policy.premium_amount,
            end_date = %policy.end_date,
            "Policy issued"
        );
        Ok(policy)
    }

    /// Moves a pending policy to active
    ///
    /// Activating a policy that is already active fails rather than succeeding
    /// silently.
    #[instrument(skip(self, actor), fields(user = %actor.user_id))]
    pub async fn activate_policy(
        &self,
        actor: &Actor,
        policy_id: PolicyId,
    ) -> Result<Policy, LifecycleError> {
        self.transition_policy(actor, policy_id, "activate policies", |p| p.activate())
            .await
    }

    /// Cancels an active policy
    #[instrument(skip(self, actor), fields(user = %actor.user_id))]
    pub async fn cancel_policy(
        &self,
        actor: &Actor,
        policy_id: PolicyId,
    ) -> Result<Policy, LifecycleError> {
        self.transition_policy(actor, policy_id, "cancel policies", |p| p.cancel())
            .await
    }

    /// Expires an active policy whose end date has been reached by `today`
    #[instrument(skip(self, actor), fields(user = %actor.user_id))]
    pub async fn expire_policy(
        &self,
        actor: &Actor,
        policy_id: PolicyId,
        today: NaiveDate,
    ) -> Result<Policy, LifecycleError> {
        self.transition_policy(actor, policy_id, "expire policies", move |p| p.expire(today))
            .await
    }

    async fn transition_policy<F>(
        &self,
        actor: &Actor,
        policy_id: PolicyId,
        action: &str,
        apply: F,
    ) -> Result<Policy, LifecycleError>
    where
        F: FnOnce(&mut Policy) -> Result<(), PolicyError> + Send,
    {
        require(actor, Capability::ManagePolicies, action)?;

        let mut tx = self.store.begin().await?;
        let mut policy = tx
            .find_policy(policy_id, Lock::ForUpdate)
            .await?
            .ok_or(LifecycleError::PolicyNotFound(policy_id))?;

        let from = policy.status;
        apply(&mut policy)?;

        tx.update_policy(&policy).await?;
        tx.commit().await?;

        info!(
            policy_number = %policy.policy_number,
            from = %from,
            to = %policy.status,
            "Policy status changed"
        );
        Ok(policy)
    }

    /// Files a claim against an active policy
    ///
    /// The policy row stays locked until the claim is written, so a claim
    /// cannot slip in while the policy is being cancelled.
    ///
    /// # Errors
    ///
    /// * `PolicyNotFound` - no such policy
    /// * `PolicyNotOwned` - someone else's policy and the caller is not an admin
    /// * `PolicyNotActive` - policy status is not active, for every role
    /// * `InvalidAmount` - claimed amount not greater than zero
    #[instrument(
        skip(self, actor, request),
        fields(user = %actor.user_id, policy = %request.policy_id)
    )]
    pub async fn submit_claim(
        &self,
        actor: &Actor,
        request: NewClaim,
    ) -> Result<Claim, LifecycleError> {
        let mut tx = self.store.begin().await?;

        let policy = tx
            .find_policy(request.policy_id, Lock::ForUpdate)
            .await?
            .ok_or(LifecycleError::PolicyNotFound(request.policy_id))?;
        ensure_may_act_on(actor, &policy)?;
        if !policy.is_active() {
            return Err(LifecycleError::PolicyNotActive {
                policy: policy.id,
                status: policy.status,
            });
        }

        let claim = Claim::submit(
            self.numbers.next_number(NumberKind::Claim),
            policy.owner_id,
            actor.user_id,
            request,
            policy.currency,
        )?;

        tx.insert_claim(&claim).await?;
        tx.commit().await?;

        info!(
            claim_number = %claim.claim_number,
            policy_number = %policy.policy_number,
            amount = %claim.claimed_amount,
            "Claim submitted"
        );
        Ok(claim)
    }

    /// Applies a reviewer decision to a claim
    ///
    /// On approval the split is computed against the plan behind the policy
    /// and what the policy's other approved or paid claims already consumed.
    ///
    /// # Errors
    ///
    /// * `Forbidden` - caller is neither admin nor agent
    /// * `ClaimNotFound` - no such claim
    /// * `InvalidTransition` - the claim is terminal or the pair is not allowed
    /// * `InvalidAmount` - approved amount negative, above the claimed amount,
    ///   or supplied with a non-approval decision
    #[instrument(
        skip(self, actor, decision),
        fields(user = %actor.user_id, status = %decision.status)
    )]
    pub async fn review_claim(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
        decision: ReviewDecision,
    ) -> Result<Claim, LifecycleError> {
        require(actor, Capability::ReviewClaims, "review claims")?;

        let mut tx = self.store.begin().await?;
        let mut claim = tx
            .find_claim(claim_id, Lock::ForUpdate)
            .await?
            .ok_or(LifecycleError::ClaimNotFound(claim_id))?;
        let policy = tx
            .find_policy(claim.policy_id, Lock::ForUpdate)
            .await?
            .ok_or(LifecycleError::PolicyNotFound(claim.policy_id))?;
        let plan = tx
            .find_plan(policy.plan_id)
            .await?
            .ok_or_else(|| LifecycleError::plan_not_found(policy.plan_id))?;

        let siblings = tx.list_claims(&ClaimFilter::for_policy(policy.id)).await?;
        let accumulators = Accumulators::from_claims(
            policy.currency,
            siblings.iter().filter(|c| c.id != claim.id),
        )?;

        let from = claim.status;
        claim.review(
            actor.user_id,
            decision,
            &cost_sharing_terms(&plan),
            &accumulators,
        )?;

        tx.update_claim(&claim).await?;
        tx.commit().await?;

        info!(
            claim_number = %claim.claim_number,
            from = %from,
            to = %claim.status,
            approved = ?claim.approved_amount.map(|m| m.amount()),
            "Claim reviewed"
        );
        Ok(claim)
    }

    /// Records a premium payment against a policy
    ///
    /// Payments are independent ledger entries and never change policy or
    /// claim status.
    #[instrument(
        skip(self, actor, request),
        fields(user = %actor.user_id, policy = %request.policy_id)
    )]
    pub async fn record_payment(
        &self,
        actor: &Actor,
        request: NewPayment,
    ) -> Result<Payment, LifecycleError> {
        let mut tx = self.store.begin().await?;

        let policy = tx
            .find_policy(request.policy_id, Lock::None)
            .await?
            .ok_or(LifecycleError::PolicyNotFound(request.policy_id))?;
        ensure_may_act_on(actor, &policy)?;

        let payment = Payment::record(
            self.numbers.next_number(NumberKind::Payment),
            policy.owner_id,
            actor.user_id,
            request,
            policy.currency,
        )?;

        tx.insert_payment(&payment).await?;
        tx.commit().await?;

        info!(
            payment_reference = %payment.payment_reference,
            policy_number = %policy.policy_number,
            amount = %payment.amount,
            method = %payment.method,
            "Payment recorded"
        );
        Ok(payment)
    }
}
