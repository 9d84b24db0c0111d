//! Persistence port
//!
//! The lifecycle manager reads and writes the five record types through a
//! transaction handle obtained from an [`InsuranceStore`]. A transaction is
//! rolled back when it is dropped without [`StoreTransaction::commit`], so an
//! early return with `?` never leaves a partial update behind.
//!
//! Reads taken with [`Lock::ForUpdate`] hold the row until the transaction
//! ends, which serializes concurrent reviews of one claim and claim
//! submissions racing a policy cancellation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{
    ClaimId, DomainPort, HealthCheckable, PlanId, PolicyId, PortError, UserId,
};
use domain_billing::{Payment, PaymentStatus};
use domain_claims::{Claim, ClaimStatus};
use domain_identity::User;
use domain_policy::{InsurancePlan, Policy, PolicyStatus};

/// Default page size for listings
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    /// Creates a page, clamping the limit to `1..=MAX_PAGE_LIMIT`
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

/// Row locking mode for keyed reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lock {
    None,
    ForUpdate,
}

/// Policy listing filter
#[derive(Debug, Clone, Default)]
pub struct PolicyFilter {
    pub owner_id: Option<UserId>,
    pub status: Option<PolicyStatus>,
    /// `None` returns every match
    pub page: Option<Page>,
}

/// Claim listing filter
///
/// `claimed_from` is inclusive and `claimed_before` exclusive.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub owner_id: Option<UserId>,
    pub policy_id: Option<PolicyId>,
    pub status: Option<ClaimStatus>,
    pub claimed_from: Option<DateTime<Utc>>,
    pub claimed_before: Option<DateTime<Utc>>,
    pub page: Option<Page>,
}

impl ClaimFilter {
    pub fn for_policy(policy_id: PolicyId) -> Self {
        Self {
            policy_id: Some(policy_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, claim: &Claim) -> bool {
        self.owner_id.map_or(true, |o| claim.owner_id == o)
            && self.policy_id.map_or(true, |p| claim.policy_id == p)
            && self.status.map_or(true, |s| claim.status == s)
            && self.claimed_from.map_or(true, |from| claim.claim_date >= from)
            && self.claimed_before.map_or(true, |before| claim.claim_date < before)
    }
}

impl PolicyFilter {
    pub fn matches(&self, policy: &Policy) -> bool {
        self.owner_id.map_or(true, |o| policy.owner_id == o)
            && self.status.map_or(true, |s| policy.status == s)
    }
}

/// Payment listing filter
///
/// `paid_from` is inclusive and `paid_before` exclusive.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub owner_id: Option<UserId>,
    pub policy_id: Option<PolicyId>,
    pub status: Option<PaymentStatus>,
    pub paid_from: Option<DateTime<Utc>>,
    pub paid_before: Option<DateTime<Utc>>,
    pub page: Option<Page>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        self.owner_id.map_or(true, |o| payment.owner_id == o)
            && self.policy_id.map_or(true, |p| payment.policy_id == p)
            && self.status.map_or(true, |s| payment.status == s)
            && self.paid_from.map_or(true, |from| payment.payment_date >= from)
            && self.paid_before.map_or(true, |before| payment.payment_date < before)
    }
}

/// One unit of work against the store
///
/// Listings are ordered by creation time, oldest first.
#[async_trait]
pub trait StoreTransaction: Send {
    // Users
    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, PortError>;
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, PortError>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, PortError>;
    async fn insert_user(&mut self, user: &User) -> Result<(), PortError>;
    async fn update_user(&mut self, user: &User) -> Result<(), PortError>;
    async fn list_users(&mut self, page: Page) -> Result<Vec<User>, PortError>;
    async fn count_users(&mut self) -> Result<u64, PortError>;

    // Plans
    async fn find_plan(&mut self, id: PlanId) -> Result<Option<InsurancePlan>, PortError>;
    async fn insert_plan(&mut self, plan: &InsurancePlan) -> Result<(), PortError>;
    async fn update_plan(&mut self, plan: &InsurancePlan) -> Result<(), PortError>;
    async fn list_active_plans(&mut self, page: Page) -> Result<Vec<InsurancePlan>, PortError>;

    // Policies
    async fn find_policy(&mut self, id: PolicyId, lock: Lock) -> Result<Option<Policy>, PortError>;
    async fn insert_policy(&mut self, policy: &Policy) -> Result<(), PortError>;
    async fn update_policy(&mut self, policy: &Policy) -> Result<(), PortError>;
    async fn list_policies(&mut self, filter: &PolicyFilter) -> Result<Vec<Policy>, PortError>;
    async fn count_policies(&mut self, filter: &PolicyFilter) -> Result<u64, PortError>;

    // Claims
    async fn find_claim(&mut self, id: ClaimId, lock: Lock) -> Result<Option<Claim>, PortError>;
    async fn insert_claim(&mut self, claim: &Claim) -> Result<(), PortError>;
    async fn update_claim(&mut self, claim: &Claim) -> Result<(), PortError>;
    async fn list_claims(&mut self, filter: &ClaimFilter) -> Result<Vec<Claim>, PortError>;
    async fn count_claims(&mut self, filter: &ClaimFilter) -> Result<u64, PortError>;

    // Payments
    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), PortError>;
    async fn list_payments(&mut self, filter: &PaymentFilter) -> Result<Vec<Payment>, PortError>;
    async fn count_payments(&mut self, filter: &PaymentFilter) -> Result<u64, PortError>;

    /// Makes every write in this transaction durable
    async fn commit(&mut self) -> Result<(), PortError>;
}

/// Transactional storage for users, plans, policies, claims and payments
#[async_trait]
pub trait InsuranceStore: DomainPort + HealthCheckable {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_limit_is_clamped() {
        assert_eq!(Page::new(0, 0).limit, 1);
        assert_eq!(Page::new(0, 50_000).limit, MAX_PAGE_LIMIT);
        assert_eq!(Page::default().limit, DEFAULT_PAGE_LIMIT);
    }
}
