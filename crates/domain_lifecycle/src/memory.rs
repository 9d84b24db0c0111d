//! In-memory store
//!
//! Keeps every record in hash maps behind one async mutex. A transaction
//! holds the mutex for its whole lifetime and works on a copy of the state,
//! so transactions are fully serialized and a dropped transaction leaves the
//! store untouched. Unique keys match the PostgreSQL schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PaymentId, PlanId,
    PolicyId, PortError, UserId,
};
use domain_billing::Payment;
use domain_claims::Claim;
use domain_identity::User;
use domain_policy::{InsurancePlan, Policy};

use crate::ports::{
    ClaimFilter, InsuranceStore, Lock, Page, PaymentFilter, PolicyFilter, StoreTransaction,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    plans: HashMap<PlanId, InsurancePlan>,
    policies: HashMap<PolicyId, Policy>,
    claims: HashMap<ClaimId, Claim>,
    payments: HashMap<PaymentId, Payment>,
}

/// Store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("in-memory-store", AdapterHealth::Healthy, 0)
    }
}

#[async_trait]
impl InsuranceStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, PortError> {
        let guard = self.state.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(InMemoryTransaction { guard, working }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

fn page_of<T>(items: Vec<T>, page: Option<Page>) -> Vec<T> {
    match page {
        Some(page) => items
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect(),
        None => items,
    }
}

fn sorted_by_creation<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

impl InMemoryTransaction {
    fn matching_policies(&self, filter: &PolicyFilter) -> Vec<Policy> {
        let items = self
            .working
            .policies
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sorted_by_creation(items, |p: &Policy| (p.created_at, *p.id.as_uuid()))
    }

    fn matching_claims(&self, filter: &ClaimFilter) -> Vec<Claim> {
        let items = self
            .working
            .claims
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        sorted_by_creation(items, |c: &Claim| (c.created_at, *c.id.as_uuid()))
    }

    fn matching_payments(&self, filter: &PaymentFilter) -> Vec<Payment> {
        let items = self
            .working
            .payments
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sorted_by_creation(items, |p: &Payment| (p.created_at, *p.id.as_uuid()))
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, PortError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, PortError> {
        Ok(self
            .working
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, PortError> {
        Ok(self
            .working
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), PortError> {
        let users = &self.working.users;
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(PortError::conflict(format!("email {} already registered", user.email)));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(PortError::conflict(format!("username {} already taken", user.username)));
        }
        self.working.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), PortError> {
        match self.working.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(PortError::not_found("User", user.id)),
        }
    }

    async fn list_users(&mut self, page: Page) -> Result<Vec<User>, PortError> {
        let items = self.working.users.values().cloned().collect();
        let items = sorted_by_creation(items, |u: &User| (u.created_at, *u.id.as_uuid()));
        Ok(page_of(items, Some(page)))
    }

    async fn count_users(&mut self) -> Result<u64, PortError> {
        Ok(self.working.users.len() as u64)
    }

    async fn find_plan(&mut self, id: PlanId) -> Result<Option<InsurancePlan>, PortError> {
        Ok(self.working.plans.get(&id).cloned())
    }

    async fn insert_plan(&mut self, plan: &InsurancePlan) -> Result<(), PortError> {
        self.working.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn update_plan(&mut self, plan: &InsurancePlan) -> Result<(), PortError> {
        match self.working.plans.get_mut(&plan.id) {
            Some(existing) => {
                *existing = plan.clone();
                Ok(())
            }
            None => Err(PortError::not_found("InsurancePlan", plan.id)),
        }
    }

    async fn list_active_plans(&mut self, page: Page) -> Result<Vec<InsurancePlan>, PortError> {
        let items = self
            .working
            .plans
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        let items =
            sorted_by_creation(items, |p: &InsurancePlan| (p.created_at, *p.id.as_uuid()));
        Ok(page_of(items, Some(page)))
    }

    async fn find_policy(
        &mut self,
        id: PolicyId,
        _lock: Lock,
    ) -> Result<Option<Policy>, PortError> {
        Ok(self.working.policies.get(&id).cloned())
    }

    async fn insert_policy(&mut self, policy: &Policy) -> Result<(), PortError> {
        if self
            .working
            .policies
            .values()
            .any(|p| p.policy_number == policy.policy_number)
        {
            return Err(PortError::conflict(format!(
                "policy number {} already exists",
                policy.policy_number
            )));
        }
        self.working.policies.insert(policy.id, policy.clone());
        Ok(())
    }

    async fn update_policy(&mut self, policy: &Policy) -> Result<(), PortError> {
        match self.working.policies.get_mut(&policy.id) {
            Some(existing) => {
                *existing = policy.clone();
                Ok(())
            }
            None => Err(PortError::not_found("Policy", policy.id)),
        }
    }

    async fn list_policies(&mut self, filter: &PolicyFilter) -> Result<Vec<Policy>, PortError> {
        Ok(page_of(self.matching_policies(filter), filter.page))
    }

    async fn count_policies(&mut self, filter: &PolicyFilter) -> Result<u64, PortError> {
        Ok(self.matching_policies(filter).len() as u64)
    }

    async fn find_claim(&mut self, id: ClaimId, _lock: Lock) -> Result<Option<Claim>, PortError> {
        Ok(self.working.claims.get(&id).cloned())
    }

    async fn insert_claim(&mut self, claim: &Claim) -> Result<(), PortError> {
        if self
            .working
            .claims
            .values()
            .any(|c| c.claim_number == claim.claim_number)
        {
            return Err(PortError::conflict(format!(
                "claim number {} already exists",
                claim.claim_number
            )));
        }
        self.working.claims.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn update_claim(&mut self, claim: &Claim) -> Result<(), PortError> {
        match self.working.claims.get_mut(&claim.id) {
            Some(existing) => {
                *existing = claim.clone();
                Ok(())
            }
            None => Err(PortError::not_found("Claim", claim.id)),
        }
    }

    async fn list_claims(&mut self, filter: &ClaimFilter) -> Result<Vec<Claim>, PortError> {
        Ok(page_of(self.matching_claims(filter), filter.page))
    }

    async fn count_claims(&mut self, filter: &ClaimFilter) -> Result<u64, PortError> {
        Ok(self.matching_claims(filter).len() as u64)
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), PortError> {
        if self
            .working
            .payments
            .values()
            .any(|p| p.payment_reference == payment.payment_reference)
        {
            return Err(PortError::conflict(format!(
                "payment reference {} already exists",
                payment.payment_reference
            )));
        }
        self.working.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn list_payments(&mut self, filter: &PaymentFilter) -> Result<Vec<Payment>, PortError> {
        Ok(page_of(self.matching_payments(filter), filter.page))
    }

    async fn count_payments(&mut self, filter: &PaymentFilter) -> Result<u64, PortError> {
        Ok(self.matching_payments(filter).len() as u64)
    }

    async fn commit(&mut self) -> Result<(), PortError> {
        *self.guard = self.working.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_identity::{NewUser, UserRole};

    fn user(username: &str, email: &str) -> User {
        let input = NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password: "irrelevant-here".to_string(),
            full_name: "Test User".to_string(),
            phone: None,
            address: None,
            role: None,
        };
        User::new(&input, UserRole::Customer, "hash".to_string())
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = InMemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_user(&user("alice", "alice@example.com")).await.unwrap();
        }
        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_committed_writes_are_visible() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_user(&user("alice", "alice@example.com")).await.unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_user_by_username("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_user(&user("alice", "alice@example.com")).await.unwrap();
        let err = tx
            .insert_user(&user("alice2", "ALICE@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }
}
