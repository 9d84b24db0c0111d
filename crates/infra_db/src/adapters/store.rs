//! PostgreSQL Insurance Store Adapter
//!
//! This module provides the database adapter for the lifecycle domain,
//! implementing the `InsuranceStore` port on top of the table repositories.
//!
//! # Overview
//!
//! Every call to [`InsuranceStore::begin`] opens a PostgreSQL transaction.
//! The returned [`PostgresStoreTransaction`]:
//!
//! - Translates port calls into repository operations on its connection
//! - Converts database rows back to domain models
//! - Translates database errors into port errors
//!
//! Keyed reads with [`Lock::ForUpdate`] use `SELECT ... FOR UPDATE`, so two
//! reviewers deciding the same claim are serialized by the database. A
//! transaction dropped without `commit` is rolled back by SQLx.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresInsuranceStore;
//! use domain_lifecycle::InsuranceStore;
//!
//! let store: Arc<dyn InsuranceStore> = Arc::new(PostgresInsuranceStore::new(pool));
//! let mut tx = store.begin().await?;
//! let policy = tx.find_policy(policy_id, Lock::ForUpdate).await?;
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, ClaimId, Currency, DomainPort, HealthCheckResult, HealthCheckable, Money,
    PaymentId, PlanId, PolicyId, PortError, UserId,
};
use domain_billing::{Payment, PaymentMethod, PaymentStatus};
use domain_claims::{Claim, ClaimStatus};
use domain_identity::{User, UserRole};
use domain_lifecycle::{
    ClaimFilter, InsuranceStore, Lock, Page, PaymentFilter, PolicyFilter, StoreTransaction,
};
use domain_policy::{InsurancePlan, PaymentFrequency, PlanType, Policy, PolicyStatus};

use crate::error::DatabaseError;
use crate::repositories::claims::ClaimStatus as DbClaimStatus;
use crate::repositories::payments::{
    PaymentMethod as DbPaymentMethod, PaymentStatus as DbPaymentStatus,
};
use crate::repositories::plans::PlanType as DbPlanType;
use crate::repositories::policies::{
    PaymentFrequency as DbPaymentFrequency, PolicyStatus as DbPolicyStatus,
};
use crate::repositories::users::UserRole as DbUserRole;
use crate::repositories::{
    ClaimCriteria, ClaimRepository, ClaimRow, PaymentCriteria, PaymentRepository, PaymentRow,
    PlanRepository, PlanRow, PolicyCriteria, PolicyRepository, PolicyRow, UserRepository,
    UserRow,
};

const ADAPTER_ID: &str = "postgres-insurance-store";

/// PostgreSQL-backed implementation of the `InsuranceStore` port
///
/// # Health Checking
///
/// Health checks run `SELECT 1` against the pool.
#[derive(Debug, Clone)]
pub struct PostgresInsuranceStore {
    pool: PgPool,
}

impl PostgresInsuranceStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// Mark as a domain port
impl DomainPort for PostgresInsuranceStore {}

#[async_trait]
impl HealthCheckable for PostgresInsuranceStore {
    /// Checks database connectivity
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, latency_ms),
            Err(e) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Unhealthy, latency_ms)
                .with_message(format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl InsuranceStore for PostgresInsuranceStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, PortError> {
        let tx = self.pool.begin().await.map_err(db_to_port_error)?;
        Ok(Box::new(PostgresStoreTransaction { tx: Some(tx) }))
    }
}

/// One PostgreSQL transaction
///
/// The inner transaction is taken on commit; any later call fails.
pub struct PostgresStoreTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresStoreTransaction {
    fn conn(&mut self) -> Result<&mut PgConnection, PortError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| PortError::internal("transaction already committed"))
    }
}

#[async_trait]
impl StoreTransaction for PostgresStoreTransaction {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, PortError> {
        let row = UserRepository::find_by_id(self.conn()?, *id.as_uuid())
            .await
            .map_err(db_to_port_error)?;
        row.map(row_to_user).transpose()
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, PortError> {
        let row = UserRepository::find_by_username(self.conn()?, username)
            .await
            .map_err(db_to_port_error)?;
        row.map(row_to_user).transpose()
    }

    #[instrument(skip(self, email))]
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, PortError> {
        let row = UserRepository::find_by_email(self.conn()?, email)
            .await
            .map_err(db_to_port_error)?;
        row.map(row_to_user).transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert_user(&mut self, user: &User) -> Result<(), PortError> {
        UserRepository::insert(self.conn()?, &user_to_row(user))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update_user(&mut self, user: &User) -> Result<(), PortError> {
        UserRepository::update(self.conn()?, &user_to_row(user))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn list_users(&mut self, page: Page) -> Result<Vec<User>, PortError> {
        let (offset, limit) = page_bounds(page);
        let rows = UserRepository::list(self.conn()?, offset, limit)
            .await
            .map_err(db_to_port_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn count_users(&mut self) -> Result<u64, PortError> {
        let count = UserRepository::count(self.conn()?)
            .await
            .map_err(db_to_port_error)?;
        Ok(to_count(count))
    }

    #[instrument(skip(self), fields(plan_id = %id))]
    async fn find_plan(&mut self, id: PlanId) -> Result<Option<InsurancePlan>, PortError> {
        let row = PlanRepository::find_by_id(self.conn()?, *id.as_uuid())
            .await
            .map_err(db_to_port_error)?;
        row.map(row_to_plan).transpose()
    }

    #[instrument(skip(self, plan), fields(plan_id = %plan.id))]
    async fn insert_plan(&mut self, plan: &InsurancePlan) -> Result<(), PortError> {
        let row = plan_to_row(plan)?;
        PlanRepository::insert(self.conn()?, &row)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, plan), fields(plan_id = %plan.id))]
    async fn update_plan(&mut self, plan: &InsurancePlan) -> Result<(), PortError> {
        let row = plan_to_row(plan)?;
        PlanRepository::update(self.conn()?, &row)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn list_active_plans(&mut self, page: Page) -> Result<Vec<InsurancePlan>, PortError> {
        let (offset, limit) = page_bounds(page);
        let rows = PlanRepository::list_active(self.conn()?, offset, limit)
            .await
            .map_err(db_to_port_error)?;
        rows.into_iter().map(row_to_plan).collect()
    }

    #[instrument(skip(self), fields(policy_id = %id))]
    async fn find_policy(&mut self, id: PolicyId, lock: Lock) -> Result<Option<Policy>, PortError> {
        let row = PolicyRepository::find_by_id(self.conn()?, *id.as_uuid(), lock == Lock::ForUpdate)
            .await
            .map_err(db_to_port_error)?;
        row.map(row_to_policy).transpose()
    }

    #[instrument(skip(self, policy), fields(policy_number = %policy.policy_number))]
    async fn insert_policy(&mut self, policy: &Policy) -> Result<(), PortError> {
        let row = policy_to_row(policy)?;
        PolicyRepository::insert(self.conn()?, &row)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, policy), fields(policy_id = %policy.id))]
    async fn update_policy(&mut self, policy: &Policy) -> Result<(), PortError> {
        let row = policy_to_row(policy)?;
        PolicyRepository::update(self.conn()?, &row)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn list_policies(&mut self, filter: &PolicyFilter) -> Result<Vec<Policy>, PortError> {
        let rows = PolicyRepository::list(self.conn()?, policy_criteria(filter))
            .await
            .map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Listed policies");
        rows.into_iter().map(row_to_policy).collect()
    }

    async fn count_policies(&mut self, filter: &PolicyFilter) -> Result<u64, PortError> {
        let count = PolicyRepository::count(self.conn()?, policy_criteria(filter))
            .await
            .map_err(db_to_port_error)?;
        Ok(to_count(count))
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn find_claim(&mut self, id: ClaimId, lock: Lock) -> Result<Option<Claim>, PortError> {
        let row = ClaimRepository::find_by_id(self.conn()?, *id.as_uuid(), lock == Lock::ForUpdate)
            .await
            .map_err(db_to_port_error)?;
        row.map(row_to_claim).transpose()
    }

    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn insert_claim(&mut self, claim: &Claim) -> Result<(), PortError> {
        let row = claim_to_row(claim)?;
        ClaimRepository::insert(self.conn()?, &row)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn update_claim(&mut self, claim: &Claim) -> Result<(), PortError> {
        let row = claim_to_row(claim)?;
        ClaimRepository::update(self.conn()?, &row)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn list_claims(&mut self, filter: &ClaimFilter) -> Result<Vec<Claim>, PortError> {
        let rows = ClaimRepository::list(self.conn()?, claim_criteria(filter))
            .await
            .map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Listed claims");
        rows.into_iter().map(row_to_claim).collect()
    }

    async fn count_claims(&mut self, filter: &ClaimFilter) -> Result<u64, PortError> {
        let count = ClaimRepository::count(self.conn()?, claim_criteria(filter))
            .await
            .map_err(db_to_port_error)?;
        Ok(to_count(count))
    }

    #[instrument(skip(self, payment), fields(payment_reference = %payment.payment_reference))]
    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), PortError> {
        PaymentRepository::insert(self.conn()?, &payment_to_row(payment))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn list_payments(&mut self, filter: &PaymentFilter) -> Result<Vec<Payment>, PortError> {
        let rows = PaymentRepository::list(self.conn()?, payment_criteria(filter))
            .await
            .map_err(db_to_port_error)?;
        rows.into_iter().map(row_to_payment).collect()
    }

    async fn count_payments(&mut self, filter: &PaymentFilter) -> Result<u64, PortError> {
        let count = PaymentRepository::count(self.conn()?, payment_criteria(filter))
            .await
            .map_err(db_to_port_error)?;
        Ok(to_count(count))
    }

    #[instrument(skip(self))]
    async fn commit(&mut self) -> Result<(), PortError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| PortError::internal("transaction already committed"))?;
        tx.commit().await.map_err(db_to_port_error)?;
        debug!("Transaction committed");
        Ok(())
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

/// Converts database errors to port errors
fn db_to_port_error(e: impl Into<DatabaseError>) -> PortError {
    PortError::from(e.into())
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

fn page_bounds(page: Page) -> (i64, i64) {
    (i64::from(page.skip), i64::from(page.limit))
}

fn optional_page_bounds(page: Option<Page>) -> (Option<i64>, Option<i64>) {
    match page {
        Some(page) => {
            let (offset, limit) = page_bounds(page);
            (Some(offset), Some(limit))
        }
        None => (None, None),
    }
}

fn parse_currency(code: &str) -> Result<Currency, PortError> {
    Currency::from_str(code.trim())
        .map_err(|e| PortError::transformation(format!("currency '{}': {}", code, e)))
}

fn to_json<T: serde::Serialize>(
    column: &str,
    value: &T,
) -> Result<Json<serde_json::Value>, PortError> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| DatabaseError::serialization(column, e).into())
}

fn from_json<T: serde::de::DeserializeOwned>(
    column: &str,
    value: Json<serde_json::Value>,
) -> Result<T, PortError> {
    serde_json::from_value(value.0).map_err(|e| DatabaseError::serialization(column, e).into())
}

fn policy_criteria(filter: &PolicyFilter) -> PolicyCriteria {
    let (offset, limit) = optional_page_bounds(filter.page);
    PolicyCriteria {
        owner_id: filter.owner_id.map(|id| *id.as_uuid()),
        status: filter.status.map(domain_to_db_policy_status),
        offset,
        limit,
    }
}

fn claim_criteria(filter: &ClaimFilter) -> ClaimCriteria {
    let (offset, limit) = optional_page_bounds(filter.page);
    ClaimCriteria {
        owner_id: filter.owner_id.map(|id| *id.as_uuid()),
        policy_id: filter.policy_id.map(|id| *id.as_uuid()),
        status: filter.status.map(domain_to_db_claim_status),
        claimed_from: filter.claimed_from,
        claimed_before: filter.claimed_before,
        offset,
        limit,
    }
}

fn payment_criteria(filter: &PaymentFilter) -> PaymentCriteria {
    let (offset, limit) = optional_page_bounds(filter.page);
    PaymentCriteria {
        owner_id: filter.owner_id.map(|id| *id.as_uuid()),
        policy_id: filter.policy_id.map(|id| *id.as_uuid()),
        status: filter.status.map(domain_to_db_payment_status),
        paid_from: filter.paid_from,
        paid_before: filter.paid_before,
        offset,
        limit,
    }
}

// --- users ---

fn row_to_user(row: UserRow) -> Result<User, PortError> {
    Ok(User {
        id: UserId::from(row.user_id),
        email: row.email,
        username: row.username,
        password_hash: row.password_hash,
        full_name: row.full_name,
        phone: row.phone,
        address: row.address,
        role: db_to_domain_role(row.role),
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        user_id: *user.id.as_uuid(),
        email: user.email.clone(),
        username: user.username.clone(),
        password_hash: user.password_hash.clone(),
        full_name: user.full_name.clone(),
        phone: user.phone.clone(),
        address: user.address.clone(),
        role: domain_to_db_role(user.role),
        is_active: user.is_active,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn db_to_domain_role(role: DbUserRole) -> UserRole {
    match role {
        DbUserRole::Admin => UserRole::Admin,
        DbUserRole::Agent => UserRole::Agent,
        DbUserRole::Customer => UserRole::Customer,
        DbUserRole::Provider => UserRole::Provider,
    }
}

fn domain_to_db_role(role: UserRole) -> DbUserRole {
    match role {
        UserRole::Admin => DbUserRole::Admin,
        UserRole::Agent => DbUserRole::Agent,
        UserRole::Customer => DbUserRole::Customer,
        UserRole::Provider => DbUserRole::Provider,
    }
}

// --- plans ---

fn row_to_plan(row: PlanRow) -> Result<InsurancePlan, PortError> {
    let currency = parse_currency(&row.currency)?;
    Ok(InsurancePlan {
        id: PlanId::from(row.plan_id),
        name: row.name,
        plan_type: db_to_domain_plan_type(row.plan_type),
        description: row.description,
        monthly_premium: Money::new(row.monthly_premium, currency),
        annual_premium: Money::new(row.annual_premium, currency),
        coverage_amount: Money::new(row.coverage_amount, currency),
        deductible: Money::new(row.deductible, currency),
        copay_percentage: row.copay_percentage,
        max_out_of_pocket: row.max_out_of_pocket.map(|m| Money::new(m, currency)),
        benefits: from_json("benefits", row.benefits)?,
        exclusions: from_json("exclusions", row.exclusions)?,
        is_active: row.is_active,
        currency,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn plan_to_row(plan: &InsurancePlan) -> Result<PlanRow, PortError> {
    Ok(PlanRow {
        plan_id: *plan.id.as_uuid(),
        name: plan.name.clone(),
        plan_type: domain_to_db_plan_type(plan.plan_type),
        description: plan.description.clone(),
        monthly_premium: plan.monthly_premium.amount(),
        annual_premium: plan.annual_premium.amount(),
        coverage_amount: plan.coverage_amount.amount(),
        deductible: plan.deductible.amount(),
        copay_percentage: plan.copay_percentage,
        max_out_of_pocket: plan.max_out_of_pocket.map(|m| m.amount()),
        benefits: to_json("benefits", &plan.benefits)?,
        exclusions: to_json("exclusions", &plan.exclusions)?,
        is_active: plan.is_active,
        currency: plan.currency.code().to_string(),
        created_at: plan.created_at,
        updated_at: plan.updated_at,
    })
}

fn db_to_domain_plan_type(t: DbPlanType) -> PlanType {
    match t {
        DbPlanType::Basic => PlanType::Basic,
        DbPlanType::Standard => PlanType::Standard,
        DbPlanType::Premium => PlanType::Premium,
        DbPlanType::Enterprise => PlanType::Enterprise,
    }
}

fn domain_to_db_plan_type(t: PlanType) -> DbPlanType {
    match t {
        PlanType::Basic => DbPlanType::Basic,
        PlanType::Standard => DbPlanType::Standard,
        PlanType::Premium => DbPlanType::Premium,
        PlanType::Enterprise => DbPlanType::Enterprise,
    }
}

// --- policies ---

fn row_to_policy(row: PolicyRow) -> Result<Policy, PortError> {
    let currency = parse_currency(&row.currency)?;
    Ok(Policy {
        id: PolicyId::from(row.policy_id),
        policy_number: row.policy_number,
        owner_id: UserId::from(row.owner_id),
        plan_id: PlanId::from(row.plan_id),
        start_date: row.start_date,
        end_date: row.end_date,
        status: db_to_domain_policy_status(row.status),
        premium_amount: Money::new(row.premium_amount, currency),
        payment_frequency: db_to_domain_frequency(row.payment_frequency),
        beneficiaries: from_json("beneficiaries", row.beneficiaries)?,
        currency,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn policy_to_row(policy: &Policy) -> Result<PolicyRow, PortError> {
    Ok(PolicyRow {
        policy_id: *policy.id.as_uuid(),
        policy_number: policy.policy_number.clone(),
        owner_id: *policy.owner_id.as_uuid(),
        plan_id: *policy.plan_id.as_uuid(),
        start_date: policy.start_date,
        end_date: policy.end_date,
        status: domain_to_db_policy_status(policy.status),
        premium_amount: policy.premium_amount.amount(),
        payment_frequency: domain_to_db_frequency(policy.payment_frequency),
        beneficiaries: to_json("beneficiaries", &policy.beneficiaries)?,
        currency: policy.currency.code().to_string(),
        created_at: policy.created_at,
        updated_at: policy.updated_at,
    })
}

fn db_to_domain_policy_status(s: DbPolicyStatus) -> PolicyStatus {
    match s {
        DbPolicyStatus::Pending => PolicyStatus::Pending,
        DbPolicyStatus::Active => PolicyStatus::Active,
        DbPolicyStatus::Expired => PolicyStatus::Expired,
        DbPolicyStatus::Cancelled => PolicyStatus::Cancelled,
    }
}

fn domain_to_db_policy_status(s: PolicyStatus) -> DbPolicyStatus {
    match s {
        PolicyStatus::Pending => DbPolicyStatus::Pending,
        PolicyStatus::Active => DbPolicyStatus::Active,
        PolicyStatus::Expired => DbPolicyStatus::Expired,
        PolicyStatus::Cancelled => DbPolicyStatus::Cancelled,
    }
}

fn db_to_domain_frequency(f: DbPaymentFrequency) -> PaymentFrequency {
    match f {
        DbPaymentFrequency::Monthly => PaymentFrequency::Monthly,
        DbPaymentFrequency::Annual => PaymentFrequency::Annual,
    }
}

fn domain_to_db_frequency(f: PaymentFrequency) -> DbPaymentFrequency {
    match f {
        PaymentFrequency::Monthly => DbPaymentFrequency::Monthly,
        PaymentFrequency::Annual => DbPaymentFrequency::Annual,
    }
}

// --- claims ---

fn row_to_claim(row: ClaimRow) -> Result<Claim, PortError> {
    let currency = parse_currency(&row.currency)?;
    let entitlement = row
        .entitlement
        .map(|json| from_json("entitlement", json))
        .transpose()?;
    Ok(Claim {
        id: ClaimId::from(row.claim_id),
        claim_number: row.claim_number,
        owner_id: UserId::from(row.owner_id),
        submitted_by: UserId::from(row.submitted_by),
        policy_id: PolicyId::from(row.policy_id),
        claim_date: row.claim_date,
        service_date: row.service_date,
        provider_name: row.provider_name,
        diagnosis_code: row.diagnosis_code,
        procedure_code: row.procedure_code,
        claimed_amount: Money::new(row.claimed_amount, currency),
        approved_amount: row.approved_amount.map(|a| Money::new(a, currency)),
        entitlement,
        status: db_to_domain_claim_status(row.status),
        notes: row.notes,
        reviewed_by: row.reviewed_by.map(UserId::from),
        review_date: row.review_date,
        currency,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn claim_to_row(claim: &Claim) -> Result<ClaimRow, PortError> {
    let entitlement = claim
        .entitlement
        .as_ref()
        .map(|split| to_json("entitlement", split))
        .transpose()?;
    Ok(ClaimRow {
        claim_id: *claim.id.as_uuid(),
        claim_number: claim.claim_number.clone(),
        owner_id: *claim.owner_id.as_uuid(),
        submitted_by: *claim.submitted_by.as_uuid(),
        policy_id: *claim.policy_id.as_uuid(),
        claim_date: claim.claim_date,
        service_date: claim.service_date,
        provider_name: claim.provider_name.clone(),
        diagnosis_code: claim.diagnosis_code.clone(),
        procedure_code: claim.procedure_code.clone(),
        claimed_amount: claim.claimed_amount.amount(),
        approved_amount: claim.approved_amount.map(|a| a.amount()),
        entitlement,
        status: domain_to_db_claim_status(claim.status),
        notes: claim.notes.clone(),
        reviewed_by: claim.reviewed_by.map(|id| *id.as_uuid()),
        review_date: claim.review_date,
        currency: claim.currency.code().to_string(),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    })
}

fn db_to_domain_claim_status(s: DbClaimStatus) -> ClaimStatus {
    match s {
        DbClaimStatus::Submitted => ClaimStatus::Submitted,
        DbClaimStatus::UnderReview => ClaimStatus::UnderReview,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
        DbClaimStatus::Paid => ClaimStatus::Paid,
    }
}

fn domain_to_db_claim_status(s: ClaimStatus) -> DbClaimStatus {
    match s {
        ClaimStatus::Submitted => DbClaimStatus::Submitted,
        ClaimStatus::UnderReview => DbClaimStatus::UnderReview,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
        ClaimStatus::Paid => DbClaimStatus::Paid,
    }
}

// --- payments ---

fn row_to_payment(row: PaymentRow) -> Result<Payment, PortError> {
    let currency = parse_currency(&row.currency)?;
    Ok(Payment {
        id: PaymentId::from(row.payment_id),
        payment_reference: row.payment_reference,
        owner_id: UserId::from(row.owner_id),
        recorded_by: UserId::from(row.recorded_by),
        policy_id: PolicyId::from(row.policy_id),
        amount: Money::new(row.amount, currency),
        method: db_to_domain_method(row.payment_method),
        transaction_id: row.transaction_id,
        status: db_to_domain_payment_status(row.status),
        description: row.description,
        payment_date: row.payment_date,
        created_at: row.created_at,
    })
}

fn payment_to_row(payment: &Payment) -> PaymentRow {
    PaymentRow {
        payment_id: *payment.id.as_uuid(),
        payment_reference: payment.payment_reference.clone(),
        owner_id: *payment.owner_id.as_uuid(),
        recorded_by: *payment.recorded_by.as_uuid(),
        policy_id: *payment.policy_id.as_uuid(),
        amount: payment.amount.amount(),
        payment_method: domain_to_db_method(payment.method),
        transaction_id: payment.transaction_id.clone(),
        status: domain_to_db_payment_status(payment.status),
        description: payment.description.clone(),
        currency: payment.amount.currency().code().to_string(),
        payment_date: payment.payment_date,
        created_at: payment.created_at,
    }
}

fn db_to_domain_method(m: DbPaymentMethod) -> PaymentMethod {
    match m {
        DbPaymentMethod::BankTransfer => PaymentMethod::BankTransfer,
        DbPaymentMethod::CreditCard => PaymentMethod::CreditCard,
        DbPaymentMethod::DebitCard => PaymentMethod::DebitCard,
        DbPaymentMethod::DirectDebit => PaymentMethod::DirectDebit,
        DbPaymentMethod::Check => PaymentMethod::Check,
        DbPaymentMethod::Cash => PaymentMethod::Cash,
        DbPaymentMethod::DigitalWallet => PaymentMethod::DigitalWallet,
    }
}

fn domain_to_db_method(m: PaymentMethod) -> DbPaymentMethod {
    match m {
        PaymentMethod::BankTransfer => DbPaymentMethod::BankTransfer,
        PaymentMethod::CreditCard => DbPaymentMethod::CreditCard,
        PaymentMethod::DebitCard => DbPaymentMethod::DebitCard,
        PaymentMethod::DirectDebit => DbPaymentMethod::DirectDebit,
        PaymentMethod::Check => DbPaymentMethod::Check,
        PaymentMethod::Cash => DbPaymentMethod::Cash,
        PaymentMethod::DigitalWallet => DbPaymentMethod::DigitalWallet,
    }
}

fn db_to_domain_payment_status(s: DbPaymentStatus) -> PaymentStatus {
    match s {
        DbPaymentStatus::Pending => PaymentStatus::Pending,
        DbPaymentStatus::Completed => PaymentStatus::Completed,
        DbPaymentStatus::Failed => PaymentStatus::Failed,
        DbPaymentStatus::Reversed => PaymentStatus::Reversed,
    }
}

fn domain_to_db_payment_status(s: PaymentStatus) -> DbPaymentStatus {
    match s {
        PaymentStatus::Pending => DbPaymentStatus::Pending,
        PaymentStatus::Completed => DbPaymentStatus::Completed,
        PaymentStatus::Failed => DbPaymentStatus::Failed,
        PaymentStatus::Reversed => DbPaymentStatus::Reversed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes_are_trimmed() {
        assert_eq!(parse_currency("USD").unwrap(), Currency::USD);
        assert_eq!(parse_currency("EUR ").unwrap(), Currency::EUR);
        assert!(parse_currency("XXX").is_err());
    }

    #[test]
    fn test_unpaged_filters_bind_null_bounds() {
        let criteria = claim_criteria(&ClaimFilter::default());
        assert_eq!(criteria.offset, None);
        assert_eq!(criteria.limit, None);

        let paged = payment_criteria(&PaymentFilter {
            page: Some(Page::new(20, 10)),
            ..Default::default()
        });
        assert_eq!(paged.offset, Some(20));
        assert_eq!(paged.limit, Some(10));
    }

    #[test]
    fn test_status_mappings_round_trip() {
        for status in ClaimStatus::ALL {
            assert_eq!(db_to_domain_claim_status(domain_to_db_claim_status(status)), status);
        }
        for method in PaymentMethod::ALL {
            assert_eq!(db_to_domain_method(domain_to_db_method(method)), method);
        }
        for role in UserRole::ALL {
            assert_eq!(db_to_domain_role(domain_to_db_role(role)), role);
        }
    }
}
