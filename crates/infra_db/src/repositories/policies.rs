//! Policy repository
//!
//! Keyed reads can take a row lock (`SELECT ... FOR UPDATE`) which is held
//! until the surrounding transaction ends.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database representation of a policy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "policy_status", rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

/// Database representation of a premium billing frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_frequency", rename_all = "snake_case")]
pub enum PaymentFrequency {
    Monthly,
    Annual,
}

/// Database row for a policy
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyRow {
    pub policy_id: Uuid,
    pub policy_number: String,
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
    pub premium_amount: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub beneficiaries: Json<serde_json::Value>,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing criteria; `None` fields do not restrict
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyCriteria {
    pub owner_id: Option<Uuid>,
    pub status: Option<PolicyStatus>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

const SELECT_POLICY: &str = r#"
    SELECT policy_id, policy_number, owner_id, plan_id, start_date, end_date, status,
           premium_amount, payment_frequency, beneficiaries, currency, created_at, updated_at
    FROM policies
"#;

const POLICY_CRITERIA: &str = r#"
    WHERE ($1::uuid IS NULL OR owner_id = $1)
      AND ($2::policy_status IS NULL OR status = $2)
"#;

/// Data access for the `policies` table
pub struct PolicyRepository;

impl PolicyRepository {
    pub async fn find_by_id(
        conn: &mut PgConnection,
        policy_id: Uuid,
        for_update: bool,
    ) -> Result<Option<PolicyRow>, DatabaseError> {
        let mut sql = format!("{SELECT_POLICY} WHERE policy_id = $1");
        if for_update {
            sql.push_str(" FOR UPDATE");
        }
        let row = sqlx::query_as::<_, PolicyRow>(&sql)
            .bind(policy_id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn insert(conn: &mut PgConnection, policy: &PolicyRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO policies (
                policy_id, policy_number, owner_id, plan_id, start_date, end_date, status,
                premium_amount, payment_frequency, beneficiaries, currency, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(policy.policy_id)
        .bind(&policy.policy_number)
        .bind(policy.owner_id)
        .bind(policy.plan_id)
        .bind(policy.start_date)
        .bind(policy.end_date)
        .bind(policy.status)
        .bind(policy.premium_amount)
        .bind(policy.payment_frequency)
        .bind(&policy.beneficiaries)
        .bind(&policy.currency)
        .bind(policy.created_at)
        .bind(policy.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Persists a status change; the financial terms of a policy never change
    pub async fn update(conn: &mut PgConnection, policy: &PolicyRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE policies
            SET status = $2, beneficiaries = $3, updated_at = $4
            WHERE policy_id = $1
            "#,
        )
        .bind(policy.policy_id)
        .bind(policy.status)
        .bind(&policy.beneficiaries)
        .bind(policy.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Policy", policy.policy_id));
        }
        Ok(())
    }

    pub async fn list(
        conn: &mut PgConnection,
        criteria: PolicyCriteria,
    ) -> Result<Vec<PolicyRow>, DatabaseError> {
        let sql = format!(
            "{SELECT_POLICY} {POLICY_CRITERIA} ORDER BY created_at, policy_id OFFSET $3 LIMIT $4"
        );
        let rows = sqlx::query_as::<_, PolicyRow>(&sql)
            .bind(criteria.owner_id)
            .bind(criteria.status)
            .bind(criteria.offset)
            .bind(criteria.limit)
            .fetch_all(conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(
        conn: &mut PgConnection,
        criteria: PolicyCriteria,
    ) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM policies {POLICY_CRITERIA}");
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(criteria.owner_id)
            .bind(criteria.status)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
