//! Claim repository
//!
//! The entitlement split of a decided claim is stored as JSONB next to the
//! approved amount so that accumulators can be rebuilt from claim rows alone.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database representation of a claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Paid,
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub owner_id: Uuid,
    pub submitted_by: Uuid,
    pub policy_id: Uuid,
    pub claim_date: DateTime<Utc>,
    pub service_date: NaiveDate,
    pub provider_name: String,
    pub diagnosis_code: Option<String>,
    pub procedure_code: Option<String>,
    pub claimed_amount: Decimal,
    pub approved_amount: Option<Decimal>,
    pub entitlement: Option<Json<serde_json::Value>>,
    pub status: ClaimStatus,
    pub notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub review_date: Option<DateTime<Utc>>,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing criteria
///
/// `claimed_from` is inclusive, `claimed_before` exclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimCriteria {
    pub owner_id: Option<Uuid>,
    pub policy_id: Option<Uuid>,
    pub status: Option<ClaimStatus>,
    pub claimed_from: Option<DateTime<Utc>>,
    pub claimed_before: Option<DateTime<Utc>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

const SELECT_CLAIM: &str = r#"
    SELECT claim_id, claim_number, owner_id, submitted_by, policy_id, claim_date,
           service_date, provider_name, diagnosis_code, procedure_code, claimed_amount,
           approved_amount, entitlement, status, notes, reviewed_by, review_date,
           currency, created_at, updated_at
    FROM claims
"#;

const CLAIM_CRITERIA: &str = r#"
    WHERE ($1::uuid IS NULL OR owner_id = $1)
      AND ($2::uuid IS NULL OR policy_id = $2)
      AND ($3::claim_status IS NULL OR status = $3)
      AND ($4::timestamptz IS NULL OR claim_date >= $4)
      AND ($5::timestamptz IS NULL OR claim_date < $5)
"#;

/// Data access for the `claims` table
pub struct ClaimRepository;

impl ClaimRepository {
    pub async fn find_by_id(
        conn: &mut PgConnection,
        claim_id: Uuid,
        for_update: bool,
    ) -> Result<Option<ClaimRow>, DatabaseError> {
        let mut sql = format!("{SELECT_CLAIM} WHERE claim_id = $1");
        if for_update {
            sql.push_str(" FOR UPDATE");
        }
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn insert(conn: &mut PgConnection, claim: &ClaimRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, claim_number, owner_id, submitted_by, policy_id, claim_date,
                service_date, provider_name, diagnosis_code, procedure_code, claimed_amount,
                approved_amount, entitlement, status, notes, reviewed_by, review_date,
                currency, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(claim.claim_id)
        .bind(&claim.claim_number)
        .bind(claim.owner_id)
        .bind(claim.submitted_by)
        .bind(claim.policy_id)
        .bind(claim.claim_date)
        .bind(claim.service_date)
        .bind(&claim.provider_name)
        .bind(&claim.diagnosis_code)
        .bind(&claim.procedure_code)
        .bind(claim.claimed_amount)
        .bind(claim.approved_amount)
        .bind(&claim.entitlement)
        .bind(claim.status)
        .bind(&claim.notes)
        .bind(claim.reviewed_by)
        .bind(claim.review_date)
        .bind(&claim.currency)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Persists a review decision
    pub async fn update(conn: &mut PgConnection, claim: &ClaimRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET status = $2, approved_amount = $3, entitlement = $4, notes = $5,
                reviewed_by = $6, review_date = $7, updated_at = $8
            WHERE claim_id = $1
            "#,
        )
        .bind(claim.claim_id)
        .bind(claim.status)
        .bind(claim.approved_amount)
        .bind(&claim.entitlement)
        .bind(&claim.notes)
        .bind(claim.reviewed_by)
        .bind(claim.review_date)
        .bind(claim.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim.claim_id));
        }
        Ok(())
    }

    pub async fn list(
        conn: &mut PgConnection,
        criteria: ClaimCriteria,
    ) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "{SELECT_CLAIM} {CLAIM_CRITERIA} ORDER BY created_at, claim_id OFFSET $6 LIMIT $7"
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(criteria.owner_id)
            .bind(criteria.policy_id)
            .bind(criteria.status)
            .bind(criteria.claimed_from)
            .bind(criteria.claimed_before)
            .bind(criteria.offset)
            .bind(criteria.limit)
            .fetch_all(conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(
        conn: &mut PgConnection,
        criteria: ClaimCriteria,
    ) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM claims {CLAIM_CRITERIA}");
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(criteria.owner_id)
            .bind(criteria.policy_id)
            .bind(criteria.status)
            .bind(criteria.claimed_from)
            .bind(criteria.claimed_before)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
