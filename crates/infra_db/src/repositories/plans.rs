//! Insurance plan repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database representation of a plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "plan_type", rename_all = "snake_case")]
pub enum PlanType {
    Basic,
    Standard,
    Premium,
    Enterprise,
}

/// Database row for an insurance plan
///
/// `benefits` and `exclusions` are JSONB arrays.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub plan_id: Uuid,
    pub name: String,
    pub plan_type: PlanType,
    pub description: Option<String>,
    pub monthly_premium: Decimal,
    pub annual_premium: Decimal,
    pub coverage_amount: Decimal,
    pub deductible: Decimal,
    pub copay_percentage: Decimal,
    pub max_out_of_pocket: Option<Decimal>,
    pub benefits: Json<serde_json::Value>,
    pub exclusions: Json<serde_json::Value>,
    pub is_active: bool,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_PLAN: &str = r#"
    SELECT plan_id, name, plan_type, description, monthly_premium, annual_premium,
           coverage_amount, deductible, copay_percentage, max_out_of_pocket,
           benefits, exclusions, is_active, currency, created_at, updated_at
    FROM insurance_plans
"#;

/// Data access for the `insurance_plans` table
pub struct PlanRepository;

impl PlanRepository {
    pub async fn find_by_id(
        conn: &mut PgConnection,
        plan_id: Uuid,
    ) -> Result<Option<PlanRow>, DatabaseError> {
        let sql = format!("{SELECT_PLAN} WHERE plan_id = $1");
        let row = sqlx::query_as::<_, PlanRow>(&sql)
            .bind(plan_id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn insert(conn: &mut PgConnection, plan: &PlanRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO insurance_plans (
                plan_id, name, plan_type, description, monthly_premium, annual_premium,
                coverage_amount, deductible, copay_percentage, max_out_of_pocket,
                benefits, exclusions, is_active, currency, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(plan.plan_id)
        .bind(&plan.name)
        .bind(plan.plan_type)
        .bind(&plan.description)
        .bind(plan.monthly_premium)
        .bind(plan.annual_premium)
        .bind(plan.coverage_amount)
        .bind(plan.deductible)
        .bind(plan.copay_percentage)
        .bind(plan.max_out_of_pocket)
        .bind(&plan.benefits)
        .bind(&plan.exclusions)
        .bind(plan.is_active)
        .bind(&plan.currency)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Plans are only ever retired in place; prices are fixed at creation
    pub async fn update(conn: &mut PgConnection, plan: &PlanRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE insurance_plans
            SET name = $2, description = $3, benefits = $4, exclusions = $5,
                is_active = $6, updated_at = $7
            WHERE plan_id = $1
            "#,
        )
        .bind(plan.plan_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(&plan.benefits)
        .bind(&plan.exclusions)
        .bind(plan.is_active)
        .bind(plan.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("InsurancePlan", plan.plan_id));
        }
        Ok(())
    }

    pub async fn list_active(
        conn: &mut PgConnection,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PlanRow>, DatabaseError> {
        let sql = format!(
            "{SELECT_PLAN} WHERE is_active ORDER BY created_at, plan_id OFFSET $1 LIMIT $2"
        );
        let rows = sqlx::query_as::<_, PlanRow>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(conn)
            .await?;
        Ok(rows)
    }
}
