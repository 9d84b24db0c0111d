//! Premium payment repository
//!
//! Payments are append-only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database representation of a payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    CreditCard,
    DebitCard,
    DirectDebit,
    Check,
    Cash,
    DigitalWallet,
}

/// Database representation of a payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
}

/// Database row for a payment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: Uuid,
    pub payment_reference: String,
    pub owner_id: Uuid,
    pub recorded_by: Uuid,
    pub policy_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Listing criteria
///
/// `paid_from` is inclusive, `paid_before` exclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCriteria {
    pub owner_id: Option<Uuid>,
    pub policy_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
    pub paid_from: Option<DateTime<Utc>>,
    pub paid_before: Option<DateTime<Utc>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

const SELECT_PAYMENT: &str = r#"
    SELECT payment_id, payment_reference, owner_id, recorded_by, policy_id, amount,
           payment_method, transaction_id, status, description, currency,
           payment_date, created_at
    FROM payments
"#;

const PAYMENT_CRITERIA: &str = r#"
    WHERE ($1::uuid IS NULL OR owner_id = $1)
      AND ($2::uuid IS NULL OR policy_id = $2)
      AND ($3::payment_status IS NULL OR status = $3)
      AND ($4::timestamptz IS NULL OR payment_date >= $4)
      AND ($5::timestamptz IS NULL OR payment_date < $5)
"#;

/// Data access for the `payments` table
pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        payment: &PaymentRow,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, payment_reference, owner_id, recorded_by, policy_id, amount,
                payment_method, transaction_id, status, description, currency,
                payment_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(payment.payment_id)
        .bind(&payment.payment_reference)
        .bind(payment.owner_id)
        .bind(payment.recorded_by)
        .bind(payment.policy_id)
        .bind(payment.amount)
        .bind(payment.payment_method)
        .bind(&payment.transaction_id)
        .bind(payment.status)
        .bind(&payment.description)
        .bind(&payment.currency)
        .bind(payment.payment_date)
        .bind(payment.created_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list(
        conn: &mut PgConnection,
        criteria: PaymentCriteria,
    ) -> Result<Vec<PaymentRow>, DatabaseError> {
        let sql = format!(
            "{SELECT_PAYMENT} {PAYMENT_CRITERIA} ORDER BY created_at, payment_id OFFSET $6 LIMIT $7"
        );
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(criteria.owner_id)
            .bind(criteria.policy_id)
            .bind(criteria.status)
            .bind(criteria.paid_from)
            .bind(criteria.paid_before)
            .bind(criteria.offset)
            .bind(criteria.limit)
            .fetch_all(conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(
        conn: &mut PgConnection,
        criteria: PaymentCriteria,
    ) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM payments {PAYMENT_CRITERIA}");
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(criteria.owner_id)
            .bind(criteria.policy_id)
            .bind(criteria.status)
            .bind(criteria.paid_from)
            .bind(criteria.paid_before)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
