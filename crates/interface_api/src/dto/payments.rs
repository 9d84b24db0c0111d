//! Payment DTOs

use chrono::{DateTime, Utc};
use core_kernel::Currency;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use domain_billing::{Payment, PaymentMethod, PaymentStatus};

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub payment_reference: String,
    pub policy_id: Uuid,
    pub owner_id: Uuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub payment_date: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.into(),
            payment_reference: payment.payment_reference,
            policy_id: payment.policy_id.into(),
            owner_id: payment.owner_id.into(),
            amount: payment.amount.amount(),
            currency: payment.amount.currency(),
            method: payment.method,
            transaction_id: payment.transaction_id,
            status: payment.status,
            description: payment.description,
            payment_date: payment.payment_date,
        }
    }
}
