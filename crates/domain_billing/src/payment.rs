//! Premium payments
//!
//! Payments are ledger entries against a policy. They carry no link to
//! claims and never change policy or claim status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money, PaymentId, PolicyId, UserId};

use crate::error::BillingError;

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer
    BankTransfer,
    /// Credit card
    CreditCard,
    /// Debit card
    DebitCard,
    /// Direct debit
    DirectDebit,
    /// Check/cheque
    Check,
    /// Cash
    Cash,
    /// Digital wallet
    DigitalWallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::BankTransfer,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::DirectDebit,
        PaymentMethod::Check,
        PaymentMethod::Cash,
        PaymentMethod::DigitalWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::DirectDebit => "direct_debit",
            PaymentMethod::Check => "check",
            PaymentMethod::Cash => "cash",
            PaymentMethod::DigitalWallet => "digital_wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| BillingError::UnknownPaymentMethod(s.to_string()))
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment is being processed
    Pending,
    /// Payment completed successfully
    Completed,
    /// Payment failed
    Failed,
    /// Payment was reversed/refunded
    Reversed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Reversed => "reversed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "reversed" => Ok(PaymentStatus::Reversed),
            other => Err(BillingError::InvalidOperation(format!(
                "unknown payment status: {}",
                other
            ))),
        }
    }
}

/// Input for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub policy_id: PolicyId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A payment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Human-readable reference (PAY + digits)
    pub payment_reference: String,
    /// Owner of the policy paid for
    pub owner_id: UserId,
    /// Caller who recorded the payment
    pub recorded_by: UserId,
    pub policy_id: PolicyId,
    pub amount: Money,
    pub method: PaymentMethod,
    /// External reference (bank ref, card processor id)
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Records a completed payment
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - amount not greater than zero once rounded to the
    ///   currency, or above [`core_kernel::MAX_AMOUNT`]
    pub fn record(
        payment_reference: String,
        owner_id: UserId,
        recorded_by: UserId,
        input: NewPayment,
        currency: Currency,
    ) -> Result<Self, BillingError> {
        let amount = Money::positive_input(input.amount, currency)
            .map_err(|e| BillingError::InvalidAmount(format!("payment amount: {}", e)))?;

        let now = Utc::now();
        Ok(Self {
            id: PaymentId::new_v7(),
            payment_reference,
            owner_id,
            recorded_by,
            policy_id: input.policy_id,
            amount,
            method: input.method,
            transaction_id: input.transaction_id,
            status: PaymentStatus::Completed,
            description: input.description,
            payment_date: now,
            created_at: now,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}
