//! Billing domain errors

use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Amount outside its allowed range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Payment method not recognised
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Calculation error
    #[error("Calculation error: {0}")]
    CalculationError(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
