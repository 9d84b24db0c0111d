//! Claims domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Financial error: {0}")]
    Financial(#[from] MoneyError),
}

impl ClaimError {
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        ClaimError::InvalidAmount(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }
}
