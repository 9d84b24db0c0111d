//! Policy domain errors
//!
//! This module defines all error types that can occur within plan
//! management and the policy lifecycle.

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::{MoneyError, PeriodError};

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Invalid state transition attempted
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: String,
        to: String,
    },

    /// Expiry requested before the coverage period has run out
    #[error("Policy cannot expire before its end date {end_date}")]
    NotYetExpired {
        end_date: NaiveDate,
    },

    /// Plan is retired and cannot be issued
    #[error("Plan not available for issuance: {0}")]
    PlanUnavailable(String),

    /// A monetary field violates its bounds
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Beneficiary validation error
    #[error("Beneficiary error: {0}")]
    BeneficiaryError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Coverage period could not be derived
    #[error("Coverage period error: {0}")]
    Period(#[from] PeriodError),

    /// Financial calculation error
    #[error("Financial error: {0}")]
    Financial(#[from] MoneyError),
}

impl PolicyError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PolicyError::Validation(message.into())
    }

    /// Creates an invalid amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        PolicyError::InvalidAmount(message.into())
    }

    pub fn beneficiary(message: impl Into<String>) -> Self {
        PolicyError::BeneficiaryError(message.into())
    }
}
