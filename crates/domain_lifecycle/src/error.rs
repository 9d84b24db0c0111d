//! Lifecycle errors
//!
//! Every service in this crate fails with a [`LifecycleError`]. Domain crate
//! errors are folded into it with `From`, and each variant belongs to one
//! [`ErrorKind`] that the request layer maps onto a response.

use thiserror::Error;

use core_kernel::{ClaimId, PlanId, PolicyId, PortError, UserId};
use domain_billing::BillingError;
use domain_claims::ClaimError;
use domain_identity::IdentityError;
use domain_policy::{PolicyError, PolicyStatus};

/// Coarse classification of a lifecycle failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Forbidden,
    InvalidTransition,
    InvalidAmount,
    Conflict,
    Validation,
    Internal,
}

/// Errors returned by the lifecycle manager and the services around it
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Plan not found or inactive: {0}")]
    PlanNotFound(String),

    #[error("Policy not found: {0}")]
    PolicyNotFound(PolicyId),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("User not found")]
    UserNotFound(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Policy {0} belongs to another user")]
    PolicyNotOwned(PolicyId),

    #[error("Policy {policy} is {status}, claims require an active policy")]
    PolicyNotActive {
        policy: PolicyId,
        status: PolicyStatus,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::PlanNotFound(_)
            | LifecycleError::PolicyNotFound(_)
            | LifecycleError::ClaimNotFound(_)
            | LifecycleError::UserNotFound(_)
            | LifecycleError::NotFound(_) => ErrorKind::NotFound,
            LifecycleError::PolicyNotOwned(_) | LifecycleError::Forbidden(_) => {
                ErrorKind::Forbidden
            }
            LifecycleError::Unauthorized(_) => ErrorKind::Unauthorized,
            LifecycleError::PolicyNotActive { .. } | LifecycleError::InvalidTransition(_) => {
                ErrorKind::InvalidTransition
            }
            LifecycleError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            LifecycleError::Conflict(_) => ErrorKind::Conflict,
            LifecycleError::Validation(_) => ErrorKind::Validation,
            LifecycleError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        LifecycleError::Forbidden(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        LifecycleError::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        LifecycleError::Validation(message.into())
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        LifecycleError::PlanNotFound(id.to_string())
    }

    pub fn user_not_found(id: UserId) -> Self {
        LifecycleError::UserNotFound(id.to_string())
    }
}

impl From<PolicyError> for LifecycleError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::InvalidStateTransition { .. } | PolicyError::NotYetExpired { .. } => {
                LifecycleError::InvalidTransition(err.to_string())
            }
            PolicyError::PlanUnavailable(plan) => LifecycleError::PlanNotFound(plan),
            PolicyError::InvalidAmount(_) | PolicyError::Financial(_) => {
                LifecycleError::InvalidAmount(err.to_string())
            }
            PolicyError::BeneficiaryError(_)
            | PolicyError::Validation(_)
            | PolicyError::Period(_) => LifecycleError::Validation(err.to_string()),
        }
    }
}

impl From<ClaimError> for LifecycleError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::InvalidStatusTransition { .. } => {
                LifecycleError::InvalidTransition(err.to_string())
            }
            ClaimError::InvalidAmount(_) | ClaimError::Financial(_) => {
                LifecycleError::InvalidAmount(err.to_string())
            }
            ClaimError::Validation(_) => LifecycleError::Validation(err.to_string()),
        }
    }
}

impl From<BillingError> for LifecycleError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidAmount(_) | BillingError::CalculationError(_) => {
                LifecycleError::InvalidAmount(err.to_string())
            }
            BillingError::UnknownPaymentMethod(_) | BillingError::InvalidOperation(_) => {
                LifecycleError::Validation(err.to_string())
            }
        }
    }
}

impl From<IdentityError> for LifecycleError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateEmail(_) | IdentityError::DuplicateUsername(_) => {
                LifecycleError::Conflict(err.to_string())
            }
            IdentityError::InvalidCredentials | IdentityError::InactiveAccount => {
                LifecycleError::Unauthorized(err.to_string())
            }
            IdentityError::RoleNotSelfAssignable(_) => LifecycleError::Forbidden(err.to_string()),
            IdentityError::UserNotFound(id) => LifecycleError::UserNotFound(id),
            IdentityError::Validation(_) | IdentityError::UnknownRole(_) => {
                LifecycleError::Validation(err.to_string())
            }
            IdentityError::Hashing(_) => LifecycleError::Internal(err.to_string()),
        }
    }
}

impl From<PortError> for LifecycleError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Conflict { message } => LifecycleError::Conflict(message),
            PortError::Validation { message, .. } => LifecycleError::Validation(message),
            PortError::NotFound { entity_type, id } => {
                LifecycleError::NotFound(format!("{} {}", entity_type, id))
            }
            other => LifecycleError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_kinds() {
        let err: LifecycleError = PolicyError::InvalidStateTransition {
            from: "active".into(),
            to: "active".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);

        let err: LifecycleError = ClaimError::invalid_amount("too much").into();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);

        let err: LifecycleError = IdentityError::DuplicateEmail("a@b.c".into()).into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err: LifecycleError = IdentityError::InvalidCredentials.into();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_port_errors_hide_details_behind_internal() {
        let err: LifecycleError = PortError::connection("pool closed").into();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let err: LifecycleError = PortError::conflict("duplicate policy number").into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_policy_not_active_is_a_transition_error() {
        let err = LifecycleError::PolicyNotActive {
            policy: PolicyId::new(),
            status: PolicyStatus::Pending,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert!(err.to_string().contains("pending"));
    }
}
