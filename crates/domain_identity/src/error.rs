//! Identity domain errors

use thiserror::Error;

use crate::role::UserRole;

/// Errors that can occur in the identity domain
#[derive(Debug, Error)]
pub enum IdentityError {
    /// User with the given id or username was not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Email is already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Username is already taken
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    /// Unknown username or wrong password
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// The account has been deactivated
    #[error("Inactive user")]
    InactiveAccount,

    /// Registration input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested role cannot be chosen at self-registration
    #[error("Role {0} cannot be self-assigned")]
    RoleNotSelfAssignable(UserRole),

    /// Unknown role name
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Password hashing or hash parsing failed
    #[error("Credential hashing failed: {0}")]
    Hashing(String),
}

impl IdentityError {
    pub fn validation(message: impl Into<String>) -> Self {
        IdentityError::Validation(message.into())
    }

    pub fn not_found(id: impl std::fmt::Display) -> Self {
        IdentityError::UserNotFound(id.to_string())
    }
}
