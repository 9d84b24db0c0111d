//! Registration rules
//!
//! Field-level checks come from the `Validate` derive on [`NewUser`]; the
//! rules here are the ones a derive cannot express.

use validator::Validate;

use crate::error::IdentityError;
use crate::role::UserRole;
use crate::user::NewUser;

/// Validates registration input and resolves the role to grant
///
/// `caller_role` is the role of an authenticated caller creating the account,
/// or `None` for self-registration.
pub fn validate_registration(
    input: &NewUser,
    caller_role: Option<UserRole>,
) -> Result<UserRole, IdentityError> {
    input
        .validate()
        .map_err(|e| IdentityError::validation(e.to_string()))?;

    let username = input.username.trim();
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(IdentityError::validation(
            "username: only letters, digits, '_', '-' and '.' are allowed",
        ));
    }

    if input.password.trim().is_empty() {
        return Err(IdentityError::validation("password: must not be blank"));
    }

    let requested = input.role.unwrap_or_default();
    match caller_role {
        Some(UserRole::Admin) => Ok(requested),
        _ if requested.is_self_assignable() => Ok(requested),
        _ => Err(IdentityError::RoleNotSelfAssignable(requested)),
    }
}
