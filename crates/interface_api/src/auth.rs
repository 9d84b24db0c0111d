//! Authentication
//!
//! Access tokens are HS256 JWTs carrying the user id and the role at issue
//! time. The role in the token is informational: every request re-resolves
//! the caller through [`AccountService::resolve_actor`], so a deactivated
//! user or a changed role takes effect immediately.
//!
//! [`AccountService::resolve_actor`]: domain_lifecycle::AccountService::resolve_actor

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use core_kernel::UserId;
use domain_identity::{Actor, UserRole};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at the time the token was issued
    pub role: UserRole,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `role` - User's role
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    user_id: UserId,
    role: UserRole,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs.min(i32::MAX as u64) as i64);

    let claims = Claims {
        sub: user_id.as_uuid().to_string(),
        role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Extracts the token from an `Authorization: Bearer ...` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the calling user from request headers
///
/// # Errors
///
/// `Unauthorized` when the header is missing, the token is invalid or
/// expired, or the account is unknown or inactive.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Actor, ApiError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = validate_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = %e, "Token validation failed");
        e
    })?;

    state
        .accounts
        .resolve_actor(claims.user_id()?)
        .await
        .map_err(|e| {
            warn!(user = %claims.sub, error = %e, "Token subject rejected");
            ApiError::Unauthorized(AuthError::InvalidToken.to_string())
        })
}

/// Like [`authenticate`], but an absent header yields `None`
///
/// A header that is present but invalid is still rejected.
pub async fn authenticate_optional(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Actor>, ApiError> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Ok(None);
    }
    authenticate(state, headers).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_subject_and_role() {
        let user = UserId::new();
        let token = create_token(user, UserRole::Agent, SECRET, 60).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), user);
        assert_eq!(claims.role, UserRole::Agent);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token(UserId::new(), UserRole::Customer, SECRET, 60).unwrap();
        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            role: UserRole::Customer,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
