//! Account DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_identity::{User, UserRole};

/// OAuth2 password-grant form posted to `/token`
#[derive(Debug, Deserialize, Validate)]
pub struct TokenForm {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            phone: user.phone,
            address: user.address,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}
