//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::UserId;

use crate::role::{Actor, UserRole};

/// A registered account
///
/// The credential hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "must be 3 to 50 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub full_name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    /// Requested role; customer when absent
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl User {
    /// Creates an active account from validated registration input and a credential hash
    pub fn new(input: &NewUser, role: UserRole, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new_v7(),
            email: input.email.trim().to_lowercase(),
            username: input.username.trim().to_string(),
            password_hash,
            full_name: input.full_name.trim().to_string(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn assign_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> NewUser {
        NewUser {
            email: " Jane@Example.com ".to_string(),
            username: "jane".to_string(),
            password: "correct horse".to_string(),
            full_name: "Jane Doe".to_string(),
            phone: None,
            address: None,
            role: None,
        }
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new(&registration(), UserRole::Customer, "hash".into());
        assert_eq!(user.email, "jane@example.com");
        assert!(user.is_active);
    }

    #[test]
    fn test_hash_is_not_serialized() {
        let user = User::new(&registration(), UserRole::Customer, "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_deactivate() {
        let mut user = User::new(&registration(), UserRole::Provider, "hash".into());
        user.deactivate();
        assert!(!user.is_active);
    }
}
