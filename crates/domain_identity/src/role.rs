//! Roles, capabilities and the authenticated caller

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::UserId;

use crate::error::IdentityError;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    Customer,
    Provider,
}

/// A permission checked by the lifecycle manager and the services around it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Activate, cancel and expire policies
    ManagePolicies,
    /// Decide on claims (approve, reject, mark paid)
    ReviewClaims,
    /// Read claims regardless of owner
    ViewAllClaims,
    /// Read policies and payments regardless of owner
    ViewAllRecords,
    /// Submit claims and record payments against any policy
    ActOnAnyPolicy,
    /// Create and retire insurance plans
    ManageCatalog,
    /// List, deactivate and re-role user accounts
    ManageUsers,
    /// Revenue reporting and the system-wide dashboard
    ViewReports,
}

impl UserRole {
    /// Every role, in display order
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Agent,
        UserRole::Customer,
        UserRole::Provider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Agent => "agent",
            UserRole::Customer => "customer",
            UserRole::Provider => "provider",
        }
    }

    /// Returns true if this role holds the capability
    pub fn has(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            UserRole::Admin => true,
            UserRole::Agent => matches!(capability, ReviewClaims | ViewAllClaims),
            UserRole::Customer | UserRole::Provider => false,
        }
    }

    /// Roles a caller may pick for themselves at registration
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, UserRole::Customer | UserRole::Provider)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Customer
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IdentityError::UnknownRole(s.to_string()))
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.has(capability)
    }

    /// True if the caller owns a record or holds the capability that bypasses ownership
    pub fn owns_or_can(&self, owner: UserId, capability: Capability) -> bool {
        self.user_id == owner || self.can(capability)
    }
}
