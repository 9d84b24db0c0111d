//! Identity Domain
//!
//! Users of the administration backend and what each of them may do.
//!
//! # Roles
//!
//! | Role | Capabilities |
//! |---|---|
//! | admin | everything |
//! | agent | review claims, read every claim |
//! | customer | own policies, claims and payments only |
//! | provider | own policies, claims and payments only |
//!
//! Authorization decisions are made against an [`Actor`], the
//! authenticated caller as supplied by the API layer. The domain never
//! sees tokens or raw credentials beyond the registration boundary.

pub mod user;
pub mod role;
pub mod validation;
pub mod password;
pub mod error;

pub use user::{User, NewUser};
pub use role::{UserRole, Capability, Actor};
pub use validation::validate_registration;
pub use password::{CredentialHasher, Argon2Hasher};
pub use error::IdentityError;
