//! Repository implementations for the insurance tables
//!
//! Each repository wraps the SQL for one table and maps between database
//! rows and plain column values. Repositories are stateless: every function
//! runs on a connection borrowed from the caller's transaction, so several
//! repositories can take part in one unit of work.

pub mod claims;
pub mod payments;
pub mod plans;
pub mod policies;
pub mod users;

pub use claims::{ClaimCriteria, ClaimRepository, ClaimRow};
pub use payments::{PaymentCriteria, PaymentRepository, PaymentRow};
pub use plans::{PlanRepository, PlanRow};
pub use policies::{PolicyCriteria, PolicyRepository, PolicyRow};
pub use users::{UserRepository, UserRow};
