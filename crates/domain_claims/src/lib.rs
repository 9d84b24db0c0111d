//! Claims Domain
//!
//! This crate implements the claim lifecycle from submission through review
//! to payment, and the split of an approved amount between insurer and
//! patient.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Under Review -> Approved -> Paid
//!                           \-> Rejected
//! ```

pub mod claim;
pub mod entitlement;
pub mod error;

pub use claim::{Claim, ClaimStatus, NewClaim, ReviewDecision};
pub use entitlement::{
    compute_entitlement, remaining_coverage, Accumulators, CostSharingTerms, EntitlementSplit,
};
pub use error::ClaimError;
