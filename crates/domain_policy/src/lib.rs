//! Policy Domain
//!
//! Insurance plans and the policies issued against them.
//!
//! # Policy Lifecycle
//!
//! ```text
//! pending -> active -> expired
//!                  \-> cancelled
//! ```
//!
//! Issuance fixes the coverage period (start + 365 days) and the premium
//! (monthly or annual price of the plan). Neither changes afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{InsurancePlan, Policy, PolicyTerms, PaymentFrequency};
//!
//! let plan = InsurancePlan::create(new_plan)?;
//! let mut policy = Policy::issue(&plan, PolicyTerms {
//!     policy_number: "POL0123456789".into(),
//!     owner_id,
//!     start_date,
//!     frequency: PaymentFrequency::Monthly,
//!     beneficiaries: vec![],
//!     term_days: 365,
//! })?;
//! policy.activate()?;
//! ```

pub mod plan;
pub mod policy;
pub mod beneficiary;
pub mod error;

pub use plan::{InsurancePlan, NewPlan, PlanType, Benefit};
pub use policy::{Policy, PolicyStatus, PaymentFrequency, PolicyTerms};
pub use beneficiary::{Beneficiary, validate_beneficiaries};
pub use error::PolicyError;
