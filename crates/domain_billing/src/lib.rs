//! Billing Domain
//!
//! Premium payments recorded against policies. A payment is an independent
//! ledger entry: it neither settles claims nor moves a policy through its
//! lifecycle.

pub mod payment;
pub mod error;

pub use payment::{Payment, PaymentMethod, PaymentStatus, NewPayment};
pub use error::BillingError;
