//! Core Kernel - Foundational types for the healthcare insurance core
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money and Rate types with precise decimal arithmetic
//! - Strongly-typed identifiers for users, plans, policies, claims and payments
//! - Coverage periods for policy terms
//! - Port error and health-check types for the hexagonal adapters

pub mod money;
pub mod period;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError, Rate, MAX_AMOUNT};
pub use period::{CoveragePeriod, PeriodError, DEFAULT_TERM_DAYS};
pub use identifiers::{UserId, PlanId, PolicyId, ClaimId, PaymentId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;
