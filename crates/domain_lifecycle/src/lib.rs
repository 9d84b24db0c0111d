//! Lifecycle Domain - Entitlement & lifecycle management
//!
//! This crate ties the plan, policy, claim, payment and identity domains
//! together behind transactional services:
//! - [`LifecycleManager`]: policy issuance and status changes, claim
//!   submission and review with entitlement computation, payments
//! - [`AccountService`]: registration, authentication and user administration
//! - [`PlanCatalog`]: plan creation and lookup
//! - [`RecordQueries`] and [`ReportingService`]: owner-scoped reads, the
//!   dashboard and summary reports
//!
//! Storage is reached through the [`InsuranceStore`] port; [`InMemoryStore`]
//! is a complete implementation used in tests.

mod access;
pub mod accounts;
pub mod catalog;
pub mod error;
pub mod manager;
pub mod memory;
pub mod numbering;
pub mod ports;
pub mod queries;
pub mod reporting;

pub use accounts::{AccountService, AdminBootstrap};
pub use catalog::PlanCatalog;
pub use error::{ErrorKind, LifecycleError};
pub use manager::{cost_sharing_terms, IssuePolicy, LifecycleManager, ManagerConfig};
pub use memory::InMemoryStore;
pub use numbering::{NumberGenerator, NumberKind, RandomNumberGenerator, SequentialNumberGenerator};
pub use ports::{
    ClaimFilter, InsuranceStore, Lock, Page, PaymentFilter, PolicyFilter, StoreTransaction,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use queries::RecordQueries;
pub use reporting::{
    ClaimsSummary, DashboardStats, DateRange, PersonalStats, ReportingService, RevenueSummary,
    StatusCounts, SystemStats,
};
