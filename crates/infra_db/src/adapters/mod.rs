//! Domain Adapters
//!
//! Adapter implementations for domain ports, connecting domain interfaces to
//! the PostgreSQL database layer.
//!
//! The store adapter:
//! - Implements the lifecycle domain's `InsuranceStore` port
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations

pub mod store;

pub use store::{PostgresInsuranceStore, PostgresStoreTransaction};
