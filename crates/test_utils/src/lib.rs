//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! health insurance backend test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for plans, users, claims and payments
//! - `builders`: Builder patterns for test data construction
//! - `database`: Migrated PostgreSQL containers for store tests
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
