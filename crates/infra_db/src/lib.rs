//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the health insurance
//! backend using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL for one
//! table each and work on plain rows; the [`PostgresInsuranceStore`] adapter
//! implements the lifecycle domain's `InsuranceStore` port on top of them and
//! converts rows to domain types.
//!
//! # Transactions and locking
//!
//! Each unit of work runs in one PostgreSQL transaction. Locked reads use
//! `SELECT ... FOR UPDATE`, which serializes concurrent decisions on the same
//! claim or policy.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresInsuranceStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/acp_health")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresInsuranceStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{PostgresInsuranceStore, PostgresStoreTransaction};
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
