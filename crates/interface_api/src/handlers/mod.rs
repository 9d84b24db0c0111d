//! Request handlers, one module per resource

pub mod admin;
pub mod auth;
pub mod claims;
pub mod health;
pub mod payments;
pub mod plans;
pub mod policy;
pub mod reports;
