//! Request and response bodies
//!
//! Domain inputs such as `NewPlan` or `NewClaim` already deserialize and are
//! accepted as request bodies directly. Responses flatten `Money` into a bare
//! amount next to a single `currency` field.

pub mod auth;
pub mod claims;
pub mod payments;
pub mod plans;
pub mod policy;

use serde::Deserialize;

use domain_lifecycle::Page;

/// `?skip=&limit=` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    /// Resolves to a page, falling back to `default_limit`
    pub fn page(&self, default_limit: u32) -> Page {
        Page::new(self.skip.unwrap_or(0), self.limit.unwrap_or(default_limit))
    }
}
