//! HTTP API Layer
//!
//! This crate provides the REST API for the healthcare insurance system
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **Middleware**: Authentication and audit logging
//! - **DTOs**: Response bodies that flatten money amounts
//! - **Error Handling**: Consistent `{ "error", "message" }` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(store, hasher, Arc::new(RandomNumberGenerator), config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_identity::CredentialHasher;
use domain_lifecycle::{
    AccountService, InsuranceStore, LifecycleManager, ManagerConfig, NumberGenerator, PlanCatalog,
    RecordQueries, ReportingService,
};

use crate::config::ApiConfig;
use crate::handlers::{
    admin, auth as auth_handlers, claims, health, payments, plans, policy, reports,
};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub store: Arc<dyn InsuranceStore>,
    pub accounts: AccountService,
    pub catalog: PlanCatalog,
    pub manager: LifecycleManager,
    pub queries: RecordQueries,
    pub reporting: ReportingService,
}

impl AppState {
    /// Wires every service onto one store
    pub fn new(
        store: Arc<dyn InsuranceStore>,
        hasher: Arc<dyn CredentialHasher>,
        numbers: Arc<dyn NumberGenerator>,
        config: ApiConfig,
    ) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), hasher),
            catalog: PlanCatalog::new(store.clone()),
            manager: LifecycleManager::new(store.clone(), numbers, ManagerConfig::default()),
            queries: RecordQueries::new(store.clone()),
            reporting: ReportingService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
///
/// Public routes: the banner, health checks, registration, login and the
/// plan catalog reads. Everything else requires a bearer token.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/register", post(auth_handlers::register))
        .route("/token", post(auth_handlers::token))
        .route("/plans", get(plans::list_plans))
        .route("/plans/:id", get(plans::get_plan));

    let protected_routes = Router::new()
        .route("/me", get(auth_handlers::me))
        .route("/plans", post(plans::create_plan))
        .route("/plans/:id/deactivate", patch(plans::deactivate_plan))
        .route(
            "/policies",
            post(policy::create_policy).get(policy::list_policies),
        )
        .route("/policies/:id", get(policy::get_policy))
        .route("/policies/:id/activate", patch(policy::activate_policy))
        .route("/policies/:id/cancel", patch(policy::cancel_policy))
        .route("/policies/:id/expire", patch(policy::expire_policy))
        .route("/claims", post(claims::create_claim).get(claims::list_claims))
        .route(
            "/claims/:id",
            get(claims::get_claim).patch(claims::review_claim),
        )
        .route(
            "/payments",
            post(payments::create_payment).get(payments::list_payments),
        )
        .route("/dashboard/stats", get(reports::dashboard_stats))
        .route("/reports/claims-summary", get(reports::claims_summary))
        .route("/reports/revenue-summary", get(reports::revenue_summary))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", get(admin::get_user))
        .route("/admin/users/:id/deactivate", patch(admin::deactivate_user))
        .route("/admin/users/:id/role", patch(admin::assign_role))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
