//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::info;

use domain_identity::Actor;

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::AppState;

/// Authentication middleware
///
/// Validates the bearer token, resolves the caller and stores the
/// [`Actor`] in request extensions for handlers to extract.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs all API requests for compliance and debugging
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let (user_id, role) = request
        .extensions()
        .get::<Actor>()
        .map(|a| (a.user_id.as_uuid().to_string(), a.role.as_str()))
        .unwrap_or_else(|| ("anonymous".to_string(), "-"));

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user_id,
        role = role,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
