//! Policy handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use domain_identity::Actor;
use domain_lifecycle::IssuePolicy;

use crate::dto::policy::{ExpirePolicyRequest, PolicyListParams, PolicyResponse};
use crate::error::ApiError;
use crate::AppState;

/// Issues a pending policy to the caller
pub async fn create_policy(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<IssuePolicy>,
) -> Result<(StatusCode, Json<PolicyResponse>), ApiError> {
    let policy = state.manager.issue_policy(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(policy.into())))
}

/// Lists the caller's policies, or all of them for staff
pub async fn list_policies(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<PolicyListParams>,
) -> Result<Json<Vec<PolicyResponse>>, ApiError> {
    let page = params.pagination().page(state.config.default_page_limit);
    let policies = state
        .queries
        .list_policies(&actor, params.status, page)
        .await?;
    Ok(Json(policies.into_iter().map(PolicyResponse::from).collect()))
}

pub async fn get_policy(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state.queries.get_policy(&actor, id.into()).await?;
    Ok(Json(policy.into()))
}

pub async fn activate_policy(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state.manager.activate_policy(&actor, id.into()).await?;
    Ok(Json(policy.into()))
}

pub async fn cancel_policy(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state.manager.cancel_policy(&actor, id.into()).await?;
    Ok(Json(policy.into()))
}

/// Expires a policy whose term has ended
///
/// The body is optional; `as_of` defaults to today's UTC date.
pub async fn expire_policy(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    body: Option<Json<ExpirePolicyRequest>>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let today = body
        .and_then(|Json(req)| req.as_of)
        .unwrap_or_else(|| Utc::now().date_naive());
    let policy = state.manager.expire_policy(&actor, id.into(), today).await?;
    Ok(Json(policy.into()))
}
