//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use domain_claims::{NewClaim, ReviewDecision};
use domain_identity::Actor;

use crate::dto::claims::{ClaimListParams, ClaimResponse};
use crate::error::ApiError;
use crate::AppState;

/// Submits a claim against one of the caller's active policies
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewClaim>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let claim = state.manager.submit_claim(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

pub async fn list_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<ClaimListParams>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let page = params.pagination().page(state.config.default_page_limit);
    let claims = state.queries.list_claims(&actor, params.status, page).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.queries.get_claim(&actor, id.into()).await?;
    Ok(Json(claim.into()))
}

/// Records a review decision; approval computes the entitlement split
pub async fn review_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(decision): Json<ReviewDecision>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.manager.review_claim(&actor, id.into(), decision).await?;
    Ok(Json(claim.into()))
}
