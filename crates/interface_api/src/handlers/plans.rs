//! Plan catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use domain_identity::Actor;
use domain_policy::NewPlan;

use crate::dto::plans::PlanResponse;
use crate::dto::Pagination;
use crate::error::ApiError;
use crate::AppState;

pub async fn create_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewPlan>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let plan = state.catalog.create_plan(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// Lists active plans; public
pub async fn list_plans(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state
        .catalog
        .list_plans(pagination.page(state.config.default_page_limit))
        .await?;
    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

/// Fetches an active plan; public
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state.catalog.get_plan(id.into()).await?;
    Ok(Json(plan.into()))
}

pub async fn deactivate_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state.catalog.deactivate_plan(&actor, id.into()).await?;
    Ok(Json(plan.into()))
}
