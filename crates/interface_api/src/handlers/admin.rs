//! User administration

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use domain_identity::Actor;

use crate::dto::auth::{AssignRoleRequest, UserResponse};
use crate::dto::Pagination;
use crate::error::ApiError;
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .accounts
        .list_users(&actor, pagination.page(state.config.default_page_limit))
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.get_user(&actor, id.into()).await?;
    Ok(Json(user.into()))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.deactivate_user(&actor, id.into()).await?;
    Ok(Json(user.into()))
}

pub async fn assign_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .accounts
        .assign_role(&actor, id.into(), request.role)
        .await?;
    Ok(Json(user.into()))
}
