//! Registration, login and the current user

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Form, Json,
};
use tracing::info;
use validator::Validate;

use domain_identity::{Actor, NewUser};

use crate::auth::{authenticate_optional, create_token};
use crate::dto::auth::{TokenForm, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::AppState;

/// Creates an account
///
/// Anonymous callers register themselves; an authenticated admin may create
/// accounts with any role.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let caller = authenticate_optional(&state, &headers).await?;
    let user = state.accounts.register(caller.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges username and password for a bearer token
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    form.validate()?;

    let user = state
        .accounts
        .authenticate(&form.username, &form.password)
        .await?;
    let access_token = create_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    info!(user = %user.id, role = %user.role, "Issued access token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.jwt_expiration_secs,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.get_user(&actor, actor.user_id).await?;
    Ok(Json(user.into()))
}
