//! Premium payment handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use domain_billing::NewPayment;
use domain_identity::Actor;

use crate::dto::payments::PaymentResponse;
use crate::dto::Pagination;
use crate::error::ApiError;
use crate::AppState;

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewPayment>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let payment = state.manager.record_payment(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(payment.into())))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = state
        .queries
        .list_payments(&actor, pagination.page(state.config.default_page_limit))
        .await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}
