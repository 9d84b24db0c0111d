//! Dashboard and summary reports

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use domain_identity::Actor;
use domain_lifecycle::{ClaimsSummary, DashboardStats, DateRange, RevenueSummary};

use crate::error::ApiError;
use crate::AppState;

/// System figures for admins, personal figures for everyone else
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.reporting.dashboard(&actor).await?))
}

pub async fn claims_summary(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(range): Query<DateRange>,
) -> Result<Json<ClaimsSummary>, ApiError> {
    Ok(Json(state.reporting.claims_summary(&actor, range).await?))
}

pub async fn revenue_summary(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(range): Query<DateRange>,
) -> Result<Json<RevenueSummary>, ApiError> {
    Ok(Json(state.reporting.revenue_summary(&actor, range).await?))
}
