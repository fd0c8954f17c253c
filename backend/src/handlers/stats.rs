//! Usage reporting and the dashboard statistics view.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::usage_event::{ReportRequest, ReportResponse, StatsResponse};
use crate::services::{record_usage, stats_for_user};
use crate::state::AppState;

/// Records a usage event reported by a licensed client.
#[utoipa::path(
    post,
    path = "/api/stats/report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Event recorded", body = ReportResponse),
        (status = 400, description = "Missing sessionKey or eventType"),
        (status = 404, description = "Unknown or deactivated session key"),
    ),
    tag = "stats"
)]
pub async fn report(
    State(state): State<AppState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Missing sessionKey or eventType.".to_string()))?;

    record_usage(
        state.keys.as_ref(),
        state.usage.as_ref(),
        &payload.session_key,
        &payload.event_type,
        payload.metadata,
    )
    .await?;

    Ok(Json(ReportResponse { success: true }))
}

/// Aggregated statistics for the caller's dashboard.
#[utoipa::path(
    get,
    path = "/api/stats/get",
    responses(
        (status = 200, description = "Execution totals and key state", body = StatsResponse),
        (status = 401, description = "Not logged in"),
    ),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn get_stats(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = stats_for_user(state.keys.as_ref(), state.usage.as_ref(), &claims.sub).await?;
    Ok(Json(stats))
}
