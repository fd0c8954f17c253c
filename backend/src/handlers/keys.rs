//! Session key routes: one-time generation, claiming, and listing.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::session_key::{
    ClaimRequest, ClaimResponse, GenerateKeyResponse, KeyListResponse,
};
use crate::services::{claim_key, issue_key, ClaimOutcome};
use crate::state::AppState;

/// Issues the caller's one and only session key.
///
/// The plaintext in the response is the only time the key is ever
/// returned; afterwards it can only be presented, never retrieved.
#[utoipa::path(
    post,
    path = "/api/keys/generate",
    responses(
        (status = 200, description = "Key issued, plaintext returned once", body = GenerateKeyResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller already holds a key"),
    ),
    security(("bearer_auth" = [])),
    tag = "keys"
)]
pub async fn generate(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<GenerateKeyResponse>, AppError> {
    let key = issue_key(state.keys.as_ref(), &claims.sub).await?;
    Ok(Json(GenerateKeyResponse {
        session_key: key.session_key,
    }))
}

/// Claims a key for a machine, binding it on first use.
#[utoipa::path(
    post,
    path = "/api/keys/claim",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Key bound or re-validated", body = ClaimResponse),
        (status = 400, description = "Missing sessionKey or hwid"),
        (status = 403, description = "Deactivated or locked to another machine"),
        (status = 404, description = "Unknown session key"),
    ),
    tag = "keys"
)]
pub async fn claim(
    State(state): State<AppState>,
    Json(payload): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, AppError> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Missing sessionKey or hwid.".to_string()))?;

    let outcome = claim_key(state.keys.as_ref(), &payload.session_key, &payload.hwid).await?;
    let message = match outcome {
        ClaimOutcome::BoundNow => "Key locked to this machine.",
        ClaimOutcome::AlreadyBound => "Key validated.",
    };

    Ok(Json(ClaimResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// Lists the caller's keys, newest first.
#[utoipa::path(
    get,
    path = "/api/keys/list",
    responses(
        (status = 200, description = "The caller's keys", body = KeyListResponse),
        (status = 401, description = "Not logged in"),
    ),
    security(("bearer_auth" = [])),
    tag = "keys"
)]
pub async fn list(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<KeyListResponse>, AppError> {
    let keys = state.keys.list_for_user(&claims.sub).await?;
    Ok(Json(KeyListResponse { keys }))
}
