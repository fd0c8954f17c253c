//! Admin panel routes: password auth and user/key management.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppError;
use crate::middleware::AdminAuth;
use crate::models::session_key::{KeyDetailListResponse, SetKeyActiveRequest, SetKeyActiveResponse};
use crate::models::user::{AdminAuthRequest, AdminAuthResponse, UserListResponse};
use crate::state::AppState;
use crate::utils::cookies::{
    build_auth_cookie, CookieOptions, SameSite, ADMIN_COOKIE_NAME, ADMIN_COOKIE_PATH,
};
use crate::utils::jwt::{create_access_token, ROLE_ADMIN};

/// Exchanges the panel password for a short-lived admin session.
#[utoipa::path(
    post,
    path = "/api/admin/auth",
    request_body = AdminAuthRequest,
    responses(
        (status = 200, description = "Admin session started", body = AdminAuthResponse),
        (status = 401, description = "Wrong password"),
    ),
    tag = "admin"
)]
pub async fn auth(
    State(state): State<AppState>,
    Json(payload): Json<AdminAuthRequest>,
) -> Result<Response, AppError> {
    if payload.password != state.config.admin_password {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let token = create_access_token(
        ROLE_ADMIN.to_string(),
        ROLE_ADMIN.to_string(),
        &state.config.jwt_secret,
        state.config.admin_jwt_expiration_hours,
    )?;

    // Scoped to the admin path and Strict so the cookie never rides along
    // on cross-site or non-admin requests.
    let cookie = build_auth_cookie(
        ADMIN_COOKIE_NAME,
        &token,
        Duration::from_secs(state.config.admin_jwt_expiration_hours * 3600),
        ADMIN_COOKIE_PATH,
        CookieOptions {
            secure: state.config.cookie_secure,
            same_site: SameSite::Strict,
        },
    );

    let mut response = Json(AdminAuthResponse { success: true }).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("cookie header: {e}")))?,
    );

    Ok(response)
}

/// Every user with key and usage counts, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Token lacks the admin role"),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_users(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.users.overview().await?;
    Ok(Json(UserListResponse { users }))
}

/// One user's keys with execution counts.
#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's keys", body = KeyDetailListResponse),
        (status = 404, description = "No such user"),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn user_detail(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<KeyDetailListResponse>, AppError> {
    state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let keys = state.keys.detail_for_user(&user_id).await?;
    Ok(Json(KeyDetailListResponse { keys }))
}

/// Flips a key's active flag; deactivated keys reject claims and reports.
#[utoipa::path(
    put,
    path = "/api/admin/keys/{key_id}/active",
    params(("key_id" = String, Path, description = "Key id")),
    request_body = SetKeyActiveRequest,
    responses(
        (status = 200, description = "Flag updated", body = SetKeyActiveResponse),
        (status = 404, description = "No such key"),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn set_key_active(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(key_id): Path<String>,
    Json(payload): Json<SetKeyActiveRequest>,
) -> Result<Json<SetKeyActiveResponse>, AppError> {
    let updated = state.keys.set_active(&key_id, payload.active).await?;
    if !updated {
        return Err(AppError::NotFound("Key not found".to_string()));
    }
    Ok(Json(SetKeyActiveResponse { success: true }))
}
