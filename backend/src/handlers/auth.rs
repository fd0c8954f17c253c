//! Login: exchanges a login key for a dashboard session.

use std::time::Duration;

use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppError;
use crate::models::user::{LoginRequest, LoginResponse};
use crate::services::verify_login;
use crate::state::AppState;
use crate::utils::cookies::{
    build_auth_cookie, CookieOptions, SameSite, USER_COOKIE_NAME, USER_COOKIE_PATH,
};
use crate::utils::jwt::{create_access_token, ROLE_USER};

/// Verifies the submitted login key and starts a session.
///
/// The response sets an HttpOnly cookie carrying the JWT; the body also
/// reports the resolved user id so SPA clients can store it.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Key is not 52 characters"),
        (status = 401, description = "No account matches the key"),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let user_id = verify_login(state.users.as_ref(), &payload.login_key).await?;

    let token = create_access_token(
        user_id.clone(),
        ROLE_USER.to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    let cookie = build_auth_cookie(
        USER_COOKIE_NAME,
        &token,
        Duration::from_secs(state.config.jwt_expiration_hours * 3600),
        USER_COOKIE_PATH,
        CookieOptions {
            secure: state.config.cookie_secure,
            same_site: SameSite::Lax,
        },
    );

    let mut response = Json(LoginResponse {
        success: true,
        user_id,
    })
    .into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("cookie header: {e}")))?,
    );

    Ok(response)
}
