//! JWT authentication extractors.
//!
//! Tokens arrive either as `Authorization: Bearer` or in an HttpOnly
//! cookie. Both extractors validate the signature and expiry against the
//! configured secret; neither touches the stores.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookies::{extract_cookie_value, ADMIN_COOKIE_NAME, USER_COOKIE_NAME};
use crate::utils::jwt::{verify_access_token, Claims};

/// A request authenticated with a user token from the login route.
pub struct AuthUser(pub Claims);

/// A request authenticated with an admin token from the admin-auth route.
pub struct AdminAuth(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, USER_COOKIE_NAME)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = verify_access_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser(claims))
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, ADMIN_COOKIE_NAME)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = verify_access_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        if !claims.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminAuth(claims))
    }
}

fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    if let Some(value) = parts.headers.get(AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    parts
        .headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| extract_cookie_value(header, cookie_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_wins_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "access_token=from-cookie"),
        ]);
        assert_eq!(
            token_from_parts(&parts, USER_COOKIE_NAME).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn cookie_token_used_when_no_bearer() {
        let parts = parts_with_headers(&[("cookie", "a=1; admin_token=tok")]);
        assert_eq!(
            token_from_parts(&parts, ADMIN_COOKIE_NAME).as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn missing_credentials_yield_none() {
        let parts = parts_with_headers(&[]);
        assert!(token_from_parts(&parts, USER_COOKIE_NAME).is_none());
    }
}
