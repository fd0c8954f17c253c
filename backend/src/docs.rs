use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models::session_key::{
    ClaimRequest, ClaimResponse, GenerateKeyResponse, KeyDetail, KeyDetailListResponse,
    KeyListResponse, SessionKey, SetKeyActiveRequest, SetKeyActiveResponse,
};
use crate::models::usage_event::{ReportRequest, ReportResponse, StatsResponse};
use crate::models::user::{
    AdminAuthRequest, AdminAuthResponse, LoginRequest, LoginResponse, UserListResponse,
    UserOverview,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::keys::generate,
        handlers::keys::claim,
        handlers::keys::list,
        handlers::stats::report,
        handlers::stats::get_stats,
        handlers::admin::auth,
        handlers::admin::list_users,
        handlers::admin::user_detail,
        handlers::admin::set_key_active
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            AdminAuthRequest,
            AdminAuthResponse,
            SessionKey,
            GenerateKeyResponse,
            ClaimRequest,
            ClaimResponse,
            KeyListResponse,
            KeyDetail,
            KeyDetailListResponse,
            SetKeyActiveRequest,
            SetKeyActiveResponse,
            ReportRequest,
            ReportResponse,
            StatsResponse,
            UserOverview,
            UserListResponse
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "auth", description = "Login-key authentication"),
        (name = "keys", description = "Session key issuance and claiming"),
        (name = "stats", description = "Usage reporting and dashboard statistics"),
        (name = "admin", description = "Admin panel")
    )
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("bearer_auth", SecurityScheme::Http(bearer));
    }
}
