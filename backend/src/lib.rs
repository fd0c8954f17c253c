pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

use axum::http::Method;
use axum::middleware as axum_middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// Builds the full application router over the given state.
///
/// Integration tests call this with an in-memory state; `main` calls it
/// with the Postgres-backed one.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // Public: dashboard login and the two routes the licensed client
        // calls with only its session key.
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/keys/claim", post(handlers::keys::claim))
        .route("/api/stats/report", post(handlers::stats::report))
        .route("/api/admin/auth", post(handlers::admin::auth))
        // User-authenticated dashboard routes.
        .route("/api/keys/generate", post(handlers::keys::generate))
        .route("/api/keys/list", get(handlers::keys::list))
        .route("/api/stats/get", get(handlers::stats::get_stats))
        // Admin-authenticated panel routes.
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/users/{user_id}", get(handlers::admin::user_detail))
        .route(
            "/api/admin/keys/{key_id}/active",
            put(handlers::admin::set_key_active),
        )
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::propagate_request_id))
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
}
