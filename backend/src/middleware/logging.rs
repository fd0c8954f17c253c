//! Error-response logging.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::request_id::REQUEST_ID_HEADER;

/// Logs every non-success response with its method, path, status, and
/// request id. Success traffic is left to `TraceLayer`.
pub async fn log_error_responses(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        tracing::error!(%method, %path, %status, %request_id, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, %status, %request_id, "request rejected");
    }

    response
}
