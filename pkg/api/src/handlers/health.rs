use axum::{http::StatusCode, response::IntoResponse};

/// Liveness check; does not touch the secrets store.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
