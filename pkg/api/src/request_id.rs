use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use pkg_constants::network::REQUEST_ID_HEADER;
use tracing::Instrument;
use uuid::Uuid;

/// Middleware that generates a unique request ID for each API request,
/// runs the request inside a span carrying it and echoes it back as a header.
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!(
        "api_request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
