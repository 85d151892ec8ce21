use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware: Authenticates the request using a Bearer token.
///
/// With an API token configured the bearer must match it. Without one any
/// non-empty bearer is accepted, as when an authenticating proxy sits in front.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => {
            let value_str = value.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;
            bearer_token(value_str).ok_or(StatusCode::UNAUTHORIZED)?
        }
        None => {
            debug!("Request without Authorization header: {}", req.uri().path());
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    if let Some(expected) = state.api_token.as_deref() {
        if token != expected {
            warn!("Invalid Bearer token provided");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
