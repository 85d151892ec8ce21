use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pkg_envvars::ServiceError;
use serde::Serialize;

/// JSON body returned for every failed API call.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
}

/// Adapter turning service failures into HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            name: self.0.label().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
