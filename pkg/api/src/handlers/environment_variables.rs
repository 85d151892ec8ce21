use axum::{
    Json,
    extract::{Path as AxumPath, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use pkg_envvars::ServiceError;
use pkg_types::environment_variable::EnvironmentVariable;

use crate::AppState;
use crate::error::ApiError;

/// Unwrap a JSON body, reporting malformed or mistyped payloads as validation errors.
fn parse_body(
    payload: Result<Json<EnvironmentVariable>, JsonRejection>,
) -> Result<EnvironmentVariable, ApiError> {
    payload
        .map(|Json(variable)| variable)
        .map_err(|rejection| ServiceError::Invalid(rejection.body_text()).into())
}

pub async fn list_environment_variables(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let variables = state.service.list_in_namespace(&ns).await?;
    Ok((StatusCode::OK, Json(variables)))
}

pub async fn create_environment_variable(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
    payload: Result<Json<EnvironmentVariable>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let variable = parse_body(payload)?;
    let created = state.service.create(&ns, &variable).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn replace_environment_variable(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
    payload: Result<Json<EnvironmentVariable>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let variable = parse_body(payload)?;
    let replaced = state.service.replace(&ns, &variable).await?;
    Ok((StatusCode::OK, Json(replaced)))
}

pub async fn delete_environment_variable(
    State(state): State<AppState>,
    AxumPath((ns, variable_name)): AxumPath<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete(&ns, &variable_name).await?;
    Ok(StatusCode::NO_CONTENT)
}
