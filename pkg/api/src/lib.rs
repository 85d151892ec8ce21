pub mod auth;
pub mod error;
pub mod handlers;
pub mod request_id;
pub mod server;

use pkg_envvars::EnvironmentVariablesService;

/// Shared application state injected into all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: EnvironmentVariablesService,
    /// When set, API requests must present exactly this bearer token.
    pub api_token: Option<String>,
}
