//! Network-related constants.

/// Default port for the dashboard API server.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default address the API server binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Prefix under which all dashboard REST routes are mounted.
pub const DEFAULT_BASE_API_PATH: &str = "/dashboard/api";

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
