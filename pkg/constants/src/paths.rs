//! Filesystem path constants.

/// Default config file path for the server.
pub const DEFAULT_SERVER_CONFIG: &str = "/etc/che-dashboard/config.yaml";
