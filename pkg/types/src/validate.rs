use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

use crate::environment_variable::EnvironmentVariable;

/// Upper bound shared by variable names and keys.
pub const MAX_FIELD_LENGTH: usize = 255;

/// DNS-subdomain style: lowercase alphanumerics, `-` inside segments, `.` between them.
static VARIABLE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("variable name pattern is valid")
});

/// Env-variable style: alphanumerics with `_` allowed inside.
static VARIABLE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([_a-zA-Z0-9]*[a-zA-Z0-9])?([a-zA-Z0-9]([_a-zA-Z0-9]*[a-zA-Z0-9])?)*$")
        .expect("variable key pattern is valid")
});

/// Validate the user-facing variable name, which also forms the secret name.
pub fn validate_variable_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("variable name must not be empty");
    }
    if name.len() > MAX_FIELD_LENGTH {
        bail!(
            "variable name is too long: the maximum length is {} characters (got {})",
            MAX_FIELD_LENGTH,
            name.len()
        );
    }
    if !VARIABLE_NAME_RE.is_match(name) {
        bail!(
            "variable name '{}' must consist of lowercase alphanumeric characters, '-' or '.', \
             and must start and end with an alphanumeric character",
            name
        );
    }
    Ok(())
}

/// Validate the key under which the value is exposed in the workspace.
pub fn validate_variable_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("variable key must not be empty");
    }
    if key.len() > MAX_FIELD_LENGTH {
        bail!(
            "variable key is too long: the maximum length is {} characters (got {})",
            MAX_FIELD_LENGTH,
            key.len()
        );
    }
    if !VARIABLE_KEY_RE.is_match(key) {
        bail!(
            "variable key '{}' must consist of alphanumeric characters or '_', \
             and must start and end with an alphanumeric character",
            key
        );
    }
    Ok(())
}

/// Validate every client-supplied field of an environment variable.
pub fn validate_environment_variable(variable: &EnvironmentVariable) -> Result<()> {
    validate_variable_name(&variable.variable_name)?;
    validate_variable_key(&variable.variable_key)?;
    if variable.variable_data.is_empty() {
        bail!("variable data is required");
    }
    Ok(())
}
