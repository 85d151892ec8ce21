use serde::{Deserialize, Serialize};

/// A user-defined environment variable as exchanged with the dashboard
/// frontend. Backed by one Kubernetes secret per variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariable {
    pub che_user_id: String,
    /// Stable external identifier, unique per namespace.
    pub variable_name: String,
    /// Name of the env variable exposed inside the workspace.
    pub variable_key: String,
    /// Base64-encoded value, or the placeholder on reads.
    pub variable_data: String,
}

impl EnvironmentVariable {
    /// Whether `variable_data` is the placeholder rather than a real value.
    pub fn has_placeholder_data(&self) -> bool {
        self.variable_data == pkg_constants::secret::PLACEHOLDER_VARIABLE_DATA
    }
}
