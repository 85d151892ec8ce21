use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where environment-variable secrets are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// The Kubernetes API server reachable from in-cluster config or `$KUBECONFIG`.
    #[default]
    Kubernetes,
    /// Process-local store, for local development. Lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kubernetes" | "k8s" => Ok(Self::Kubernetes),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unknown store backend '{}' (expected 'kubernetes' or 'memory')",
                other
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kubernetes => f.write_str("kubernetes"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Server configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// port: 8080
/// bind-address: 0.0.0.0
/// base-path: /dashboard/api
/// store: kubernetes
/// token: my-api-token
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "bind-address")]
    pub bind_address: Option<String>,
    #[serde(default, alias = "base-path")]
    pub base_path: Option<String>,
    #[serde(default)]
    pub store: Option<StoreBackend>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    let config: T = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path, e))?;
    Ok(config)
}
