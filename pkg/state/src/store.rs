use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use thiserror::Error;

/// Errors returned by a [`SecretStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("secret \"{name}\" not found in namespace \"{namespace}\"")]
    NotFound { namespace: String, name: String },

    #[error("secret \"{name}\" already exists in namespace \"{namespace}\"")]
    AlreadyExists { namespace: String, name: String },

    /// The API server rejected the request with a status other than 404/409.
    #[error("API request failed with status {code}: {message}")]
    Api { code: u16, message: String },

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

impl StoreError {
    /// HTTP status equivalent of this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::AlreadyExists { .. } => 409,
            StoreError::Api { code, .. } => *code,
            StoreError::Invalid(_) => 400,
            StoreError::Kube(_) => 500,
        }
    }
}

/// Namespaced CRUD over Kubernetes secrets.
///
/// `create` must be atomic: it fails with [`StoreError::AlreadyExists`]
/// instead of overwriting a secret that appeared concurrently.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// List secrets in `namespace` matching an equality-based label selector
    /// (`key=value,key=value`). An empty selector matches everything.
    async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Secret>, StoreError>;

    /// Read a single secret by name.
    async fn get(&self, namespace: &str, name: &str) -> Result<Secret, StoreError>;

    /// Create a secret, failing if one with the same name exists.
    async fn create(&self, namespace: &str, secret: &Secret) -> Result<Secret, StoreError>;

    /// Overwrite an existing secret as a whole (no merge).
    async fn replace(&self, namespace: &str, name: &str, secret: &Secret) -> Result<Secret, StoreError>;
}
