use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::Client;
use kube::api::{Api, ListParams, PostParams};
use tracing::{debug, info};

use crate::store::{SecretStore, StoreError};

/// Secret store backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using in-cluster configuration, falling back to `$KUBECONFIG`.
    pub async fn try_default() -> Result<Self, StoreError> {
        info!("Connecting to the Kubernetes API server");
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Turn API status errors into typed variants; keep transport errors as-is.
fn map_kube_error(namespace: &str, name: &str, err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(ref status) if status.code == 404 => StoreError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(ref status) if status.code == 409 => StoreError::AlreadyExists {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(ref status) => StoreError::Api {
            code: status.code,
            message: status.message.clone(),
        },
        other => StoreError::Kube(other),
    }
}

fn secret_name(secret: &Secret) -> Result<&str, StoreError> {
    secret
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| StoreError::Invalid("secret metadata.name is required".to_string()))
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Secret>, StoreError> {
        let params = ListParams::default().labels(label_selector);
        let list = self
            .secrets(namespace)
            .list(&params)
            .await
            .map_err(|e| map_kube_error(namespace, "", e))?;
        debug!(
            "Listed {} secrets in {} (selector={})",
            list.items.len(),
            namespace,
            label_selector
        );
        Ok(list.items)
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<Secret, StoreError> {
        self.secrets(namespace)
            .get(name)
            .await
            .map_err(|e| map_kube_error(namespace, name, e))
    }

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<Secret, StoreError> {
        let name = secret_name(secret)?;
        self.secrets(namespace)
            .create(&PostParams::default(), secret)
            .await
            .map_err(|e| map_kube_error(namespace, name, e))
    }

    async fn replace(&self, namespace: &str, name: &str, secret: &Secret) -> Result<Secret, StoreError> {
        self.secrets(namespace)
            .replace(name, &PostParams::default(), secret)
            .await
            .map_err(|e| map_kube_error(namespace, name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::Status;
    use serde_json::json;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        let status: Status = serde_json::from_value(json!({
            "status": "Failure",
            "message": format!("secrets \"x\" {}", reason),
            "reason": reason,
            "code": code,
        }))
        .unwrap();
        kube::Error::Api(status.into())
    }

    #[test]
    fn not_found_maps_to_typed_error() {
        let err = map_kube_error("ns1", "x", api_error(404, "NotFound"));
        match err {
            StoreError::NotFound { namespace, name } => {
                assert_eq!(namespace, "ns1");
                assert_eq!(name, "x");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn conflict_maps_to_already_exists() {
        let err = map_kube_error("ns1", "x", api_error(409, "AlreadyExists"));
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn other_statuses_keep_code_and_message() {
        let err = map_kube_error("ns1", "x", api_error(403, "Forbidden"));
        match err {
            StoreError::Api { code, ref message } => {
                assert_eq!(code, 403);
                assert_eq!(message, "secrets \"x\" Forbidden");
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn missing_name_is_invalid() {
        assert!(matches!(
            secret_name(&Secret::default()),
            Err(StoreError::Invalid(_))
        ));
    }
}
