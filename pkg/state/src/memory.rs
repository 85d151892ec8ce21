use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{SecretStore, StoreError};

/// Process-local secret store. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemorySecretStore {
    secrets: Arc<RwLock<BTreeMap<(String, String), Secret>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single term of an equality-based label selector.
#[derive(Debug, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
}

impl Requirement {
    fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        match self {
            Requirement::Equals(k, v) => labels.and_then(|l| l.get(k)) == Some(v),
            Requirement::NotEquals(k, v) => labels.and_then(|l| l.get(k)) != Some(v),
            Requirement::Exists(k) => labels.is_some_and(|l| l.contains_key(k)),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Vec<Requirement>, StoreError> {
    let mut requirements = Vec::new();
    for term in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let requirement = if let Some((k, v)) = term.split_once("!=") {
            Requirement::NotEquals(k.trim().to_string(), v.trim().to_string())
        } else if let Some((k, v)) = term.split_once("==") {
            Requirement::Equals(k.trim().to_string(), v.trim().to_string())
        } else if let Some((k, v)) = term.split_once('=') {
            Requirement::Equals(k.trim().to_string(), v.trim().to_string())
        } else {
            Requirement::Exists(term.to_string())
        };
        let key = match &requirement {
            Requirement::Equals(k, _) | Requirement::NotEquals(k, _) | Requirement::Exists(k) => k,
        };
        if key.is_empty() {
            return Err(StoreError::Invalid(format!(
                "label selector term '{}' has an empty key",
                term
            )));
        }
        requirements.push(requirement);
    }
    Ok(requirements)
}

fn owned_name(secret: &Secret) -> Result<String, StoreError> {
    secret
        .metadata
        .name
        .clone()
        .ok_or_else(|| StoreError::Invalid("secret metadata.name is required".to_string()))
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Secret>, StoreError> {
        let requirements = parse_selector(label_selector)?;
        let secrets = self.secrets.read().await;
        let items: Vec<Secret> = secrets
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, secret)| secret)
            .filter(|secret| {
                requirements
                    .iter()
                    .all(|r| r.matches(secret.metadata.labels.as_ref()))
            })
            .cloned()
            .collect();
        debug!("Listed {} secrets in {}", items.len(), namespace);
        Ok(items)
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<Secret, StoreError> {
        self.secrets
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<Secret, StoreError> {
        let name = owned_name(secret)?;
        let key = (namespace.to_string(), name.clone());
        let mut secrets = self.secrets.write().await;
        if secrets.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                namespace: namespace.to_string(),
                name,
            });
        }
        let mut stored = secret.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        secrets.insert(key, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, namespace: &str, name: &str, secret: &Secret) -> Result<Secret, StoreError> {
        let body_name = owned_name(secret)?;
        if body_name != name {
            return Err(StoreError::Invalid(format!(
                "the name of the object ({}) does not match the name on the URL ({})",
                body_name, name
            )));
        }
        let key = (namespace.to_string(), name.to_string());
        let mut secrets = self.secrets.write().await;
        let Some(existing) = secrets.get_mut(&key) else {
            return Err(StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        };
        let mut stored = secret.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        *existing = stored.clone();
        Ok(stored)
    }
}
