use k8s_openapi::api::core::v1::Secret;
use pkg_state::{SecretStore, StoreError};
use pkg_types::environment_variable::EnvironmentVariable;
use pkg_types::validate::validate_environment_variable;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::codec::{
    build_label_selector, encode_data, is_env_secret, to_environment_variable, to_secret,
    to_secret_name,
};
use crate::error::ServiceError;

/// CRUD over environment variables in a namespace.
///
/// Holds no state besides the store handle; cloning is cheap.
#[derive(Clone)]
pub struct EnvironmentVariablesService {
    store: Arc<dyn SecretStore>,
}

impl EnvironmentVariablesService {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    async fn list_secrets(&self, namespace: &str) -> Result<Vec<Secret>, StoreError> {
        self.store.list(namespace, &build_label_selector()).await
    }

    /// All managed variables in `namespace`, values redacted.
    pub async fn list_in_namespace(
        &self,
        namespace: &str,
    ) -> Result<Vec<EnvironmentVariable>, ServiceError> {
        let message = || {
            format!(
                "Unable to list environment variables in the namespace \"{}\"",
                namespace
            )
        };

        let secrets = self.list_secrets(namespace).await.map_err(|source| {
            warn!("Failed to list secrets in {}: {}", namespace, source);
            ServiceError::Store {
                message: message(),
                source,
            }
        })?;

        let variables = secrets
            .iter()
            .filter(|secret| is_env_secret(secret))
            .map(|secret| {
                to_environment_variable(secret).map_err(|source| ServiceError::Codec {
                    message: message(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "Found {} environment variables in {}",
            variables.len(),
            namespace
        );
        Ok(variables)
    }

    /// Store a new variable. Fails if one with the same name already exists.
    pub async fn create(
        &self,
        namespace: &str,
        variable: &EnvironmentVariable,
    ) -> Result<EnvironmentVariable, ServiceError> {
        validate_environment_variable(variable).map_err(|e| ServiceError::Invalid(e.to_string()))?;

        let message = format!(
            "Unable to add environment variable \"{}\"",
            variable.variable_name
        );
        let secret = to_secret(namespace, variable).map_err(|source| ServiceError::Codec {
            message: message.clone(),
            source,
        })?;

        let secret_name = to_secret_name(&variable.variable_name);
        let existing = self
            .list_secrets(namespace)
            .await
            .map_err(|source| ServiceError::Store {
                message: message.clone(),
                source,
            })?;
        if existing
            .iter()
            .any(|s| s.metadata.name.as_deref() == Some(secret_name.as_str()))
        {
            return Err(ServiceError::AlreadyExists { message });
        }

        // The list check above is advisory; the store's conflict is authoritative.
        let created = match self.store.create(namespace, &secret).await {
            Ok(created) => created,
            Err(StoreError::AlreadyExists { .. }) => {
                return Err(ServiceError::AlreadyExists { message });
            }
            Err(source) => {
                warn!("Failed to create secret {}/{}: {}", namespace, secret_name, source);
                return Err(ServiceError::Store { message, source });
            }
        };
        info!(
            "Created environment variable {}/{}",
            namespace, variable.variable_name
        );

        to_environment_variable(&created).map_err(|source| ServiceError::Codec { message, source })
    }

    /// Overwrite an existing variable.
    ///
    /// When `variable_data` is the placeholder the currently stored value is
    /// carried over, since clients never see the real one. A secret with no
    /// stored data leaves the placeholder in place and is refused as undefined.
    pub async fn replace(
        &self,
        namespace: &str,
        variable: &EnvironmentVariable,
    ) -> Result<EnvironmentVariable, ServiceError> {
        validate_environment_variable(variable).map_err(|e| ServiceError::Invalid(e.to_string()))?;

        let secret_name = to_secret_name(&variable.variable_name);
        let existing = self
            .store
            .get(namespace, &secret_name)
            .await
            .map_err(|source| ServiceError::Store {
                message: format!(
                    "Unable to find environment variable \"{}\" in the namespace \"{}\"",
                    variable.variable_name, namespace
                ),
                source,
            })?;

        let mut variable = variable.clone();
        if variable.has_placeholder_data() {
            if let Some(value) = existing.data.as_ref().and_then(|data| data.values().next()) {
                variable.variable_data = encode_data(value);
            }
        }

        let message = format!(
            "Unable to replace environment variable \"{}\" in the namespace \"{}\"",
            variable.variable_name, namespace
        );
        let secret = to_secret(namespace, &variable).map_err(|source| ServiceError::Codec {
            message: message.clone(),
            source,
        })?;
        let replaced = self
            .store
            .replace(namespace, &secret_name, &secret)
            .await
            .map_err(|source| {
                warn!("Failed to replace secret {}/{}: {}", namespace, secret_name, source);
                ServiceError::Store {
                    message: message.clone(),
                    source,
                }
            })?;
        info!(
            "Replaced environment variable {}/{}",
            namespace, variable.variable_name
        );

        to_environment_variable(&replaced).map_err(|source| ServiceError::Codec { message, source })
    }

    /// Accepts the request and reports success without removing the secret.
    pub async fn delete(&self, namespace: &str, variable_name: &str) -> Result<(), ServiceError> {
        // TODO: remove the secret once product confirms deletion is not handled elsewhere.
        warn!(
            "Delete requested for environment variable {}/{}; secret left in place",
            namespace, variable_name
        );
        Ok(())
    }
}
