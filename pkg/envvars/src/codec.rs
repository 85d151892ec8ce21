//! Mapping between [`EnvironmentVariable`] and its backing [`Secret`].
//!
//! A managed secret carries the identity labels, the mount labels and
//! annotations the DevWorkspace controller looks for, and exactly one data
//! entry keyed by the variable key. Values only flow inward: decoding a
//! secret always yields the placeholder instead of the stored value.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use pkg_constants::secret::{
    IDENTITY_LABELS, MOUNT_AS_ANNOTATION, MOUNT_AS_ENV, MOUNT_LABELS, PLACEHOLDER_VARIABLE_DATA,
    SECRET_NAME_PREFIX, USER_ID_ANNOTATION,
};
use pkg_types::environment_variable::EnvironmentVariable;
use std::collections::BTreeMap;

use crate::error::CodecError;

/// `key=value,key=value` selector over the identity labels.
pub fn build_label_selector() -> String {
    IDENTITY_LABELS
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether `secret` carries both identity labels with their exact values.
pub fn is_env_secret(secret: &Secret) -> bool {
    let Some(labels) = secret.metadata.labels.as_ref() else {
        return false;
    };
    IDENTITY_LABELS
        .iter()
        .all(|(key, value)| labels.get(*key).map(String::as_str) == Some(*value))
}

pub fn to_secret_name(variable_name: &str) -> String {
    format!("{}{}", SECRET_NAME_PREFIX, variable_name)
}

/// Decode a managed secret. The value is always replaced by the placeholder.
pub fn to_environment_variable(secret: &Secret) -> Result<EnvironmentVariable, CodecError> {
    if !is_env_secret(secret) {
        return Err(CodecError::NotEnvironmentVariable);
    }

    let name = secret.metadata.name.as_deref().unwrap_or_default();
    let variable_key = secret
        .data
        .as_ref()
        .and_then(|data| data.keys().next())
        .cloned()
        .ok_or_else(|| CodecError::MissingData {
            name: name.to_string(),
        })?;
    let che_user_id = secret
        .metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(USER_ID_ANNOTATION))
        .cloned()
        .unwrap_or_default();

    Ok(EnvironmentVariable {
        che_user_id,
        variable_name: name
            .strip_prefix(SECRET_NAME_PREFIX)
            .unwrap_or(name)
            .to_string(),
        variable_key,
        variable_data: PLACEHOLDER_VARIABLE_DATA.to_string(),
    })
}

/// Encode `variable` as a complete secret in `namespace`.
///
/// Refuses the placeholder so it can never be persisted as a real value.
pub fn to_secret(namespace: &str, variable: &EnvironmentVariable) -> Result<Secret, CodecError> {
    if variable.has_placeholder_data() {
        return Err(CodecError::UndefinedValue);
    }
    let value = STANDARD
        .decode(variable.variable_data.as_bytes())
        .map_err(|e| CodecError::InvalidData(e.to_string()))?;

    let labels: BTreeMap<String, String> = IDENTITY_LABELS
        .iter()
        .chain(MOUNT_LABELS.iter())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let annotations = BTreeMap::from([
        (MOUNT_AS_ANNOTATION.to_string(), MOUNT_AS_ENV.to_string()),
        (USER_ID_ANNOTATION.to_string(), variable.che_user_id.clone()),
    ]);
    let data = BTreeMap::from([(variable.variable_key.clone(), ByteString(value))]);

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(to_secret_name(&variable.variable_name)),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            annotations: Some(annotations),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    })
}

/// Base64 text of a stored secret value, as carried in `variableData`.
pub fn encode_data(value: &ByteString) -> String {
    STANDARD.encode(&value.0)
}
