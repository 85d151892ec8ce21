//! Labels, annotations and naming of environment-variable secrets.
//!
//! These values are the identity contract with the DevWorkspace controller,
//! which mounts every matching secret into workspaces as env variables.

/// Every environment-variable secret name starts with this prefix,
/// followed by the user-facing variable name.
pub const SECRET_NAME_PREFIX: &str = "che-environment-variable-";

pub const COMPONENT_LABEL: &str = "app.kubernetes.io/component";
pub const PART_OF_LABEL: &str = "app.kubernetes.io/part-of";
pub const MOUNT_TO_DEVWORKSPACE_LABEL: &str = "controller.devfile.io/mount-to-devworkspace";
pub const WATCH_SECRET_LABEL: &str = "controller.devfile.io/watch-secret";

pub const MOUNT_AS_ANNOTATION: &str = "controller.devfile.io/mount-as";
pub const USER_ID_ANNOTATION: &str = "che.eclipse.org/che-userid";

/// Labels that mark a secret as a managed environment variable.
/// Order matters: the label selector is built in this order.
pub const IDENTITY_LABELS: [(&str, &str); 2] = [
    (COMPONENT_LABEL, "che-environment-variable"),
    (PART_OF_LABEL, "che.eclipse.org"),
];

/// Labels asking the DevWorkspace controller to mount and watch the secret.
pub const MOUNT_LABELS: [(&str, &str); 2] = [
    (MOUNT_TO_DEVWORKSPACE_LABEL, "true"),
    (WATCH_SECRET_LABEL, "true"),
];

/// Value of [`MOUNT_AS_ANNOTATION`]: expose the data key as an env variable.
pub const MOUNT_AS_ENV: &str = "env";

/// Returned instead of the real value on every read. When a client sends
/// it back on update, the stored value is kept.
pub const PLACEHOLDER_VARIABLE_DATA: &str = "ZHVtbXktYWNjZXNzLXRva2VuLUhxS3JaVkNadlNwN3FQTEY=";
