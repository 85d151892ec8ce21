//! Environment variables stored as labeled Kubernetes secrets.
//!
//! [`codec`] maps between the REST shape and the secret object;
//! [`service`] implements the CRUD operations on top of a [`pkg_state::SecretStore`].

pub mod codec;
pub mod error;
pub mod service;

pub use error::{API_ERROR_LABEL, CodecError, ServiceError, VALIDATION_ERROR_LABEL};
pub use service::EnvironmentVariablesService;
