use pkg_state::StoreError;
use thiserror::Error;

/// Tag attached to every failure that came from the secrets store.
pub const API_ERROR_LABEL: &str = "CORE_V1_API_ERROR";

/// Tag attached to failures detected before anything was written.
pub const VALIDATION_ERROR_LABEL: &str = "VALIDATION_ERROR";

/// Mapping failures between an environment variable and its secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Secret is not an environment variable")]
    NotEnvironmentVariable,

    #[error("environment variable is not defined")]
    UndefinedValue,

    #[error("secret \"{name}\" has no data entry")]
    MissingData { name: String },

    #[error("variable data is not valid base64: {0}")]
    InvalidData(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Invalid(String),

    #[error("{message}: {source}")]
    Codec {
        message: String,
        #[source]
        source: CodecError,
    },

    #[error("{message}: environment variable already exists")]
    AlreadyExists { message: String },

    #[error("{message}: {source}")]
    Store {
        message: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceError::Store { .. } => API_ERROR_LABEL,
            _ => VALIDATION_ERROR_LABEL,
        }
    }

    /// HTTP status the REST layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Invalid(_) => 400,
            ServiceError::Codec { source, .. } => match source {
                CodecError::UndefinedValue | CodecError::InvalidData(_) => 400,
                // Stored secrets that cannot be decoded are a server-side problem.
                CodecError::NotEnvironmentVariable | CodecError::MissingData { .. } => 500,
            },
            ServiceError::AlreadyExists { .. } => 409,
            ServiceError::Store { source, .. } => source.status_code(),
        }
    }
}
