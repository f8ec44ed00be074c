//! Errors surfaced by the registry's service boundary.
//!
//! Storage code works in `anyhow::Result`; the domain service folds those
//! failures into [`RegistryError::Storage`] so that callers only ever see the
//! two error kinds the HTTP contract knows about.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ErrorKind, ErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required field is missing or malformed; nothing was written.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The record store is unreachable, timed out, or failed a read/write.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        RegistryError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn storage(err: anyhow::Error) -> Self {
        RegistryError::Storage(format!("{:#}", err))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Validation { .. } => ErrorKind::ValidationError,
            RegistryError::Storage(_) => ErrorKind::StorageError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::Validation { .. } => StatusCode::BAD_REQUEST,
            RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            RegistryError::Validation { field, message } => {
                ErrorResponse::new(self.kind(), Some(field.clone()), message.clone())
            }
            RegistryError::Storage(message) => {
                tracing::error!("Storage error: {}", message);
                ErrorResponse::new(self.kind(), None, message.clone())
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Problems with the server configuration or the schedule rule file,
/// reported before the server starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to read schedule file {path}: {source}")]
    ScheduleFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schedule rules: {0}")]
    ScheduleFormat(#[from] serde_yaml::Error),

    #[error("invalid schedule rule for {vaccine}: {reason}")]
    ScheduleRule { vaccine: String, reason: String },
}
