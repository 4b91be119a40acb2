//! Error handling for the arancel predictor
//!
//! Startup failures (configuration, artifacts, schema) and request-time
//! failures (validation, inference) share one error type so that every
//! layer can propagate with `?`. The JSON API maps it to a status through
//! `api_errors::AppError`.

use thiserror::Error;

/// Main error type for the arancel predictor
#[derive(Error, Debug)]
pub enum ArancelError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Artifact '{artifact}' could not be loaded: {message}")]
    Artifact { artifact: String, message: String },

    #[error("Feature schema error: {message}")]
    Schema { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Inference failed: {message}")]
    Inference { message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type ArancelResult<T> = Result<T, ArancelError>;

impl ArancelError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an artifact loading error
    pub fn artifact(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Artifact {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Create a feature schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an inference error
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors that can only happen before the server accepts traffic.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            ArancelError::Config { .. } | ArancelError::Artifact { .. } | ArancelError::Schema { .. }
        )
    }
}

impl From<serde_json::Error> for ArancelError {
    fn from(err: serde_json::Error) -> Self {
        ArancelError::serialization("json_operation", err)
    }
}

impl From<figment::Error> for ArancelError {
    fn from(err: figment::Error) -> Self {
        ArancelError::config(err.to_string())
    }
}
