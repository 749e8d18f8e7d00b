//! Unified error handling for logbook-core

use thiserror::Error;

/// Core error type for logbook-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid interval for {service_type}: {field} must be between 0 and {max} (got {value})")]
    InvalidInterval {
        service_type: String,
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for logbook-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid interval error for a service type
    pub fn invalid_interval(
        service_type: impl Into<String>,
        field: &'static str,
        value: i64,
        max: i64,
    ) -> Self {
        Error::InvalidInterval {
            service_type: service_type.into(),
            field,
            value,
            max,
        }
    }

    /// Create an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// True for errors caused by the caller's input rather than the environment
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInterval { .. } | Error::Validation(_))
    }
}
