//! Error types for places-client.
//!
//! Every fallible operation in the crate returns [`PlacesError`]. Empty
//! results are not errors: a release or filter that matches nothing yields an
//! empty table.

use thiserror::Error;

/// The main error type for places-client operations.
#[derive(Error, Debug)]
pub enum PlacesError {
    /// Transport failures (connection refused, timeout, truncated body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row from the API is missing a required field or has an unparseable value
    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Not enough observations to compute a statistic
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    /// A series used in a correlation is constant
    #[error("Zero variance in measure {measure}")]
    ZeroVariance { measure: String },
}

impl PlacesError {
    pub(crate) fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        PlacesError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        PlacesError::SchemaMismatch {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with PlacesError
pub type Result<T> = std::result::Result<T, PlacesError>;
