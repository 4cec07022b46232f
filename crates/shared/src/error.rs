//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error (malformed request input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Deployment or data configuration problem (e.g., no base currency).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request was cancelled before it completed.
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Backing store error.
    #[error("Store error: {0}")]
    Store(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Cancelled(_) => 499,
            Self::Store(_) => 503,
            Self::Configuration(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cancelled(_) => "CANCELLED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
