//! Custom error types for pew
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for pew operations
#[derive(Error, Debug)]
pub enum PewError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Transport-level HTTP failures
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote service wants a second factor before accepting the password
    #[error("Two-factor authentication required")]
    TwoFactorRequired,

    /// The remote service rejected the credentials
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The remote service answered with an error or an unexpected shape
    #[error("API error on {endpoint}: {message}")]
    Api { endpoint: String, message: String },

    /// Reading interactive input failed
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl PewError {
    /// Create an API error for an endpoint
    pub fn api(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Check if this error asks for a two-factor challenge
    pub fn is_two_factor_required(&self) -> bool {
        matches!(self, Self::TwoFactorRequired)
    }
}

impl From<std::io::Error> for PewError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for PewError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for pew operations
pub type PewResult<T> = Result<T, PewError>;
