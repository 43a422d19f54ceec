// src/error.rs

//! Unified error handling for the advisor client.

use std::fmt;

use thiserror::Error;

/// Result type alias for advisor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The backend answered 404 for a resource
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The backend answered with a non-success status other than 404
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Action refused locally because the permission check failed closed
    #[error("Not allowed: {0}")]
    Unauthorized(String),

    /// No bearer token was supplied
    #[error("Missing access token")]
    MissingToken,
}

impl AppError {
    /// Create a not-found error for a resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a status error for a non-success response.
    pub fn status(status: u16, url: impl fmt::Display) -> Self {
        Self::Status {
            status,
            url: url.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an authorization error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Whether this error means "the resource does not exist".
    ///
    /// Transport errors carrying a 404 status count as well.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Status { status, .. } => *status == 404,
            Self::Http(e) => e.status().is_some_and(|s| s.as_u16() == 404),
            _ => false,
        }
    }
}
