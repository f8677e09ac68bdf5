//! Custom error types for the service.
//!
//! This module defines the primary error type, `AverageError`, for the whole crate.
//! Using the `thiserror` crate, it provides a centralized and consistent way to handle
//! everything that can go wrong, from a malformed request to a failed upstream call.
//!
//! ## Error Hierarchy
//!
//! - **`InvalidKind`** / **`InvalidWindowSize`**: client errors raised while validating a
//!   request. Both map to HTTP 400.
//! - **`UpstreamUnavailable`**: the numbers provider failed or timed out. The request path
//!   absorbs this at the collaborator boundary (see `upstream::ResilientSource`), so it
//!   never reaches a caller of `/numbers/{kind}`.
//! - **`RateLimited`**: the fixed-window request budget is exhausted (HTTP 429).
//! - **`Config`** / **`Configuration`**: parse-level and semantic configuration errors.
//! - **`Io`**: socket binding and file access.
//! - **`Internal`**: anything unexpected. Maps to HTTP 500 and is logged.

use thiserror::Error;

/// Convenience alias for results using the service error type.
pub type AppResult<T> = std::result::Result<T, AverageError>;

/// Every error the service can produce.
#[derive(Error, Debug)]
pub enum AverageError {
    /// Path segment is not one of the known kind codes.
    #[error("Invalid number kind '{0}'. Use p (primes), f (fibonacci), e (even), or r (random)")]
    InvalidKind(String),

    /// `windowSize` is missing a valid positive integer value.
    #[error("Invalid windowSize: {0}")]
    InvalidWindowSize(String),

    /// Upstream numbers provider failed, timed out or returned garbage.
    #[error("Upstream numbers provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Request budget for the current window is used up.
    #[error("Too many requests, try again later")]
    RateLimited,

    /// Figment failed to load or extract the configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration parsed but holds invalid values.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// I/O failure (binding the listener, reading files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected failure while serving a request.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<figment::Error> for AverageError {
    fn from(err: figment::Error) -> Self {
        AverageError::Config(Box::new(err))
    }
}

impl AverageError {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            AverageError::InvalidKind(_) | AverageError::InvalidWindowSize(_) => 400,
            AverageError::RateLimited => 429,
            AverageError::UpstreamUnavailable(_) => 502,
            AverageError::Config(_)
            | AverageError::Configuration(_)
            | AverageError::Io(_)
            | AverageError::Internal(_) => 500,
        }
    }

    /// True when the caller sent a request the service refuses to process.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
