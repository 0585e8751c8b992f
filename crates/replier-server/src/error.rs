// crates/replier-server/src/error.rs
// Standardized error types for Replier

use thiserror::Error;

/// Main error type for the Replier library
#[derive(Error, Debug)]
pub enum ReplierError {
    /// Request failed field validation; the message is safe to return to callers
    #[error("{0}")]
    Validation(String),

    #[error("no text response from provider")]
    InvalidResponse,

    #[error("provider error {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using ReplierError
pub type Result<T> = std::result::Result<T, ReplierError>;
