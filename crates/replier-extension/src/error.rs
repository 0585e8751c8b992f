// crates/replier-extension/src/error.rs
// Error types for the extension side

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtensionError {
    /// The backend could not be reached. The message always mentions "fetch".
    #[error("fetch failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A browser API threw
    #[error("browser error: {0}")]
    Browser(String),
}
