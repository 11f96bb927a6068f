//! Error types for the MBP reconstructor.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.
//! The book engine itself is total over business input; these errors exist
//! for the parser/pipeline boundary and for invariant violations that
//! indicate a bug.

use thiserror::Error;

/// Result type alias for reconstructor operations.
pub type Result<T> = std::result::Result<T, BookError>;

/// Main error type for reconstructor operations.
#[derive(Error, Debug, Clone)]
pub enum BookError {
    /// Input file missing, unreadable, or output unwritable
    #[error("IO error: {0}")]
    Io(String),

    /// Book state inconsistency detected (a bug, not a data condition)
    #[error("book inconsistency: {0}")]
    InconsistentBook(String),

    /// Generic error with context
    #[error("{0}")]
    Generic(String),
}

impl BookError {
    /// Create a generic error from any string-like type.
    pub fn generic(msg: impl Into<String>) -> Self {
        BookError::Generic(msg.into())
    }
}

impl From<std::io::Error> for BookError {
    fn from(err: std::io::Error) -> Self {
        BookError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BookError {
    fn from(err: serde_json::Error) -> Self {
        BookError::Generic(format!("serialization error: {err}"))
    }
}
