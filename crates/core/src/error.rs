//! Error types for the docrank index
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations. Every failure is synchronous and surfaces to the caller;
//! nothing is retried internally.

use crate::document::DocumentId;
use thiserror::Error;

/// Result type alias for docrank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the docrank index
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Rejected input: negative or duplicate id, empty document text,
    /// control characters, malformed query token.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Metadata lookup for an id that is not in the index.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),
}

impl Error {
    /// Shorthand for an `InvalidArgument` with a formatted message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::invalid("query word -- is invalid");
        let msg = err.to_string();
        assert!(msg.contains("Invalid argument"));
        assert!(msg.contains("--"));
    }

    #[test]
    fn test_document_not_found_display() {
        let err = Error::DocumentNotFound(42);
        assert!(err.to_string().contains("42"));
    }
}
