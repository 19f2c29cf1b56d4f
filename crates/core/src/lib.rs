//! Core types for the docrank document index
//!
//! This crate defines the shared vocabulary of the workspace:
//! - Document model ([`Document`], [`DocumentStatus`], [`DocumentId`])
//! - Execution mode selection ([`ExecutionMode`])
//! - Error types ([`Error`], [`Result`])
//! - Text splitting and validation helpers ([`text`])
//!
//! Nothing here holds state; higher crates (index, search, engine) build on
//! these types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod text;

pub use document::{average_rating, Document, DocumentId, DocumentStatus, ExecutionMode};
pub use error::{Error, Result};

/// Maximum number of documents returned by a top-documents query.
pub const MAX_RESULT_COUNT: usize = 5;

/// Relevance values closer than this are considered equal when ranking.
pub const RELEVANCE_EPSILON: f64 = 1e-6;
