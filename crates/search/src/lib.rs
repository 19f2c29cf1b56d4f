//! Query parsing and TF-IDF relevance for docrank
//!
//! This crate provides:
//! - [`Query`] with plus/minus word parsing, stop-word filtering and
//!   validation
//! - [`find_top_documents`] and [`match_document`], each with a sequential
//!   and a parallel execution mode required to be observably equivalent
//!
//! The parallel relevance path accumulates scores in a
//! [`docrank_concurrency::ConcurrentScoreMap`] and sequences minus-word
//! exclusion strictly after plus-word accumulation, matching the
//! sequential contract.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod query;
pub mod rank;

pub use query::Query;
pub use rank::{find_top_documents, match_document};
