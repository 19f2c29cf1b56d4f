//! docrank - in-memory TF-IDF document index
//!
//! docrank ranks text documents against free-text queries using TF-IDF,
//! with caller-selected sequential or parallel evaluation per call.
//!
//! # Quick start
//!
//! ```
//! use docrank::{DocumentStatus, SearchEngine};
//!
//! # fn main() -> docrank::Result<()> {
//! let mut engine = SearchEngine::new(["and", "with"])?;
//! engine.add_document(1, "funny pet and nasty rat", DocumentStatus::Actual, &[7, 2, 7])?;
//! engine.add_document(2, "funny pet with curly hair", DocumentStatus::Actual, &[1, 2])?;
//!
//! let results = engine.find_top_documents("funny -nasty")?;
//! assert_eq!(results[0].id, 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! [`SearchEngine`] is the public facade over the internal crates: the
//! index store (forward/inverse indices), the query parser, the relevance
//! engine and the sharded concurrent accumulator the parallel path uses.
//! Alongside it live three small collaborators that consume only the
//! facade's public API: [`paginate`], [`RequestLog`] and
//! [`remove_duplicates`].
//!
//! # Concurrency
//!
//! Queries borrow the engine immutably and may run from many threads;
//! mutations (`add_document`, `remove_document`) take `&mut self` and are
//! serialized against reads by Rust's borrow rules. Parallel execution
//! modes fan out internally and return only once the fan-out completes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dedup;
pub mod engine;
pub mod paginator;
pub mod request_log;

pub use docrank_core::{
    Document, DocumentId, DocumentStatus, Error, ExecutionMode, Result, MAX_RESULT_COUNT,
};
pub use dedup::remove_duplicates;
pub use engine::SearchEngine;
pub use paginator::{paginate, Page};
pub use request_log::RequestLog;
