//! Document model
//!
//! A document is identified by a caller-chosen non-negative id. Its text is
//! tokenized and absorbed into the index at insertion and never mutated
//! afterwards; what survives in the model is the id, the averaged rating and
//! the caller-supplied status.

use serde::{Deserialize, Serialize};

/// Identifier of an indexed document.
///
/// Callers pick ids; the index accepts only non-negative values and rejects
/// duplicates. The non-negative domain is also what makes shard routing by
/// `id mod N` well-defined in the concurrent accumulator.
pub type DocumentId = i64;

/// Caller-supplied lifecycle status of a document.
///
/// The status is metadata used only for predicate filtering during search.
/// The engine never transitions a status itself: removing a document deletes
/// it outright, so `Removed` exists for callers that want to model the state
/// externally but is never set by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Live, the default search filter.
    Actual,
    /// Kept in the index but normally filtered out.
    Irrelevant,
    /// Excluded from default searches by policy.
    Banned,
    /// Reserved for callers; the core never sets it.
    Removed,
}

/// Execution mode for calls with a sequential and a parallel variant.
///
/// Parallelism is selected per call and runs synchronously: the call does
/// not return until the fanned-out work completes. There is no hidden
/// thread pool state beyond rayon's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Single-threaded evaluation.
    #[default]
    Sequential,
    /// Fan out per-word work across rayon workers.
    Parallel,
}

/// One ranked search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    pub id: DocumentId,
    /// TF-IDF relevance against the query.
    pub relevance: f64,
    /// Truncated mean of the ratings supplied at creation (0 if none).
    pub rating: i32,
}

impl Document {
    /// Create a result row.
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Document {
            id,
            relevance,
            rating,
        }
    }
}

/// Truncated integer mean of the supplied ratings, 0 when empty.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}
