//! TF-IDF relevance and top-K selection
//!
//! Scoring follows the classic formulation: a document's relevance is the
//! sum over matching plus words of `tf * idf`, where `tf` comes straight
//! from the index and `idf = ln(total_docs / docs_containing_word)`.
//! A caller predicate over `(id, status, rating)` gates which documents may
//! score at all; minus-word exclusion is authoritative and runs after
//! plus-word accumulation in both execution modes.
//!
//! # Parallel mode
//!
//! Plus words fan out over rayon workers against a sharded
//! [`ConcurrentScoreMap`]; when that fan-out has completed, minus words fan
//! out erasing, and a snapshot produces the candidate map. The two
//! fan-outs are separate synchronous calls, so exclusion can never observe
//! a partially accumulated map, and results match the sequential mode
//! exactly.

use docrank_concurrency::{ConcurrentScoreMap, DEFAULT_SHARD_COUNT};
use docrank_core::{
    Document, DocumentId, DocumentStatus, Error, ExecutionMode, Result, MAX_RESULT_COUNT,
    RELEVANCE_EPSILON,
};
use docrank_index::IndexStore;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::query::Query;

/// Natural log of (live documents / documents containing the word).
///
/// Callers pass the document frequency of a word present in the inverse
/// index, so it is at least one.
fn compute_idf(store: &IndexStore, document_frequency: usize) -> f64 {
    (store.document_count() as f64 / document_frequency as f64).ln()
}

/// Rank documents matching `raw_query` and return the top results.
///
/// `predicate` decides per `(id, status, rating)` whether a document is
/// eligible; an eligible document enters the candidates only if it matches
/// at least one plus word. Any document matching a minus word is excluded
/// regardless of its accumulated score. At most
/// [`MAX_RESULT_COUNT`] results are returned, sorted by relevance
/// descending, then rating descending, then id ascending.
pub fn find_top_documents<P>(
    store: &IndexStore,
    raw_query: &str,
    predicate: P,
    mode: ExecutionMode,
) -> Result<Vec<Document>>
where
    P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
{
    let query = Query::parse(raw_query, store.stop_words())?;

    let candidates = match mode {
        ExecutionMode::Sequential => find_all_sequential(store, &query, &predicate),
        ExecutionMode::Parallel => find_all_parallel(store, &query, &predicate),
    };

    let mut results: Vec<Document> = candidates
        .into_iter()
        .filter_map(|(id, relevance)| {
            store.meta(id).map(|meta| Document::new(id, relevance, meta.rating))
        })
        .collect();

    results.sort_by(compare_ranked);
    results.truncate(MAX_RESULT_COUNT);

    debug!(
        target: "docrank::search",
        plus = query.plus_words.len(),
        minus = query.minus_words.len(),
        ?mode,
        results = results.len(),
        "Query ranked"
    );
    Ok(results)
}

/// Relevance descending, rating descending within the relevance epsilon,
/// id ascending on full ties.
fn compare_ranked(lhs: &Document, rhs: &Document) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        rhs.rating
            .cmp(&lhs.rating)
            .then_with(|| lhs.id.cmp(&rhs.id))
    } else {
        rhs.relevance
            .partial_cmp(&lhs.relevance)
            .unwrap_or(Ordering::Equal)
    }
}

fn find_all_sequential<P>(store: &IndexStore, query: &Query, predicate: &P) -> BTreeMap<DocumentId, f64>
where
    P: Fn(DocumentId, DocumentStatus, i32) -> bool,
{
    let mut candidates = BTreeMap::new();

    for word in &query.plus_words {
        let Some(postings) = store.postings(word) else {
            continue;
        };
        let idf = compute_idf(store, postings.len());
        for (&id, &tf) in postings.iter() {
            let Some(meta) = store.meta(id) else { continue };
            if predicate(id, meta.status, meta.rating) {
                *candidates.entry(id).or_insert(0.0) += tf * idf;
            }
        }
    }

    for word in &query.minus_words {
        let Some(postings) = store.postings(word) else {
            continue;
        };
        for &id in postings.keys() {
            candidates.remove(&id);
        }
    }

    candidates
}

fn find_all_parallel<P>(store: &IndexStore, query: &Query, predicate: &P) -> BTreeMap<DocumentId, f64>
where
    P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
{
    let scores = ConcurrentScoreMap::new(DEFAULT_SHARD_COUNT);

    query.plus_words.par_iter().for_each(|word| {
        let Some(postings) = store.postings(word) else {
            return;
        };
        let idf = compute_idf(store, postings.len());
        for (&id, &tf) in postings.iter() {
            let Some(meta) = store.meta(id) else { continue };
            if predicate(id, meta.status, meta.rating) {
                scores.access(id).add(tf * idf);
            }
        }
    });

    // Exclusion must run against the fully accumulated map; the plus-word
    // fan-out above has completed before this statement starts.
    query.minus_words.par_iter().for_each(|word| {
        let Some(postings) = store.postings(word) else {
            return;
        };
        for &id in postings.keys() {
            scores.erase(id);
        }
    });

    scores.snapshot()
}

/// Report which plus words of `raw_query` a document contains.
///
/// Returns the matched words and the document's status. If the document
/// contains any minus word the matched list is empty: there are no partial
/// plus-word matches once a minus word hits. Unknown ids fail with
/// [`Error::DocumentNotFound`].
pub fn match_document(
    store: &IndexStore,
    raw_query: &str,
    id: DocumentId,
    mode: ExecutionMode,
) -> Result<(Vec<String>, DocumentStatus)> {
    match mode {
        ExecutionMode::Sequential => match_sequential(store, raw_query, id),
        ExecutionMode::Parallel => match_parallel(store, raw_query, id),
    }
}

fn match_sequential(
    store: &IndexStore,
    raw_query: &str,
    id: DocumentId,
) -> Result<(Vec<String>, DocumentStatus)> {
    let query = Query::parse(raw_query, store.stop_words())?;
    let status = store.meta(id).ok_or(Error::DocumentNotFound(id))?.status;
    let frequencies = store.word_frequencies(id);

    let mut matched: Vec<String> = Vec::new();
    for word in &query.plus_words {
        if frequencies.contains_key(word) {
            matched.push(word.clone());
        }
    }
    for word in &query.minus_words {
        if frequencies.contains_key(word) {
            matched.clear();
            break;
        }
    }
    Ok((matched, status))
}

fn match_parallel(
    store: &IndexStore,
    raw_query: &str,
    id: DocumentId,
) -> Result<(Vec<String>, DocumentStatus)> {
    // Dedup is deferred to the matched list; a sort+dedup over the short
    // result is cheaper than synchronizing one inside the fan-out.
    let query = Query::parse_keeping_duplicates(raw_query, store.stop_words())?;
    let status = store.meta(id).ok_or(Error::DocumentNotFound(id))?.status;
    let frequencies = store.word_frequencies(id);

    if query
        .minus_words
        .par_iter()
        .any(|word| frequencies.contains_key(word))
    {
        return Ok((Vec::new(), status));
    }

    let mut matched: Vec<String> = query
        .plus_words
        .par_iter()
        .filter(|word| frequencies.contains_key(*word))
        .cloned()
        .collect();
    matched.sort_unstable();
    matched.dedup();
    Ok((matched, status))
}
