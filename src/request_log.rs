//! Sliding-window request log
//!
//! Tracks the most recent day of queries (one slot per minute) and reports
//! how many returned no documents. Only the empty/non-empty flag is kept;
//! the oldest slot is dropped once the window is full.

use crate::engine::SearchEngine;
use docrank_core::{Document, DocumentId, DocumentStatus, Result};
use std::collections::VecDeque;

/// Window length: minutes in a day.
const MINUTES_IN_DAY: usize = 1440;

/// Sliding window of empty-result flags over a [`SearchEngine`].
pub struct RequestLog<'e> {
    engine: &'e SearchEngine,
    requests: VecDeque<bool>,
}

impl<'e> RequestLog<'e> {
    /// Create a log over `engine` with an empty window.
    pub fn new(engine: &'e SearchEngine) -> Self {
        RequestLog {
            engine,
            requests: VecDeque::with_capacity(MINUTES_IN_DAY),
        }
    }

    /// Run a default (`Actual`) search and record whether it was empty.
    ///
    /// A query that fails to parse is not recorded.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let results = self.engine.find_top_documents(raw_query)?;
        self.record(results.is_empty());
        Ok(results)
    }

    /// Run a status-filtered search and record whether it was empty.
    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let results = self.engine.find_top_documents_with_status(raw_query, status)?;
        self.record(results.is_empty());
        Ok(results)
    }

    /// Run a predicate-gated search and record whether it was empty.
    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let results = self.engine.find_top_documents_by(raw_query, predicate)?;
        self.record(results.is_empty());
        Ok(results)
    }

    /// Number of logged requests in the window that returned no documents.
    pub fn no_result_count(&self) -> usize {
        self.requests.iter().filter(|&&empty| empty).count()
    }

    fn record(&mut self, empty: bool) {
        if self.requests.len() == MINUTES_IN_DAY {
            self.requests.pop_front();
        }
        self.requests.push_back(empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        let mut engine = SearchEngine::new(["and", "with"]).unwrap();
        engine
            .add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();
        engine
            .add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3])
            .unwrap();
        engine
    }

    #[test]
    fn test_counts_empty_results() {
        let engine = engine();
        let mut log = RequestLog::new(&engine);

        log.add_find_request("empty request").unwrap();
        log.add_find_request("curly dog").unwrap();
        log.add_find_request("sparrow").unwrap();

        assert_eq!(log.no_result_count(), 2);
    }

    #[test]
    fn test_window_drops_oldest() {
        let engine = engine();
        let mut log = RequestLog::new(&engine);

        for _ in 0..1439 {
            log.add_find_request("empty request").unwrap();
        }
        assert_eq!(log.no_result_count(), 1439);

        // Window fills with one non-empty entry, still 1439 empties.
        log.add_find_request("curly dog").unwrap();
        assert_eq!(log.no_result_count(), 1439);

        // Each further request evicts one of the old empties.
        log.add_find_request("big collar").unwrap();
        assert_eq!(log.no_result_count(), 1438);
        log.add_find_request("fancy").unwrap();
        assert_eq!(log.no_result_count(), 1437);

        // An empty request at the cap replaces an empty entry: no change.
        log.add_find_request("sparrow").unwrap();
        assert_eq!(log.no_result_count(), 1437);
    }

    #[test]
    fn test_failed_query_not_recorded() {
        let engine = engine();
        let mut log = RequestLog::new(&engine);
        assert!(log.add_find_request("--broken").is_err());
        assert_eq!(log.no_result_count(), 0);
    }
}
