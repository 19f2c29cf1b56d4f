//! The public search engine facade
//!
//! Thin, validated delegation onto the index store and the relevance
//! engine. The mutation surface (add/remove) is the document lifecycle
//! layer; it adds no invariants of its own beyond the store's.

use docrank_core::{
    Document, DocumentId, DocumentStatus, ExecutionMode, Result,
};
use docrank_index::IndexStore;
use docrank_search::{find_top_documents, match_document};
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory TF-IDF document index.
///
/// Each engine instance is independent; construct and drop as many as
/// needed. See the crate docs for the concurrency contract.
pub struct SearchEngine {
    store: IndexStore,
}

impl SearchEngine {
    /// Create an engine with the given stop words.
    ///
    /// Empty stop words are dropped and the set is deduplicated. Fails
    /// with `InvalidArgument` if any stop word contains a control
    /// character.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(SearchEngine {
            store: IndexStore::new(stop_words)?,
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Index a document.
    ///
    /// `rating` becomes the truncated mean of `ratings` (0 if empty).
    /// Fails with `InvalidArgument` on a negative or duplicate id, empty
    /// text, or control characters in the text.
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        self.store.add_document(id, text, status, ratings)
    }

    /// Remove a document sequentially. Unknown ids are a no-op.
    pub fn remove_document(&mut self, id: DocumentId) {
        self.store.remove_document(id, ExecutionMode::Sequential);
    }

    /// Remove a document with an explicit execution mode.
    pub fn remove_document_with(&mut self, mode: ExecutionMode, id: DocumentId) {
        self.store.remove_document(id, mode);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Top documents for `raw_query` with status `Actual`, sequentially.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query)
    }

    /// Top `Actual` documents with an explicit execution mode.
    pub fn find_top_documents_with(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with_status_and(mode, raw_query, DocumentStatus::Actual)
    }

    /// Top documents filtered to one status, sequentially.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with_status_and(ExecutionMode::Sequential, raw_query, status)
    }

    /// Top documents filtered to one status with an explicit mode.
    pub fn find_top_documents_with_status_and(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_and(mode, raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents gated by an arbitrary predicate, sequentially.
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_by_and(ExecutionMode::Sequential, raw_query, predicate)
    }

    /// Top documents gated by an arbitrary predicate with an explicit mode.
    ///
    /// The predicate sees `(id, status, rating)` and must accept a document
    /// for it to be eligible for scoring at all.
    pub fn find_top_documents_by_and<P>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        debug!(target: "docrank::engine", query = raw_query, ?mode, "find_top_documents");
        find_top_documents(&self.store, raw_query, predicate, mode)
    }

    /// Plus words of `raw_query` contained in document `id`, sequentially.
    ///
    /// See [`match_document`] for the minus-word contract. Unknown ids
    /// fail with `DocumentNotFound`.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with(ExecutionMode::Sequential, raw_query, id)
    }

    /// [`Self::match_document`] with an explicit execution mode.
    pub fn match_document_with(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        debug!(target: "docrank::engine", query = raw_query, id, ?mode, "match_document");
        match_document(&self.store, raw_query, id, mode)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.store.document_count()
    }

    /// Word frequencies of a document; empty for unknown ids.
    pub fn word_frequencies(&self, id: DocumentId) -> &BTreeMap<String, f64> {
        self.store.word_frequencies(id)
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.store.document_ids()
    }
}
