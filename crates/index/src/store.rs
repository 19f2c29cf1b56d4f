//! Forward and inverse document indices
//!
//! The inverse index lives in a `DashMap` so the parallel removal path can
//! erase one document from many postings concurrently while locking only
//! the internal shard that owns each word. The outer map's entry set is
//! never changed during that fan-out; empty postings are pruned in a
//! sequential pass afterwards.

use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use docrank_core::text::{is_valid_word, split_into_words};
use docrank_core::{average_rating, DocumentId, DocumentStatus, Error, ExecutionMode, Result};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Per-document view of the inverse index: document id -> term frequency.
pub type Postings = FxHashMap<DocumentId, f64>;

static EMPTY_FREQUENCIES: Lazy<BTreeMap<String, f64>> = Lazy::new(BTreeMap::new);

/// Metadata kept per live document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentMeta {
    /// Truncated mean of the creation-time ratings.
    pub rating: i32,
    /// Caller-supplied status, used only for predicate filtering.
    pub status: DocumentStatus,
}

/// Owner of the document indices and metadata.
#[derive(Debug)]
pub struct IndexStore {
    /// Stop words, fixed at construction.
    stop_words: BTreeSet<String>,
    /// Inverse index: word -> (document id -> term frequency).
    word_to_documents: DashMap<String, Postings>,
    /// Forward index: document id -> (word -> term frequency).
    document_to_words: FxHashMap<DocumentId, BTreeMap<String, f64>>,
    /// Document metadata.
    documents: FxHashMap<DocumentId, DocumentMeta>,
    /// All live ids, ascending.
    document_ids: BTreeSet<DocumentId>,
}

impl IndexStore {
    /// Create a store with the given stop words.
    ///
    /// Empty entries are dropped and the set is deduplicated. Fails with
    /// `InvalidArgument` if any stop word contains a control character.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words: BTreeSet<String> = stop_words
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.is_empty())
            .collect();

        if let Some(bad) = stop_words.iter().find(|w| !is_valid_word(w)) {
            return Err(Error::invalid(format!(
                "stop word {:?} contains a control character",
                bad
            )));
        }

        Ok(IndexStore {
            stop_words,
            word_to_documents: DashMap::new(),
            document_to_words: FxHashMap::default(),
            documents: FxHashMap::default(),
            document_ids: BTreeSet::new(),
        })
    }

    /// Whether `word` is configured as a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// The configured stop-word set.
    pub fn stop_words(&self) -> &BTreeSet<String> {
        &self.stop_words
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Index a document.
    ///
    /// Fails with `InvalidArgument` if the id is negative or already
    /// present, the text is empty, or the text contains a control
    /// character. On success the document is visible to subsequent reads
    /// immediately. A document whose text is entirely stop words is live
    /// with an empty frequency map.
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(Error::invalid(format!("document id {} is negative", id)));
        }
        if self.documents.contains_key(&id) {
            return Err(Error::invalid(format!("document id {} already exists", id)));
        }
        if text.is_empty() {
            return Err(Error::invalid("document text is empty"));
        }

        let words = self.split_into_words_no_stop(text)?;

        // All validation is done; from here the call cannot fail.
        if !words.is_empty() {
            let inverse_word_count = 1.0 / words.len() as f64;
            let frequencies = self.document_to_words.entry(id).or_default();
            for word in words {
                *self
                    .word_to_documents
                    .entry(word.to_string())
                    .or_default()
                    .entry(id)
                    .or_insert(0.0) += inverse_word_count;
                *frequencies.entry(word.to_string()).or_insert(0.0) += inverse_word_count;
            }
        } else {
            self.document_to_words.insert(id, BTreeMap::new());
        }

        self.documents.insert(
            id,
            DocumentMeta {
                rating: average_rating(ratings),
                status,
            },
        );
        self.document_ids.insert(id);

        debug!(target: "docrank::index", id, words = self.document_to_words[&id].len(), "Document added");
        Ok(())
    }

    /// Remove a document. Unknown ids are a no-op, not an error.
    ///
    /// Erases the document from every posting it owns, then drops its
    /// forward entry, metadata and id-set membership, atomically with
    /// respect to subsequent calls. The parallel mode materializes the word
    /// list first and erases the postings with rayon workers; each erase
    /// locks only the inverse-index shard owning that word.
    pub fn remove_document(&mut self, id: DocumentId, mode: ExecutionMode) {
        if !self.document_ids.contains(&id) {
            return;
        }
        // The forward entry exists for every live id.
        let Some(frequencies) = self.document_to_words.remove(&id) else {
            return;
        };

        match mode {
            ExecutionMode::Sequential => {
                for word in frequencies.keys() {
                    if let Some(mut postings) = self.word_to_documents.get_mut(word) {
                        postings.remove(&id);
                    }
                }
            }
            ExecutionMode::Parallel => {
                let words: Vec<&String> = frequencies.keys().collect();
                words.par_iter().for_each(|word| {
                    if let Some(mut postings) = self.word_to_documents.get_mut(*word) {
                        postings.remove(&id);
                    }
                });
            }
        }

        // Prune words whose posting went empty; the outer map is only
        // mutated here, after the fan-out has completed.
        for word in frequencies.keys() {
            self.word_to_documents
                .remove_if(word, |_, postings| postings.is_empty());
        }

        self.documents.remove(&id);
        self.document_ids.remove(&id);

        debug!(target: "docrank::index", id, ?mode, "Document removed");
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether `id` is live.
    pub fn contains(&self, id: DocumentId) -> bool {
        self.document_ids.contains(&id)
    }

    /// Live ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.document_ids.iter().copied()
    }

    /// Word frequencies of a document; a shared empty map for unknown ids.
    pub fn word_frequencies(&self, id: DocumentId) -> &BTreeMap<String, f64> {
        self.document_to_words
            .get(&id)
            .unwrap_or(&EMPTY_FREQUENCIES)
    }

    /// Metadata of a live document.
    pub fn meta(&self, id: DocumentId) -> Option<DocumentMeta> {
        self.documents.get(&id).copied()
    }

    /// Posting list of a word, if any document contains it.
    ///
    /// The returned guard holds a read lock on the owning inverse-index
    /// shard; drop it before mutating the store.
    pub fn postings(&self, word: &str) -> Option<Ref<'_, String, Postings>> {
        self.word_to_documents.get(word)
    }

    /// Number of live documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.word_to_documents
            .get(word)
            .map(|postings| postings.len())
            .unwrap_or(0)
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(Error::invalid(format!(
                    "word {:?} contains a control character",
                    word
                )));
            }
            if !self.is_stop_word(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}
