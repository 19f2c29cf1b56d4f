//! Duplicate document removal
//!
//! Two documents are duplicates when their stop-word-filtered word sets
//! are exactly equal, regardless of word order or repetition counts. The
//! detector runs purely on the engine's public read interface: it groups
//! live ids by word set in one read pass, then removes every id in a
//! group except the lowest-numbered one.

use crate::engine::SearchEngine;
use docrank_core::DocumentId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Remove all duplicate documents, keeping the lowest id of each group.
///
/// Returns the removed ids in ascending order.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<DocumentId> {
    let mut first_by_words: BTreeMap<BTreeSet<String>, DocumentId> = BTreeMap::new();
    let mut duplicates: Vec<DocumentId> = Vec::new();

    // Ids iterate ascending, so the first id seen per word set is the
    // lowest and survives.
    for id in engine.document_ids() {
        let words: BTreeSet<String> = engine.word_frequencies(id).keys().cloned().collect();
        if first_by_words.contains_key(&words) {
            duplicates.push(id);
        } else {
            first_by_words.insert(words, id);
        }
    }

    for &id in &duplicates {
        info!(target: "docrank::dedup", id, "Removing duplicate document");
        engine.remove_document(id);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrank_core::DocumentStatus;

    #[test]
    fn test_removes_word_set_duplicates() {
        let mut engine = SearchEngine::new(["and", "with"]).unwrap();
        engine
            .add_document(1, "funny pet and nasty rat", DocumentStatus::Actual, &[1])
            .unwrap();
        // Same word set as 1 despite repetition.
        engine
            .add_document(2, "funny funny pet and nasty nasty rat", DocumentStatus::Actual, &[1])
            .unwrap();
        // Different word set.
        engine
            .add_document(3, "nasty rat with curly hair", DocumentStatus::Actual, &[1])
            .unwrap();

        let removed = remove_duplicates(&mut engine);
        assert_eq!(removed, vec![2]);
        assert_eq!(engine.document_ids().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_stop_word_differences_are_duplicates() {
        let mut engine = SearchEngine::new(["and", "with"]).unwrap();
        engine
            .add_document(1, "funny pet with curly hair", DocumentStatus::Actual, &[1])
            .unwrap();
        engine
            .add_document(2, "funny pet and curly hair", DocumentStatus::Actual, &[1])
            .unwrap();

        let removed = remove_duplicates(&mut engine);
        assert_eq!(removed, vec![2]);
    }

    #[test]
    fn test_no_duplicates_is_noop() {
        let mut engine = SearchEngine::new(Vec::<&str>::new()).unwrap();
        engine.add_document(1, "a b", DocumentStatus::Actual, &[]).unwrap();
        engine.add_document(2, "a c", DocumentStatus::Actual, &[]).unwrap();

        assert!(remove_duplicates(&mut engine).is_empty());
        assert_eq!(engine.document_count(), 2);
    }

    #[test]
    fn test_lowest_id_survives_across_many() {
        let mut engine = SearchEngine::new(Vec::<&str>::new()).unwrap();
        for id in [9, 4, 7] {
            engine.add_document(id, "same words here", DocumentStatus::Actual, &[]).unwrap();
        }
        let removed = remove_duplicates(&mut engine);
        assert_eq!(removed, vec![7, 9]);
        assert_eq!(engine.document_ids().collect::<Vec<_>>(), vec![4]);
    }
}
