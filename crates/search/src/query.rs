//! Query parsing
//!
//! A raw query is split on ASCII whitespace. A leading `-` marks a minus
//! word. Stop words are dropped regardless of sign. The remaining tokens
//! populate ordered plus/minus word lists; deduplication is an explicit
//! post-step, on by default. The parallel match path parses with
//! duplicates kept and sorts+dedups its result list instead, which is
//! cheaper than synchronizing a dedup inside the fan-out for the short
//! queries this index serves.

use docrank_core::text::{is_valid_word, split_into_words};
use docrank_core::{Error, Result};
use std::collections::{BTreeSet, HashSet};

/// A parsed query: ordered plus-word and minus-word lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Words a document must contain to score.
    pub plus_words: Vec<String>,
    /// Words that exclude a document outright.
    pub minus_words: Vec<String>,
}

struct QueryWord<'t> {
    data: &'t str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'t>(token: &'t str, stop_words: &BTreeSet<String>) -> Result<QueryWord<'t>> {
    let (word, is_minus) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
        return Err(Error::invalid(format!("query word {:?} is invalid", token)));
    }
    Ok(QueryWord {
        data: word,
        is_minus,
        is_stop: stop_words.contains(word),
    })
}

impl Query {
    /// Parse a raw query, deduplicating the word lists.
    ///
    /// Fails with `InvalidArgument` on an empty token after `-`, a double
    /// minus, or a control character in any token.
    pub fn parse(text: &str, stop_words: &BTreeSet<String>) -> Result<Query> {
        let mut query = Query::parse_keeping_duplicates(text, stop_words)?;
        query.dedup();
        Ok(query)
    }

    /// Parse a raw query without the dedup post-step.
    pub fn parse_keeping_duplicates(text: &str, stop_words: &BTreeSet<String>) -> Result<Query> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = parse_query_word(token, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data.to_string());
            } else {
                query.plus_words.push(word.data.to_string());
            }
        }
        Ok(query)
    }

    /// Drop repeated words from both lists, keeping first occurrences.
    pub fn dedup(&mut self) {
        dedup_in_place(&mut self.plus_words);
        dedup_in_place(&mut self.minus_words);
    }
}

fn dedup_in_place(words: &mut Vec<String>) {
    let mut seen = HashSet::new();
    words.retain(|word| seen.insert(word.clone()));
}
