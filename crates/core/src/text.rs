//! Text splitting and validation
//!
//! Tokenization is deliberately simple: split on ASCII whitespace and drop
//! empty tokens. Case, punctuation and Unicode segmentation are left to the
//! caller's corpus conventions. Validation rejects control characters
//! (byte values below 0x20) anywhere in a word; that rule applies uniformly
//! to stop words, document text and query tokens.

/// Split text on ASCII whitespace, dropping empty tokens.
///
/// # Example
///
/// ```
/// use docrank_core::text::split_into_words;
///
/// let words = split_into_words("funny  pet and\tnasty rat");
/// assert_eq!(words, vec!["funny", "pet", "and", "nasty", "rat"]);
/// ```
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split_ascii_whitespace().collect()
}

/// A word is valid iff it contains no control characters.
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < 0x20)
}
