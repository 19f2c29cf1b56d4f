//! Index storage for docrank
//!
//! This crate owns the mutable heart of the system:
//! - [`IndexStore`] with the forward index (document -> word frequencies),
//!   the inverse index (word -> document frequencies) and per-document
//!   metadata
//! - Document lifecycle operations: add, and remove in sequential or
//!   parallel mode
//!
//! The two indices are kept bidirectionally consistent after every
//! mutation: a word appears under a document in the forward index exactly
//! when the document appears under the word in the inverse index, with
//! equal frequency values.
//!
//! # Thread safety
//!
//! Queries read the store through `&self` and are safe to run from many
//! threads at once. Mutations take `&mut self` and must be serialized by
//! the caller against any in-flight query touching the same document id;
//! the parallel removal variant fans out internally but still owns the
//! store exclusively for the duration of the call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{DocumentMeta, IndexStore, Postings};
