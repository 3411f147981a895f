//! Document Store Module
//!
//! Named collections of JSON documents keyed by their `_id` field, queried
//! with composable filters, sorting, skip and limit. Collections optionally
//! keep a JSON snapshot on disk that is rewritten after every write.

mod collection;
mod filter;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use collection::{Collection, FindOptions, Sort, SortOrder};
pub use filter::Filter;

/// Field holding a document's primary key.
pub const ID_FIELD: &str = "_id";

// == Document Trait ==
/// A type stored as one document of a named collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name; also the snapshot file stem.
    const COLLECTION: &'static str;

    /// Primary key, serialized under [`ID_FIELD`].
    fn id(&self) -> &str;
}

// == Store Error Enum ==
/// Errors raised by the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document with the same `_id` already exists
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Document did not serialize to a JSON object
    #[error("Document in '{0}' is not a JSON object")]
    NotAnObject(&'static str),

    /// Snapshot document without an `_id`
    #[error("Document in '{0}' has no _id field")]
    MissingId(&'static str),

    /// Encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
