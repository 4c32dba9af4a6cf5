//! # Document stores
//!
//! The [`DocumentStore`] trait is the only way the service reaches persisted documents, so the
//! backing database can be swapped without touching request handling.
//!
//! ## Implementations
//!
//! - [`InMemoryStore`]: insertion-ordered, lives as long as the process
//! - [`JsonFileStore`]: one JSON file per document in a sharded directory tree
//!
//! ```text
//! <data_dir>/
//! └── documents/
//!     └── 55/
//!         └── 0e/
//!             └── 550e8400e29b41d4a716446655440000/
//!                 └── document.json
//! ```
//!
//! ## Contract
//!
//! - `create` assigns the id; callers never choose one.
//! - `update_by_id` replaces all three fields and keeps the id.
//! - `update_by_id` and `delete_by_id` return [`StoreError::NotFound`](crate::StoreError::NotFound)
//!   for an id the store does not hold.
//! - Order of `list_all` is defined by the store and is stable between calls without writes.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::StoreResult;
use quill_types::{Document, DocumentFields, DocumentId};

/// Persistent collection of documents.
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return its freshly assigned id.
    fn create(&self, fields: &DocumentFields) -> StoreResult<DocumentId>;

    /// Every document currently held, in store order.
    fn list_all(&self) -> StoreResult<Vec<Document>>;

    /// Replace the fields of an existing document.
    fn update_by_id(&self, id: &DocumentId, fields: &DocumentFields) -> StoreResult<()>;

    /// Remove a document.
    fn delete_by_id(&self, id: &DocumentId) -> StoreResult<()>;
}
