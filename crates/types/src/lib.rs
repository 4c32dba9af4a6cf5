//! # Quill Types
//!
//! Shared domain types for the Quill document system.
//!
//! Contains:
//! - [`Document`] and [`DocumentFields`], the record and its editable part
//! - [`DocumentId`], the opaque store-assigned identifier
//! - Non-empty field validation used by the client before any network call
//!
//! No I/O happens in this crate; both `quill-core` and `quill-client` depend on it.

mod document;
mod id;

pub use document::{Document, DocumentFields, Field};
pub use id::DocumentId;

/// Errors raised when validating document fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required field was empty
    #[error("{0} cannot be empty")]
    Empty(Field),
}

pub type FieldResult<T> = std::result::Result<T, FieldError>;
