use quill_types::{DocumentId, FieldError};

/// One document that could not be deleted, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub id: DocumentId,
    pub reason: String,
}

/// Everything a client operation can report to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A required field was empty; nothing was sent.
    #[error("please fill in all fields: {0}")]
    Validation(#[from] FieldError),
    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error("no documents selected")]
    NothingSelected,
    #[error("no document at position {0}")]
    UnknownIndex(usize),
    #[error("{action} is not available on the {page} page")]
    InvalidAction {
        action: &'static str,
        page: &'static str,
    },
    /// Some selected documents were deleted, others were not. Nothing is rolled back.
    #[error("failed to delete {} of {attempted} selected documents", .failed.len())]
    DeleteIncomplete {
        attempted: usize,
        deleted: Vec<DocumentId>,
        failed: Vec<DeleteFailure>,
    },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
