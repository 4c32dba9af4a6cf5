use quill_types::DocumentId;

/// Errors raised by [`crate::DocumentStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error("failed to create document directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to write document file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove document directory: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error(
        "failed to deserialize document (path: {path}): {source}",
        path = path.display()
    )]
    Deserialization {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("document store lock poisoned")]
    LockPoisoned,
    /// The backing store refused or failed the operation for a reason of its own.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by [`crate::DocumentService`] and core configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CoreError::NotFound(id),
            other => CoreError::Store(other),
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
