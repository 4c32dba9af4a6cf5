//! CRUD operations over a [`DocumentStore`].
//!
//! The service is stateless apart from the shared store handle; clone it freely into request
//! handlers. It performs no field validation: callers are trusted to send what they mean.

use crate::store::DocumentStore;
use crate::{CoreError, CoreResult};
use quill_types::{Document, DocumentFields, DocumentId};
use std::sync::Arc;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document existed and has been removed.
    Deleted,
    /// Nothing held that id; deletion is idempotent so this is still a success.
    AlreadyAbsent,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new document and return it with its assigned id.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store fails.
    pub fn create(&self, fields: DocumentFields) -> CoreResult<Document> {
        tracing::debug!("creating document with topic {:?}", fields.topic);
        match self.store.create(&fields) {
            Ok(id) => {
                tracing::info!("document saved: {}", id);
                Ok(Document::new(id, fields))
            }
            Err(e) => {
                tracing::error!("error saving document: {}", e);
                Err(e.into())
            }
        }
    }

    /// Every stored document, in store order.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store fails.
    pub fn list_all(&self) -> CoreResult<Vec<Document>> {
        match self.store.list_all() {
            Ok(documents) => {
                tracing::info!("fetched documents, count: {}", documents.len());
                Ok(documents)
            }
            Err(e) => {
                tracing::error!("error fetching documents: {}", e);
                Err(e.into())
            }
        }
    }

    /// Replace all fields of document `id`.
    ///
    /// Returns the submitted fields with the unchanged id.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if no document has that id, or `CoreError::Store` if the store
    /// fails.
    pub fn update_by_id(&self, id: &DocumentId, fields: DocumentFields) -> CoreResult<Document> {
        match self.store.update_by_id(id, &fields) {
            Ok(()) => {
                tracing::info!("document updated: {}", id);
                Ok(Document::new(id.clone(), fields))
            }
            Err(e) => {
                let err = CoreError::from(e);
                match &err {
                    CoreError::NotFound(_) => tracing::warn!("update of unknown document: {}", id),
                    _ => tracing::error!("error updating document {}: {}", id, err),
                }
                Err(err)
            }
        }
    }

    /// Remove document `id`; an unknown id is not an error.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store fails.
    pub fn delete_by_id(&self, id: &DocumentId) -> CoreResult<DeleteOutcome> {
        match self.store.delete_by_id(id).map_err(CoreError::from) {
            Ok(()) => {
                tracing::info!("document deleted: {}", id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(CoreError::NotFound(_)) => {
                tracing::info!("delete of absent document treated as done: {}", id);
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(e) => {
                tracing::error!("error deleting document {}: {}", id, e);
                Err(e)
            }
        }
    }
}
