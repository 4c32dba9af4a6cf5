use super::DocumentStore;
use crate::{StoreError, StoreResult};
use quill_types::{Document, DocumentFields, DocumentId};
use std::sync::RwLock;

/// Process-local store; documents are listed in creation order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryStore {
    fn create(&self, fields: &DocumentFields) -> StoreResult<DocumentId> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let mut id = DocumentId::generate();
        while documents.iter().any(|doc| doc.id == id) {
            id = DocumentId::generate();
        }

        documents.push(Document::new(id.clone(), fields.clone()));
        Ok(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Document>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.clone())
    }

    fn update_by_id(&self, id: &DocumentId, fields: &DocumentFields) -> StoreResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let doc = documents
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        *doc = Document::new(id.clone(), fields.clone());
        Ok(())
    }

    fn delete_by_id(&self, id: &DocumentId) -> StoreResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let position = documents
            .iter()
            .position(|doc| &doc.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        documents.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(topic: &str) -> DocumentFields {
        DocumentFields::new(topic, "Alice", "Hello")
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = InMemoryStore::new();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_assigns_distinct_ids_and_keeps_order() {
        let store = InMemoryStore::new();
        let a = store.create(&fields("A")).unwrap();
        let b = store.create(&fields("B")).unwrap();
        assert_ne!(a, b);

        let docs = store.list_all().unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(docs[0].topic, "A");
    }

    #[test]
    fn test_update_replaces_fields_in_place() {
        let store = InMemoryStore::new();
        let a = store.create(&fields("A")).unwrap();
        let b = store.create(&fields("B")).unwrap();

        store
            .update_by_id(&a, &DocumentFields::new("A2", "Bob", "Bye"))
            .unwrap();

        let docs = store.list_all().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, a);
        assert_eq!(docs[0].fields(), DocumentFields::new("A2", "Bob", "Bye"));
        assert_eq!(docs[1].id, b);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .update_by_id(&DocumentId::new("missing"), &fields("A"))
            .expect_err("unknown id");
        assert!(matches!(err, StoreError::NotFound(id) if id.as_str() == "missing"));
    }

    #[test]
    fn test_delete_removes_only_that_document() {
        let store = InMemoryStore::new();
        let a = store.create(&fields("A")).unwrap();
        let b = store.create(&fields("B")).unwrap();

        store.delete_by_id(&a).unwrap();
        let err = store.delete_by_id(&a).expect_err("already deleted");
        assert!(matches!(err, StoreError::NotFound(_)));

        let docs = store.list_all().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, b);
    }
}
