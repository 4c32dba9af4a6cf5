//! In-memory mirror of the document collection.
//!
//! `documents` always has unique ids; after a successful [`ClientState::refresh`] it equals the
//! store's collection and `edit_index` follows the edited document to its new position. Failed operations leave it as it was, except that a partially failed
//! multi-delete still drops the documents that really were deleted.

use crate::api::DocumentsApi;
use crate::error::DeleteFailure;
use crate::{ClientError, ClientResult};
use quill_types::{Document, DocumentFields, DocumentId};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    documents: Vec<Document>,
    draft: Option<DocumentFields>,
    edit_index: Option<usize>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The document at `index`.
    ///
    /// # Errors
    /// Returns `ClientError::UnknownIndex` if `index` is out of range.
    pub fn document(&self, index: usize) -> ClientResult<&Document> {
        self.documents
            .get(index)
            .ok_or(ClientError::UnknownIndex(index))
    }

    pub fn draft(&self) -> Option<&DocumentFields> {
        self.draft.as_ref()
    }

    pub fn set_draft(&mut self, draft: DocumentFields) {
        self.draft = Some(draft);
    }

    pub fn clear_draft(&mut self) {
        self.draft = None;
    }

    pub fn edit_index(&self) -> Option<usize> {
        self.edit_index
    }

    pub fn set_edit_index(&mut self, index: Option<usize>) {
        self.edit_index = index;
    }

    /// Current position of the document with `id`.
    pub fn position_of(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| &doc.id == id)
    }

    /// Replace `documents` with the service's current collection.
    ///
    /// # Errors
    /// Returns the network or service error unchanged; `documents` is left untouched.
    pub async fn refresh<A>(&mut self, api: &A) -> ClientResult<()>
    where
        A: DocumentsApi + ?Sized,
    {
        let fetched = api.list_all().await.map_err(|e| {
            tracing::error!("error fetching documents: {}", e);
            e
        })?;

        let mut seen = HashSet::with_capacity(fetched.len());
        let documents: Vec<Document> = fetched
            .into_iter()
            .filter(|doc| seen.insert(doc.id.clone()))
            .collect();

        let edited_id = self
            .edit_index
            .and_then(|index| self.documents.get(index))
            .map(|doc| doc.id.clone());
        self.documents = documents;
        self.edit_index = edited_id.and_then(|id| self.position_of(&id));
        Ok(())
    }

    /// Validate and create a document, appending it to `documents` and clearing the draft.
    ///
    /// # Errors
    /// Returns `ClientError::Validation` without any network call if a field is empty, or the
    /// network/service error from the create call.
    pub async fn submit<A>(&mut self, api: &A, fields: DocumentFields) -> ClientResult<Document>
    where
        A: DocumentsApi + ?Sized,
    {
        fields.validate()?;

        let created = api.create(&fields).await.map_err(|e| {
            tracing::error!("error creating document: {}", e);
            e
        })?;

        match self.documents.iter_mut().find(|doc| doc.id == created.id) {
            Some(existing) => *existing = created.clone(),
            None => self.documents.push(created.clone()),
        }
        self.draft = None;
        Ok(created)
    }

    /// Validate and save new fields for the document at `index`.
    ///
    /// # Errors
    /// Returns `ClientError::UnknownIndex` or `ClientError::Validation` without any network call,
    /// or the error from the update call (`ClientError::NotFound` if the document is gone).
    pub async fn save_edit<A>(
        &mut self,
        api: &A,
        index: usize,
        fields: DocumentFields,
    ) -> ClientResult<&Document>
    where
        A: DocumentsApi + ?Sized,
    {
        let id = self.document(index)?.id.clone();
        fields.validate()?;

        let updated = api.update_by_id(&id, &fields).await.map_err(|e| {
            tracing::error!("error updating document {}: {}", id, e);
            e
        })?;

        self.documents[index] = updated;
        Ok(&self.documents[index])
    }

    /// Delete every selected document, one request at a time.
    ///
    /// Every selected document is attempted even after a failure. Documents whose delete
    /// succeeded are removed from `documents` in one pass; nothing is rolled back.
    ///
    /// Returns the number of deleted documents.
    ///
    /// # Errors
    /// Returns `ClientError::NothingSelected` or `ClientError::UnknownIndex` before any network
    /// call, and `ClientError::DeleteIncomplete` if at least one delete failed.
    pub async fn delete_selected<A>(
        &mut self,
        api: &A,
        selected: &BTreeSet<usize>,
    ) -> ClientResult<usize>
    where
        A: DocumentsApi + ?Sized,
    {
        if selected.is_empty() {
            return Err(ClientError::NothingSelected);
        }
        let ids: Vec<DocumentId> = selected
            .iter()
            .map(|&index| self.document(index).map(|doc| doc.id.clone()))
            .collect::<ClientResult<_>>()?;

        let mut deleted = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        for id in ids {
            match api.delete_by_id(&id).await {
                Ok(()) => deleted.push(id),
                Err(e) => {
                    tracing::error!("error deleting document {}: {}", id, e);
                    failed.push(DeleteFailure {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let gone: HashSet<&DocumentId> = deleted.iter().collect();
        let edited_id = self
            .edit_index
            .and_then(|index| self.documents.get(index))
            .map(|doc| doc.id.clone());
        self.documents.retain(|doc| !gone.contains(&doc.id));
        self.edit_index = edited_id.and_then(|id| self.position_of(&id));

        if failed.is_empty() {
            Ok(deleted.len())
        } else {
            Err(ClientError::DeleteIncomplete {
                attempted: deleted.len() + failed.len(),
                deleted,
                failed,
            })
        }
    }

    /// Documents matching `term` (case-insensitive, any field), with their positions in
    /// `documents`.
    pub fn search(&self, term: &str) -> Vec<(usize, &Document)> {
        self.documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| doc.matches(term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn fields(topic: &str) -> DocumentFields {
        DocumentFields::new(topic, "Alice", "Hello")
    }

    async fn loaded(api: &FakeApi) -> ClientState {
        let mut state = ClientState::new();
        state.refresh(api).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_refresh_mirrors_service() {
        let api = FakeApi::with_documents(&["A", "B"]);
        let state = loaded(&api).await;

        let topics: Vec<_> = state.documents().iter().map(|d| d.topic.as_str()).collect();
        assert_eq!(topics, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_documents() {
        let api = FakeApi::with_documents(&["A"]);
        let mut state = loaded(&api).await;

        api.add_document(fields("B"));
        api.fail_list(true);
        let err = state.refresh(&api).await.expect_err("list fails");

        assert!(matches!(err, ClientError::Service { status: 500, .. }));
        assert_eq!(state.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_drops_duplicate_ids() {
        let api = FakeApi::with_documents(&["A"]);
        let dup = api.stored()[0].clone();
        api.push_raw(dup);

        let state = loaded(&api).await;
        assert_eq!(state.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_appends_and_clears_draft() {
        let api = FakeApi::default();
        let mut state = loaded(&api).await;
        state.set_draft(fields("Essay"));

        let created = state
            .submit(&api, DocumentFields::new("Essay", "Alice", "Hello"))
            .await
            .unwrap();

        assert_eq!(state.documents(), &[created.clone()]);
        assert!(state.draft().is_none());
        assert_eq!(api.stored(), vec![created]);
    }

    #[tokio::test]
    async fn test_submit_with_empty_field_makes_no_call() {
        let api = FakeApi::with_documents(&["A"]);
        let mut state = loaded(&api).await;
        let calls_before = api.calls().len();

        for bad in [
            DocumentFields::new("", "Alice", "Hello"),
            DocumentFields::new("Essay", "", "Hello"),
            DocumentFields::new("Essay", "Alice", ""),
        ] {
            let err = state.submit(&api, bad).await.expect_err("invalid");
            assert!(matches!(err, ClientError::Validation(_)));
        }

        assert_eq!(api.calls().len(), calls_before);
        assert_eq!(state.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_save_edit_replaces_entry_in_place() {
        let api = FakeApi::with_documents(&["A", "B"]);
        let mut state = loaded(&api).await;
        let id = state.documents()[1].id.clone();

        let saved = state
            .save_edit(&api, 1, DocumentFields::new("B2", "Bob", "Bye"))
            .await
            .unwrap()
            .clone();

        assert_eq!(saved.id, id);
        assert_eq!(state.documents().len(), 2);
        assert_eq!(state.documents()[1].topic, "B2");
        assert_eq!(api.stored()[1].topic, "B2");
    }

    #[tokio::test]
    async fn test_save_edit_of_vanished_document_is_not_found() {
        let api = FakeApi::with_documents(&["A"]);
        let mut state = loaded(&api).await;
        api.remove_all();

        let err = state
            .save_edit(&api, 0, fields("A2"))
            .await
            .expect_err("gone");
        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(state.documents()[0].topic, "A");
    }

    #[tokio::test]
    async fn test_save_edit_rejects_unknown_index() {
        let api = FakeApi::default();
        let mut state = loaded(&api).await;
        let err = state
            .save_edit(&api, 3, fields("A"))
            .await
            .expect_err("no such index");
        assert_eq!(err, ClientError::UnknownIndex(3));
    }

    #[tokio::test]
    async fn test_delete_selected_removes_all_on_success() {
        let api = FakeApi::with_documents(&["A", "B", "C"]);
        let mut state = loaded(&api).await;

        let count = state
            .delete_selected(&api, &BTreeSet::from([0, 2]))
            .await
            .unwrap();

        assert_eq!(count, 2);
        let topics: Vec<_> = state.documents().iter().map(|d| d.topic.as_str()).collect();
        assert_eq!(topics, vec!["B"]);
        assert_eq!(api.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_selected_partial_failure() {
        let api = FakeApi::with_documents(&["doc_a", "doc_b"]);
        let mut state = loaded(&api).await;
        let doc_a = state.documents()[0].id.clone();
        let doc_b = state.documents()[1].id.clone();
        api.fail_delete(&doc_b);

        let err = state
            .delete_selected(&api, &BTreeSet::from([0, 1]))
            .await
            .expect_err("doc_b fails");

        match err {
            ClientError::DeleteIncomplete {
                attempted,
                deleted,
                failed,
            } => {
                assert_eq!(attempted, 2);
                assert_eq!(deleted, vec![doc_a.clone()]);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].id, doc_b);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let remaining: Vec<_> = state.documents().iter().map(|d| d.id.clone()).collect();
        assert_eq!(remaining, vec![doc_b.clone()]);
        let stored: Vec<_> = api.stored().into_iter().map(|d| d.id).collect();
        assert_eq!(stored, vec![doc_b]);
    }

    #[tokio::test]
    async fn test_delete_selected_validates_before_any_call() {
        let api = FakeApi::with_documents(&["A"]);
        let mut state = loaded(&api).await;
        let calls_before = api.calls().len();

        assert_eq!(
            state.delete_selected(&api, &BTreeSet::new()).await,
            Err(ClientError::NothingSelected)
        );
        assert_eq!(
            state.delete_selected(&api, &BTreeSet::from([0, 5])).await,
            Err(ClientError::UnknownIndex(5))
        );
        assert_eq!(api.calls().len(), calls_before);
        assert_eq!(api.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_keeps_edit_index_on_same_document() {
        let api = FakeApi::with_documents(&["A", "B", "C"]);
        let mut state = loaded(&api).await;
        state.set_edit_index(Some(2));

        state
            .delete_selected(&api, &BTreeSet::from([0]))
            .await
            .unwrap();
        assert_eq!(state.edit_index(), Some(1));

        state
            .delete_selected(&api, &BTreeSet::from([1]))
            .await
            .unwrap();
        assert_eq!(state.edit_index(), None);
    }

    #[tokio::test]
    async fn test_refresh_follows_edited_document_to_new_position() {
        let api = FakeApi::with_documents(&["A", "B", "C"]);
        let mut state = loaded(&api).await;
        state.set_edit_index(Some(1));

        api.remove(&state.documents()[0].id.clone());
        state.refresh(&api).await.unwrap();
        assert_eq!(state.edit_index(), Some(0));
        assert_eq!(state.documents()[0].topic, "B");

        api.remove(&state.documents()[0].id.clone());
        state.refresh(&api).await.unwrap();
        assert_eq!(state.edit_index(), None);
    }

    #[tokio::test]
    async fn test_search_keeps_real_positions() {
        let api = FakeApi::with_documents(&["Rust notes", "Shopping", "rusty bike"]);
        let state = loaded(&api).await;

        let hits: Vec<usize> = state.search("RUST").into_iter().map(|(i, _)| i).collect();
        assert_eq!(hits, vec![0, 2]);
        assert_eq!(state.search("").len(), 3);
    }
}
