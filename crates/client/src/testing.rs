//! In-process [`DocumentsApi`] used by unit tests.

use crate::api::DocumentsApi;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use quill_types::{Document, DocumentFields, DocumentId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeApi {
    documents: Mutex<Vec<Document>>,
    calls: Mutex<Vec<String>>,
    failing_deletes: Mutex<HashSet<DocumentId>>,
    fail_list: AtomicBool,
}

impl FakeApi {
    pub(crate) fn with_documents(topics: &[&str]) -> Self {
        let api = Self::default();
        for topic in topics {
            api.add_document(DocumentFields::new(*topic, "Alice", "Hello"));
        }
        api
    }

    pub(crate) fn add_document(&self, fields: DocumentFields) -> Document {
        let doc = Document::new(DocumentId::generate(), fields);
        self.push_raw(doc.clone());
        doc
    }

    pub(crate) fn push_raw(&self, doc: Document) {
        self.documents.lock().unwrap().push(doc);
    }

    /// Delete a document behind the client's back.
    pub(crate) fn remove(&self, id: &DocumentId) {
        self.documents.lock().unwrap().retain(|doc| &doc.id != id);
    }

    pub(crate) fn remove_all(&self) {
        self.documents.lock().unwrap().clear();
    }

    pub(crate) fn stored(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_delete(&self, id: &DocumentId) {
        self.failing_deletes.lock().unwrap().insert(id.clone());
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unavailable() -> ClientError {
    ClientError::Service {
        status: 500,
        message: "document store unavailable".into(),
    }
}

#[async_trait]
impl DocumentsApi for FakeApi {
    async fn list_all(&self) -> ClientResult<Vec<Document>> {
        self.record("list".into());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.stored())
    }

    async fn create(&self, fields: &DocumentFields) -> ClientResult<Document> {
        self.record(format!("create {}", fields.topic));
        Ok(self.add_document(fields.clone()))
    }

    async fn update_by_id(
        &self,
        id: &DocumentId,
        fields: &DocumentFields,
    ) -> ClientResult<Document> {
        self.record(format!("update {id}"));
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        *doc = Document::new(id.clone(), fields.clone());
        Ok(doc.clone())
    }

    async fn delete_by_id(&self, id: &DocumentId) -> ClientResult<()> {
        self.record(format!("delete {id}"));
        if self.failing_deletes.lock().unwrap().contains(id) {
            return Err(unavailable());
        }
        self.documents.lock().unwrap().retain(|doc| &doc.id != id);
        Ok(())
    }
}
