//! JSON bodies exchanged over `/api/documents`.

use quill_types::{Document, DocumentFields, DocumentId};
use utoipa::ToSchema;

/// Body of create and update requests.
///
/// Missing fields decode as empty strings; the server does not validate them.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct DocumentReq {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub writer: String,
    #[serde(default)]
    pub content: String,
}

impl From<DocumentReq> for DocumentFields {
    fn from(req: DocumentReq) -> Self {
        DocumentFields::new(req.topic, req.writer, req.content)
    }
}

impl From<&DocumentFields> for DocumentReq {
    fn from(fields: &DocumentFields) -> Self {
        Self {
            topic: fields.topic.clone(),
            writer: fields.writer.clone(),
            content: fields.content.clone(),
        }
    }
}

/// A stored document as returned by every successful read or write.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct DocumentRes {
    pub id: String,
    pub topic: String,
    pub writer: String,
    pub content: String,
}

impl From<Document> for DocumentRes {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id.as_str().to_owned(),
            topic: doc.topic,
            writer: doc.writer,
            content: doc.content,
        }
    }
}

impl From<DocumentRes> for Document {
    fn from(res: DocumentRes) -> Self {
        Document::new(
            DocumentId::new(res.id),
            DocumentFields::new(res.topic, res.writer, res.content),
        )
    }
}

/// Failure body: a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Confirmation body for operations that return no document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
