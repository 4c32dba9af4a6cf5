//! JSON-file document store.
//!
//! Each document is a directory allocated from its id with [`DocumentId::sharded_dir`] and holds
//! a single `document.json`. Listing walks the shard tree; files that fail to parse are logged
//! and skipped so one corrupt record cannot hide the rest.

use super::DocumentStore;
use crate::constants::{
    DOCUMENTS_DIR_NAME, DOCUMENT_JSON_FILENAME, MAX_ID_ALLOCATION_ATTEMPTS, TEMP_FILE_SUFFIX,
};
use crate::{StoreError, StoreResult};
use chrono::{DateTime, Duration, Utc};
use quill_types::{Document, DocumentFields, DocumentId};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// On-disk form of a document.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoredDocument {
    id: DocumentId,
    topic: String,
    writer: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredDocument {
    fn into_document(self) -> Document {
        Document::new(
            self.id,
            DocumentFields::new(self.topic, self.writer, self.content),
        )
    }
}

/// Store persisting one JSON file per document under `<data_dir>/documents/`.
///
/// Mutations are serialised through an internal mutex which also tracks the latest
/// `created_at`, so creation timestamps are strictly increasing and `list_all` returns documents
/// in creation order.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    last_created: Mutex<Option<DateTime<Utc>>>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `data_dir`.
    ///
    /// # Errors
    /// Returns `StoreError::DirCreation` if the documents directory cannot be created, or a read
    /// error if existing documents cannot be scanned.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let root = data_dir.join(DOCUMENTS_DIR_NAME);
        fs::create_dir_all(&root).map_err(StoreError::DirCreation)?;

        let store = Self {
            root,
            last_created: Mutex::new(None),
        };
        let latest = store
            .read_all()?
            .into_iter()
            .map(|doc| doc.created_at)
            .max();
        *store
            .last_created
            .lock()
            .map_err(|_| StoreError::LockPoisoned)? = latest;

        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, id: &DocumentId) -> Option<PathBuf> {
        id.sharded_dir(&self.root)
            .map(|dir| dir.join(DOCUMENT_JSON_FILENAME))
    }

    /// Allocate a fresh id together with its (newly created) directory.
    fn allocate_dir(&self) -> StoreResult<(DocumentId, PathBuf)> {
        for _attempt in 0..MAX_ID_ALLOCATION_ATTEMPTS {
            let id = DocumentId::generate();
            let Some(candidate) = id.sharded_dir(&self.root) else {
                continue;
            };

            if candidate.exists() {
                continue;
            }

            if let Some(parent) = candidate.parent() {
                fs::create_dir_all(parent).map_err(StoreError::DirCreation)?;
            }

            match fs::create_dir(&candidate) {
                Ok(()) => return Ok((id, candidate)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StoreError::DirCreation(e)),
            }
        }

        Err(StoreError::DirCreation(io::Error::new(
            ErrorKind::AlreadyExists,
            "failed to allocate a unique document directory",
        )))
    }

    fn read_document(path: &Path) -> StoreResult<StoredDocument> {
        let contents = fs::read_to_string(path).map_err(StoreError::FileRead)?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Deserialization {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write via a sibling temp file and rename, so readers never see a partial document.
    fn write_document(path: &Path, doc: &StoredDocument) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(doc).map_err(StoreError::Serialization)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TEMP_FILE_SUFFIX);
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(StoreError::FileWrite)?;
        fs::rename(&tmp, path).map_err(StoreError::FileWrite)
    }

    fn read_all(&self) -> StoreResult<Vec<StoredDocument>> {
        let mut documents = Vec::new();

        let s1_iter = match fs::read_dir(&self.root) {
            Ok(it) => it,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(documents),
            Err(e) => return Err(StoreError::FileRead(e)),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }
            let Ok(s2_iter) = fs::read_dir(&s1_path) else {
                continue;
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }
                let Ok(id_iter) = fs::read_dir(&s2_path) else {
                    continue;
                };

                for id_ent in id_iter.flatten() {
                    let doc_path = id_ent.path().join(DOCUMENT_JSON_FILENAME);
                    if !doc_path.is_file() {
                        continue;
                    }

                    match Self::read_document(&doc_path) {
                        Ok(doc) => documents.push(doc),
                        Err(e) => {
                            tracing::warn!("skipping unreadable document: {}", e);
                        }
                    }
                }
            }
        }

        documents.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(documents)
    }
}

impl DocumentStore for JsonFileStore {
    fn create(&self, fields: &DocumentFields) -> StoreResult<DocumentId> {
        let mut last_created = self
            .last_created
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let mut now = Utc::now();
        if let Some(last) = *last_created {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }

        let (id, dir) = self.allocate_dir()?;
        let stored = StoredDocument {
            id: id.clone(),
            topic: fields.topic.clone(),
            writer: fields.writer.clone(),
            content: fields.content.clone(),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = Self::write_document(&dir.join(DOCUMENT_JSON_FILENAME), &stored) {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                tracing::error!(
                    "failed to clean up {} after write error: {}",
                    dir.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        *last_created = Some(now);
        Ok(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Document>> {
        Ok(self
            .read_all()?
            .into_iter()
            .map(StoredDocument::into_document)
            .collect())
    }

    fn update_by_id(&self, id: &DocumentId, fields: &DocumentFields) -> StoreResult<()> {
        let _guard = self
            .last_created
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let path = self
            .document_path(id)
            .filter(|path| path.is_file())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut stored = Self::read_document(&path)?;
        stored.topic = fields.topic.clone();
        stored.writer = fields.writer.clone();
        stored.content = fields.content.clone();
        stored.updated_at = Utc::now();

        Self::write_document(&path, &stored)
    }

    fn delete_by_id(&self, id: &DocumentId) -> StoreResult<()> {
        let _guard = self
            .last_created
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let dir = id
            .sharded_dir(&self.root)
            .filter(|dir| dir.join(DOCUMENT_JSON_FILENAME).is_file())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        fs::remove_dir_all(&dir).map_err(StoreError::FileRemove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields(topic: &str) -> DocumentFields {
        DocumentFields::new(topic, "Alice", "Hello")
    }

    #[test]
    fn test_create_writes_sharded_json_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path()).unwrap();

        let id = store.create(&fields("Essay")).unwrap();
        let path = id
            .sharded_dir(&temp_dir.path().join(DOCUMENTS_DIR_NAME))
            .unwrap()
            .join(DOCUMENT_JSON_FILENAME);

        assert!(path.is_file(), "document.json should exist");
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["topic"], "Essay");
        assert_eq!(raw["id"], id.as_str());
        assert!(raw["created_at"].is_string());
    }

    #[test]
    fn test_list_returns_creation_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path()).unwrap();

        let topics = ["one", "two", "three", "four"];
        for topic in topics {
            store.create(&fields(topic)).unwrap();
        }

        let listed: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|d| d.topic)
            .collect();
        assert_eq!(listed, topics);
    }

    #[test]
    fn test_documents_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let id = {
            let store = JsonFileStore::open(temp_dir.path()).unwrap();
            store.create(&fields("Kept")).unwrap()
        };

        let store = JsonFileStore::open(temp_dir.path()).unwrap();
        let docs = store.list_all().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);

        store.create(&fields("Later")).unwrap();
        let topics: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|d| d.topic)
            .collect();
        assert_eq!(topics, vec!["Kept", "Later"]);
    }

    #[test]
    fn test_update_keeps_id_and_creation_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path()).unwrap();
        let a = store.create(&fields("A")).unwrap();
        store.create(&fields("B")).unwrap();

        store
            .update_by_id(&a, &DocumentFields::new("A2", "Bob", ""))
            .unwrap();

        let docs = store.list_all().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, a);
        assert_eq!(docs[0].fields(), DocumentFields::new("A2", "Bob", ""));
    }

    #[test]
    fn test_update_and_delete_unknown_ids_are_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path()).unwrap();

        let absent = DocumentId::generate();
        assert!(matches!(
            store.update_by_id(&absent, &fields("A")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_by_id(&absent),
            Err(StoreError::NotFound(_))
        ));

        let traversal = DocumentId::new("../../etc");
        assert!(matches!(
            store.delete_by_id(&traversal),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_document_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path()).unwrap();
        let a = store.create(&fields("A")).unwrap();
        let b = store.create(&fields("B")).unwrap();

        store.delete_by_id(&a).unwrap();

        assert!(!a.sharded_dir(store.root()).unwrap().exists());
        let docs = store.list_all().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, b);
    }

    #[test]
    fn test_corrupt_file_is_skipped_when_listing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp_dir.path()).unwrap();
        let good = store.create(&fields("Good")).unwrap();

        let bad = DocumentId::generate();
        let bad_dir = bad.sharded_dir(store.root()).unwrap();
        fs::create_dir_all(&bad_dir).unwrap();
        fs::write(bad_dir.join(DOCUMENT_JSON_FILENAME), b"{not json").unwrap();

        let docs = store.list_all().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, good);
    }
}
