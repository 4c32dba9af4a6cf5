//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers never read environment variables themselves.

use crate::store::{DocumentStore, InMemoryStore, JsonFileStore};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which store backs the document service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Documents live for the lifetime of the process.
    Memory,
    /// Documents are persisted as JSON files under the given data directory.
    JsonFiles(PathBuf),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    backend: StoreBackend,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `data_dir` selects the JSON file store. It may not exist yet, but if it does it must be a
    /// directory.
    pub fn new(data_dir: Option<PathBuf>) -> CoreResult<Self> {
        let backend = match data_dir {
            None => StoreBackend::Memory,
            Some(dir) => {
                if dir.exists() && !dir.is_dir() {
                    return Err(CoreError::InvalidInput(format!(
                        "data directory is not a directory: {}",
                        dir.display()
                    )));
                }
                StoreBackend::JsonFiles(dir)
            }
        };

        Ok(Self { backend })
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    pub fn data_dir(&self) -> Option<&Path> {
        match &self.backend {
            StoreBackend::Memory => None,
            StoreBackend::JsonFiles(dir) => Some(dir),
        }
    }

    /// Open the configured store.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the file store's directory cannot be created.
    pub fn open_store(&self) -> CoreResult<Arc<dyn DocumentStore>> {
        match &self.backend {
            StoreBackend::Memory => {
                tracing::info!("using in-memory document store");
                Ok(Arc::new(InMemoryStore::new()))
            }
            StoreBackend::JsonFiles(dir) => {
                tracing::info!("using JSON file document store at {}", dir.display());
                Ok(Arc::new(JsonFileStore::open(dir)?))
            }
        }
    }
}

/// Parse the data directory from an optional environment value.
///
/// `None`, empty and whitespace-only values all mean "no data directory".
pub fn data_dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_dir_from_env_value() {
        assert_eq!(data_dir_from_env_value(None), None);
        assert_eq!(data_dir_from_env_value(Some("   ".into())), None);
        assert_eq!(
            data_dir_from_env_value(Some(" /srv/quill ".into())),
            Some(PathBuf::from("/srv/quill"))
        );
    }

    #[test]
    fn test_new_without_data_dir_uses_memory() {
        let cfg = CoreConfig::new(None).unwrap();
        assert_eq!(cfg.backend(), &StoreBackend::Memory);
        assert!(cfg.data_dir().is_none());
    }

    #[test]
    fn test_new_rejects_file_as_data_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let err = CoreConfig::new(Some(file)).expect_err("a file is not a data directory");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_open_store_creates_missing_data_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("fresh");

        let cfg = CoreConfig::new(Some(data_dir.clone())).unwrap();
        let store = cfg.open_store().expect("open_store should succeed");

        assert!(store.list_all().unwrap().is_empty());
        assert!(data_dir.join(crate::constants::DOCUMENTS_DIR_NAME).is_dir());
    }
}
