//! # Quill Core
//!
//! Core business logic for the Quill document system.
//!
//! This crate contains pure data operations:
//! - The [`DocumentStore`] abstraction and its in-memory and JSON-file implementations
//! - [`DocumentService`], the create / list / update / delete operations the API exposes
//! - Startup configuration ([`CoreConfig`])
//!
//! **No API concerns**: HTTP routing, JSON wire shapes and CORS belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod service;
pub mod store;

pub use config::{data_dir_from_env_value, CoreConfig, StoreBackend};
pub use error::{CoreError, CoreResult, StoreError, StoreResult};
pub use service::{DeleteOutcome, DocumentService};
pub use store::{DocumentStore, InMemoryStore, JsonFileStore};

pub use quill_types::{Document, DocumentFields, DocumentId};
