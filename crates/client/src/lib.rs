//! # Quill Client
//!
//! Headless client for the Quill document API.
//!
//! - [`DocumentsApi`] / [`HttpDocumentsApi`]: the four CRUD calls over HTTP
//! - [`ClientState`]: the mirrored document collection, the draft and the edit position
//! - [`ViewController`]: the list / create / view / edit page state machine
//!
//! Nothing here renders; front ends (see `quill-cli`) read the controller after each action and
//! draw whatever they like. Errors are returned to the caller to show as a blocking notice; no
//! call is ever retried.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{DocumentsApi, HttpDocumentsApi};
pub use config::ClientConfig;
pub use controller::{Export, Page, ViewController, ViewMode};
pub use error::{ClientError, ClientResult, DeleteFailure};
pub use state::ClientState;

pub use quill_types::{Document, DocumentFields, DocumentId, Field};
