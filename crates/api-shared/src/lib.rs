//! # API Shared
//!
//! Shared wire definitions for the Quill HTTP API.
//!
//! Contains:
//! - JSON request/response bodies (`wire` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` on the server side and by `quill-client` when decoding responses.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;

/// Path prefix of the document API.
pub const DOCUMENTS_PATH: &str = "/api/documents";

/// Confirmation message returned by a successful delete.
pub const DELETED_MESSAGE: &str = "Document deleted successfully";
