//! Constants used throughout the Quill core crate.
//!
//! Path and filename constants for the on-disk store live here so the layout is defined once.

/// Directory under the data dir that holds the sharded document tree.
pub const DOCUMENTS_DIR_NAME: &str = "documents";

/// Filename of the JSON record inside each document directory.
pub const DOCUMENT_JSON_FILENAME: &str = "document.json";

/// Suffix of the scratch file written before an atomic rename.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

/// How many fresh ids the file store tries before giving up on allocating a directory.
pub const MAX_ID_ALLOCATION_ATTEMPTS: usize = 5;
