//! Store-assigned document identifiers.

use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque identifier of a stored document.
///
/// Identifiers are assigned by the store on creation and never change afterwards. Clients must
/// treat them as opaque strings: they are echoed back in update and delete paths, nothing more.
///
/// Stores shipped in this workspace allocate ids with [`DocumentId::generate`], which yields the
/// canonical form (32 lowercase hex characters, a v4 UUID without hyphens). An external store may
/// hand out any other non-empty string, so [`DocumentId::new`] accepts arbitrary input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an identifier received from a store or from the wire.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocates a fresh identifier in canonical form.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `input` is exactly 32 lowercase hex characters.
    ///
    /// This is a purely syntactic check, used by stores that derive filesystem paths from ids.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` for a canonical id, `None` otherwise.
    ///
    /// `s1` is the first two hex characters and `s2` the next two, so no single directory has to
    /// hold every document.
    pub fn sharded_dir(&self, parent_dir: &Path) -> Option<PathBuf> {
        if !Self::is_canonical(&self.0) {
            return None;
        }
        let s1 = &self.0[0..2];
        let s2 = &self.0[2..4];
        Some(parent_dir.join(s1).join(s2).join(&self.0))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
