use crate::{DocumentId, FieldError, FieldResult};
use std::fmt;

/// One of the three editable fields of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Topic,
    Writer,
    Content,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Topic, Field::Writer, Field::Content];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Topic => "topic",
            Field::Writer => "writer",
            Field::Content => "content",
        })
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "topic" => Ok(Field::Topic),
            "writer" => Ok(Field::Writer),
            "content" => Ok(Field::Content),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// The editable part of a document: everything except the id.
///
/// This is the body of create and update requests and the shape of an unsaved draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentFields {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub writer: String,
    #[serde(default)]
    pub content: String,
}

impl DocumentFields {
    pub fn new(
        topic: impl Into<String>,
        writer: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            writer: writer.into(),
            content: content.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Topic => &self.topic,
            Field::Writer => &self.writer,
            Field::Content => &self.content,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Topic => self.topic = value,
            Field::Writer => self.writer = value,
            Field::Content => self.content = value,
        }
    }

    /// Checks that no field is empty.
    ///
    /// Fields are checked in `topic`, `writer`, `content` order and the first empty one is
    /// reported. Whitespace counts as text; values are never trimmed or otherwise rewritten.
    pub fn validate(&self) -> FieldResult<()> {
        for field in Field::ALL {
            if self.get(field).is_empty() {
                return Err(FieldError::Empty(field));
            }
        }
        Ok(())
    }

    /// True if at least one field holds any text.
    pub fn has_input(&self) -> bool {
        Field::ALL.iter().any(|f| !self.get(*f).is_empty())
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub topic: String,
    pub writer: String,
    pub content: String,
}

impl Document {
    pub fn new(id: DocumentId, fields: DocumentFields) -> Self {
        Self {
            id,
            topic: fields.topic,
            writer: fields.writer,
            content: fields.content,
        }
    }

    pub fn fields(&self) -> DocumentFields {
        DocumentFields::new(&self.topic, &self.writer, &self.content)
    }

    /// Case-insensitive substring match over topic, writer and content.
    ///
    /// An empty term matches every document.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.topic, &self.writer, &self.content]
            .iter()
            .any(|value| value.to_lowercase().contains(&term))
    }

    /// Plain-text rendering used for downloads.
    pub fn to_plain_text(&self) -> String {
        format!(
            "Topic: {}\nWriter: {}\n\n{}",
            self.topic, self.writer, self.content
        )
    }

    /// Download file name: the topic with every whitespace run replaced by `_`, plus `.txt`.
    ///
    /// Path separators and other characters that are not portable in file names also become
    /// `_`, so the name is always a single path component. A topic that leaves nothing but
    /// dots or underscores falls back to `document.txt`.
    pub fn export_file_name(&self) -> String {
        let mut stem = String::with_capacity(self.topic.len());
        let mut in_space = false;
        for ch in self.topic.chars() {
            if ch.is_whitespace() {
                if !in_space {
                    stem.push('_');
                }
                in_space = true;
                continue;
            }
            in_space = false;
            if ch.is_control() || UNSAFE_FILE_NAME_CHARS.contains(&ch) {
                stem.push('_');
            } else {
                stem.push(ch);
            }
        }
        if stem.chars().all(|ch| ch == '.' || ch == '_') {
            stem = EXPORT_FALLBACK_STEM.to_string();
        }
        stem.push_str(".txt");
        stem
    }
}

const UNSAFE_FILE_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
const EXPORT_FALLBACK_STEM: &str = "document";
