use crate::model::document::{Position, TextRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who requested an edit. Used for logging and for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditSource {
    /// Typed by the user
    User,
    /// Applied from a remote action result
    RemoteAction,
}

/// A single text replacement against an explicit target range.
///
/// Insertions are replacements of an empty range, deletions are
/// replacements with empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub range: TextRange,
    pub text: String,
    pub source: EditSource,
}

impl Edit {
    pub fn replace(range: TextRange, text: impl Into<String>, source: EditSource) -> Self {
        Self {
            range,
            text: text.into(),
            source,
        }
    }

    pub fn insert(position: Position, text: impl Into<String>, source: EditSource) -> Self {
        Self::replace(TextRange::point(position), text, source)
    }

    pub fn is_insert(&self) -> bool {
        self.range.is_empty()
    }
}

/// Failure to apply an [`Edit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The surface was torn down; nothing may mutate it anymore
    Disposed,
    /// The document is read-only
    ReadOnly,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::Disposed => write!(f, "Editor surface has been disposed"),
            EditError::ReadOnly => write!(f, "Document is read-only"),
        }
    }
}

impl std::error::Error for EditError {}
