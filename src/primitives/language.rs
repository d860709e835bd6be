//! Source languages understood by the analysis backend.
//!
//! The backend accepts a closed set of identifiers. Anything else is edited
//! as plain text and sent with the `plaintext` identifier, never rejected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Python,
    Java,
    Php,
    Cpp,
    Csharp,
    /// Fallback for identifiers the backend does not know about
    #[serde(rename = "plaintext")]
    PlainText,
}

impl Language {
    /// Languages offered by the language selector, in display order
    pub const SUPPORTED: [Language; 6] = [
        Language::Javascript,
        Language::Python,
        Language::Java,
        Language::Php,
        Language::Cpp,
        Language::Csharp,
    ];

    /// Map a backend identifier to a language. Unknown identifiers map to
    /// [`Language::PlainText`].
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "javascript" => Self::Javascript,
            "python" => Self::Python,
            "java" => Self::Java,
            "php" => Self::Php,
            "cpp" => Self::Cpp,
            "csharp" => Self::Csharp,
            _ => Self::PlainText,
        }
    }

    /// Identifier sent to the backend
    pub fn id(&self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Php => "php",
            Self::Cpp => "cpp",
            Self::Csharp => "csharp",
            Self::PlainText => "plaintext",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Javascript => "JavaScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Php => "PHP",
            Self::Cpp => "C++",
            Self::Csharp => "C#",
            Self::PlainText => "Plain Text",
        }
    }

    /// Detect the language from a file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("js" | "mjs" | "cjs" | "jsx") => Self::Javascript,
            Some("py" | "pyw") => Self::Python,
            Some("java") => Self::Java,
            Some("php") => Self::Php,
            Some("cpp" | "cc" | "cxx" | "hpp" | "hh" | "h") => Self::Cpp,
            Some("cs") => Self::Csharp,
            _ => Self::PlainText,
        }
    }

    /// Next language in selector order. Plain text cycles back to the first.
    pub fn next(&self) -> Self {
        let idx = Self::SUPPORTED.iter().position(|l| l == self);
        match idx {
            Some(i) => Self::SUPPORTED[(i + 1) % Self::SUPPORTED.len()],
            None => Self::SUPPORTED[0],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
