//! Line-indexed text document.
//!
//! The document is the single source of truth for buffer content. Positions
//! are `(line, column)` pairs with the column counted in chars. Every
//! operation clamps out-of-range positions to the document instead of
//! failing, so an edit computed against an older version of the text lands
//! at the nearest valid location.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// A position in the document. Both fields are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Displayed 1-based, the way line:col is shown to users
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Half-open range `[start, end)` over the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Create a range, swapping the endpoints if they are reversed
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Empty range at a position
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of lines the range touches
    pub fn line_span(&self) -> usize {
        self.end.line - self.start.line + 1
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Text document stored as a vector of lines (without line terminators)
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    file_path: Option<PathBuf>,
    modified: bool,
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// Create an empty document (a single empty line)
    pub fn empty() -> Self {
        Self {
            lines: vec![String::new()],
            file_path: None,
            modified: false,
            version: 0,
        }
    }

    /// Create a document from a string. CRLF line endings are normalized.
    pub fn from_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
            file_path: None,
            modified: false,
            version: 0,
        }
    }

    /// Load a document from disk. A missing file yields an empty document
    /// associated with that path so it can be created on save.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let mut doc = match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_text(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", path.display());
                Self::empty()
            }
            Err(e) => return Err(e),
        };
        doc.file_path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Write the document back to its file
    pub fn save(&mut self) -> anyhow::Result<()> {
        let path = self
            .file_path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Document has no file path"))?;
        std::fs::write(&path, self.text())?;
        self.modified = false;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Monotonic counter bumped by every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Full text with `\n` line terminators
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Length of a line in chars (0 for lines past the end)
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    /// Position just past the last character
    pub fn end_position(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.line_len(last))
    }

    /// Clamp a position into the document
    pub fn clamp(&self, pos: Position) -> Position {
        if pos.line >= self.lines.len() {
            return self.end_position();
        }
        Position::new(pos.line, pos.column.min(self.line_len(pos.line)))
    }

    /// Clamp both ends of a range into the document
    pub fn clamp_range(&self, range: TextRange) -> TextRange {
        TextRange::new(self.clamp(range.start), self.clamp(range.end))
    }

    /// Text covered by a range (clamped)
    pub fn text_in_range(&self, range: TextRange) -> String {
        let range = self.clamp_range(range);
        let (start, end) = (range.start, range.end);
        if start.line == end.line {
            let line = &self.lines[start.line];
            return slice_chars(line, start.column, end.column).to_string();
        }

        let mut out = String::new();
        out.push_str(slice_chars(&self.lines[start.line], start.column, usize::MAX));
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(slice_chars(&self.lines[end.line], 0, end.column));
        out
    }

    /// Replace the text in `range` with `text`.
    ///
    /// Returns the range now occupied by the inserted text.
    pub fn replace(&mut self, range: TextRange, text: &str) -> TextRange {
        let range = self.clamp_range(range);
        let (start, end) = (range.start, range.end);

        let prefix = slice_chars(&self.lines[start.line], 0, start.column).to_string();
        let suffix = slice_chars(&self.lines[end.line], end.column, usize::MAX).to_string();

        let normalized = text.replace("\r\n", "\n");
        let mut new_lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
        let inserted_last = new_lines.len() - 1;
        let end_column = if inserted_last == 0 {
            start.column + new_lines[0].chars().count()
        } else {
            new_lines[inserted_last].chars().count()
        };

        new_lines[0].insert_str(0, &prefix);
        new_lines[inserted_last].push_str(&suffix);

        self.lines.splice(start.line..=end.line, new_lines);
        self.modified = true;
        self.version += 1;

        TextRange::new(start, Position::new(start.line + inserted_last, end_column))
    }

    /// Insert text at a position
    pub fn insert(&mut self, pos: Position, text: &str) -> TextRange {
        self.replace(TextRange::point(pos), text)
    }

    /// Convert a position to a byte offset into [`Document::text`]
    pub fn position_to_offset(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let preceding: usize = self.lines[..pos.line].iter().map(|l| l.len() + 1).sum();
        preceding + char_to_byte(&self.lines[pos.line], pos.column)
    }

    /// Convert a byte offset into [`Document::text`] to a position.
    /// Offsets inside a multi-byte char resolve to that char.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            if remaining <= line.len() {
                let column = line
                    .char_indices()
                    .take_while(|(b, _)| *b < remaining)
                    .count();
                return Position::new(idx, column);
            }
            remaining -= line.len() + 1;
        }
        self.end_position()
    }
}

/// Byte index of the `col`-th char of `line` (clamped to the line length)
fn char_to_byte(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(byte, _)| byte)
}

/// Slice a line by char columns
fn slice_chars(line: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(line, start);
    let end_byte = char_to_byte(line, end).max(start_byte);
    &line[start_byte..end_byte]
}
