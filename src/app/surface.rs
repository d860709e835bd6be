//! The editing surface as seen by components that do not own it.

use crate::model::document::{Document, Position, TextRange};
use crate::model::event::{Edit, EditError};

/// Read access to the document plus the single funnel through which other
/// components may mutate it.
pub trait EditorSurface {
    /// Full document text
    fn text(&self) -> String;

    /// Text covered by `range`, clamped to the document
    fn text_in_range(&self, range: TextRange) -> String;

    /// Screen cell `(column, row)` of a document position, or `None` when it
    /// is scrolled out of view
    fn screen_position(&self, pos: Position) -> Option<(u16, u16)>;

    /// Apply an edit against its explicit target range. Returns the range
    /// now occupied by the inserted text.
    fn apply_edit(&mut self, edit: Edit) -> Result<TextRange, EditError>;

    /// True once the surface has been torn down
    fn is_disposed(&self) -> bool {
        false
    }
}

/// A bare document is a surface without a screen, used by the headless
/// subcommands.
impl EditorSurface for Document {
    fn text(&self) -> String {
        Document::text(self)
    }

    fn text_in_range(&self, range: TextRange) -> String {
        Document::text_in_range(self, range)
    }

    fn screen_position(&self, _pos: Position) -> Option<(u16, u16)> {
        None
    }

    fn apply_edit(&mut self, edit: Edit) -> Result<TextRange, EditError> {
        Ok(self.replace(edit.range, &edit.text))
    }
}
