use crate::model::document::{Position, TextRange};

/// Cursor with an optional selection.
///
/// `anchor` is where the selection started and `head` is where the cursor
/// currently is. The anchor may come after the head when selecting
/// backwards; [`Selection::range`] always returns the normalized range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    /// A collapsed selection (plain cursor)
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.head)
    }

    /// Move the head, keeping the anchor (extends the selection)
    pub fn extend_to(&mut self, pos: Position) {
        self.head = pos;
    }

    /// Collapse to a caret at `pos`
    pub fn collapse_to(&mut self, pos: Position) {
        self.anchor = pos;
        self.head = pos;
    }
}
