//! The open document together with its selection and viewport.
//!
//! This is the [`EditorSurface`] the selection action controller edits
//! through. It is a separate struct from [`super::Editor`] so the editor can
//! lend it to the controller while still owning the controller.

use crate::app::surface::EditorSurface;
use crate::model::document::{Document, Position, TextRange};
use crate::model::event::{Edit, EditError, EditSource};
use crate::model::selection::Selection;
use crate::view::viewport::Viewport;

#[derive(Debug)]
pub struct BufferView {
    pub document: Document,
    pub selection: Selection,
    pub viewport: Viewport,
    pub line_numbers: bool,
    /// Preferred visual column for vertical movement
    goal_column: Option<usize>,
    disposed: bool,
}

impl BufferView {
    pub fn new(document: Document, viewport: Viewport, line_numbers: bool) -> Self {
        let mut view = Self {
            document,
            selection: Selection::default(),
            viewport,
            line_numbers,
            goal_column: None,
            disposed: false,
        };
        view.sync_gutter();
        view
    }

    pub fn cursor(&self) -> Position {
        self.selection.head
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn selected_text(&self) -> String {
        self.document.text_in_range(self.selection.range())
    }

    /// Mark the surface as gone; later edits are rejected
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    fn sync_gutter(&mut self) {
        self.viewport.gutter_width =
            Viewport::gutter_width_for(self.document.line_count(), self.line_numbers);
    }

    /// Move the cursor, extending the selection or collapsing it
    pub fn move_to(&mut self, pos: Position, extend: bool) {
        let pos = self.document.clamp(pos);
        if extend {
            self.selection.extend_to(pos);
        } else {
            self.selection.collapse_to(pos);
        }
        self.viewport.ensure_visible(&self.document, pos);
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(Position::default(), self.document.end_position());
        self.goal_column = None;
        self.viewport.ensure_visible(&self.document, self.selection.head);
    }

    /// Select the word around `pos`, or just place the cursor when `pos` is
    /// not on a word character
    pub fn select_word_at(&mut self, pos: Position) {
        let pos = self.document.clamp(pos);
        let chars: Vec<char> = self.document.line(pos.line).unwrap_or("").chars().collect();
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        if !chars.get(pos.column).is_some_and(|c| is_word(*c)) {
            self.selection.collapse_to(pos);
            return;
        }
        let start = (0..pos.column)
            .rev()
            .take_while(|i| is_word(chars[*i]))
            .last()
            .unwrap_or(pos.column);
        let end = (pos.column..chars.len())
            .take_while(|i| is_word(chars[*i]))
            .last()
            .map_or(pos.column, |i| i + 1);
        self.selection = Selection::new(Position::new(pos.line, start), Position::new(pos.line, end));
    }

    pub fn move_left(&mut self, extend: bool) {
        self.goal_column = None;
        if !extend && self.has_selection() {
            let start = self.selection.range().start;
            self.move_to(start, false);
            return;
        }
        let pos = self.cursor();
        let target = if pos.column > 0 {
            Position::new(pos.line, pos.column - 1)
        } else if pos.line > 0 {
            Position::new(pos.line - 1, self.document.line_len(pos.line - 1))
        } else {
            pos
        };
        self.move_to(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        self.goal_column = None;
        if !extend && self.has_selection() {
            let end = self.selection.range().end;
            self.move_to(end, false);
            return;
        }
        let pos = self.cursor();
        let target = if pos.column < self.document.line_len(pos.line) {
            Position::new(pos.line, pos.column + 1)
        } else if pos.line + 1 < self.document.line_count() {
            Position::new(pos.line + 1, 0)
        } else {
            pos
        };
        self.move_to(target, extend);
    }

    /// Move up (negative) or down (positive) by `lines`, keeping the column
    pub fn move_vertical(&mut self, lines: isize, extend: bool) {
        let pos = self.cursor();
        let goal = *self.goal_column.get_or_insert(pos.column);
        let last = self.document.line_count().saturating_sub(1) as isize;
        let line = (pos.line as isize + lines).clamp(0, last) as usize;
        let column = goal.min(self.document.line_len(line));
        self.move_to(Position::new(line, column), extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.goal_column = None;
        let line = self.cursor().line;
        self.move_to(Position::new(line, 0), extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.goal_column = None;
        let line = self.cursor().line;
        self.move_to(Position::new(line, self.document.line_len(line)), extend);
    }

    /// Replace the selection (or insert at the cursor) with typed text
    pub fn insert_text(&mut self, text: &str) {
        self.goal_column = None;
        let range = self.selection.range();
        let edit = Edit::replace(range, text, EditSource::User);
        if let Ok(inserted) = self.apply_edit(edit) {
            self.move_to(inserted.end, false);
        }
    }

    pub fn backspace(&mut self) {
        if self.has_selection() {
            self.insert_text("");
            return;
        }
        let end = self.cursor();
        self.move_left(false);
        let start = self.cursor();
        if start == end {
            return;
        }
        let edit = Edit::replace(TextRange::new(start, end), "", EditSource::User);
        if let Err(e) = self.apply_edit(edit) {
            tracing::debug!("Backspace rejected: {}", e);
            self.move_to(end, false);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.has_selection() {
            self.insert_text("");
            return;
        }
        let start = self.cursor();
        self.move_right(false);
        let end = self.cursor();
        if start == end {
            return;
        }
        let edit = Edit::replace(TextRange::new(start, end), "", EditSource::User);
        if let Err(e) = self.apply_edit(edit) {
            tracing::debug!("Delete rejected: {}", e);
        }
        self.move_to(start, false);
    }
}

impl EditorSurface for BufferView {
    fn text(&self) -> String {
        self.document.text()
    }

    fn text_in_range(&self, range: TextRange) -> String {
        self.document.text_in_range(range)
    }

    fn screen_position(&self, pos: Position) -> Option<(u16, u16)> {
        self.viewport.screen_position(&self.document, pos)
    }

    fn apply_edit(&mut self, edit: Edit) -> Result<TextRange, EditError> {
        if self.disposed {
            return Err(EditError::Disposed);
        }
        let inserted = self.document.replace(edit.range, &edit.text);
        self.sync_gutter();
        if edit.source == EditSource::RemoteAction {
            tracing::debug!(range = %edit.range, bytes = edit.text.len(), "Remote edit applied");
            self.goal_column = None;
            self.selection.collapse_to(inserted.end);
            self.viewport.ensure_visible(&self.document, inserted.end);
        }
        Ok(inserted)
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
