use crate::model::document::{Document, Position};
use crate::primitives::visual_layout::{char_at_visual_col, visual_col_at_char};
use ratatui::layout::Rect;

/// The viewport - what portion of the document is visible, and where
#[derive(Debug, Clone)]
pub struct Viewport {
    /// First visible line
    pub top_line: usize,

    /// Left column offset (horizontal scroll position), in display columns
    pub left_column: usize,

    /// Screen area of the text, gutter included
    pub area: Rect,

    /// Width of the line number gutter (0 when line numbers are off)
    pub gutter_width: u16,

    /// Lines to keep visible above/below the cursor
    pub scroll_offset: usize,

    /// Display columns a tab occupies
    pub tab_size: usize,
}

impl Viewport {
    pub fn new(area: Rect, tab_size: usize) -> Self {
        Self {
            top_line: 0,
            left_column: 0,
            area,
            gutter_width: 0,
            scroll_offset: 2,
            tab_size,
        }
    }

    /// Gutter width for a document with `line_count` lines: the digits
    /// (at least four) followed by " │ "
    pub fn gutter_width_for(line_count: usize, line_numbers: bool) -> u16 {
        if !line_numbers {
            return 0;
        }
        let digits = line_count.max(1).to_string().len().max(4);
        digits as u16 + 3
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Number of visible text rows
    pub fn visible_lines(&self) -> usize {
        self.area.height as usize
    }

    /// Width available for text after the gutter
    pub fn text_width(&self) -> usize {
        self.area.width.saturating_sub(self.gutter_width) as usize
    }

    /// Screen cell `(column, row)` of a document position, or `None` when it
    /// is scrolled out of view
    pub fn screen_position(&self, doc: &Document, pos: Position) -> Option<(u16, u16)> {
        let pos = doc.clamp(pos);
        if pos.line < self.top_line || pos.line >= self.top_line + self.visible_lines() {
            return None;
        }
        let line = doc.line(pos.line).unwrap_or("");
        let visual = visual_col_at_char(line, pos.column, self.tab_size);
        if visual < self.left_column || visual - self.left_column >= self.text_width() {
            return None;
        }
        let col = self.area.x as usize + self.gutter_width as usize + visual - self.left_column;
        let row = self.area.y as usize + pos.line - self.top_line;
        Some((col as u16, row as u16))
    }

    /// Document position under a screen cell. Clicks on the gutter map to
    /// the start of the line, clicks past the last line to the end.
    pub fn position_at(&self, doc: &Document, col: u16, row: u16) -> Option<Position> {
        if row < self.area.y || row >= self.area.bottom() || col < self.area.x || col >= self.area.right()
        {
            return None;
        }
        let line = self.top_line + (row - self.area.y) as usize;
        if line >= doc.line_count() {
            return Some(doc.end_position());
        }
        let text_x = self.area.x + self.gutter_width;
        if col < text_x {
            return Some(Position::new(line, 0));
        }
        let visual = (col - text_x) as usize + self.left_column;
        let text = doc.line(line).unwrap_or("");
        Some(Position::new(line, char_at_visual_col(text, visual, self.tab_size)))
    }

    /// Scroll so that `pos` is visible, keeping `scroll_offset` lines of
    /// context when the viewport is tall enough
    pub fn ensure_visible(&mut self, doc: &Document, pos: Position) {
        let height = self.visible_lines();
        if height == 0 {
            return;
        }
        let margin = self.scroll_offset.min(height.saturating_sub(1) / 2);

        if pos.line < self.top_line + margin {
            self.top_line = pos.line.saturating_sub(margin);
        } else if pos.line + margin >= self.top_line + height {
            self.top_line = pos.line + margin + 1 - height;
        }
        let max_top = doc.line_count().saturating_sub(1);
        self.top_line = self.top_line.min(max_top);

        let width = self.text_width();
        if width == 0 {
            return;
        }
        let line = doc.line(pos.line).unwrap_or("");
        let visual = visual_col_at_char(line, pos.column, self.tab_size);
        if visual < self.left_column {
            self.left_column = visual;
        } else if visual >= self.left_column + width {
            // Leave room for the cursor after the last character
            self.left_column = visual + 1 - width;
        }
    }

    /// Scroll by `delta` lines, clamped to the document
    pub fn scroll_by(&mut self, doc: &Document, delta: isize) {
        let max_top = doc.line_count().saturating_sub(1);
        let top = self.top_line as isize + delta;
        self.top_line = (top.max(0) as usize).min(max_top);
    }
}
