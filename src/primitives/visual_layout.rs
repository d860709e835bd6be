//! Visual column calculations for text display
//!
//! Mouse clicks, cursor rendering and the selection menu anchor all need to
//! agree on where a character lands on screen. Key concepts:
//! - **Character index**: Position in the character sequence of a line
//! - **Visual column**: Screen column accounting for tab stops and wide chars

use unicode_width::UnicodeWidthChar;

/// Standard tab width for terminal display
pub const TAB_WIDTH: usize = 4;

/// Calculate tab expansion width at a given column
#[inline]
pub fn tab_expansion_width(col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    tab_width - (col % tab_width)
}

/// Display width of a single character at the given visual column
#[inline]
pub fn char_display_width(ch: char, col: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        tab_expansion_width(col, tab_width)
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Visual column of the character at `char_idx` (or of the end of the line
/// when `char_idx` is past the last character).
pub fn visual_col_at_char(line: &str, char_idx: usize, tab_width: usize) -> usize {
    let mut col = 0;
    for ch in line.chars().take(char_idx) {
        col += char_display_width(ch, col, tab_width);
    }
    col
}

/// Character index under a visual column. Clicking on the right half of a
/// wide char still selects that char; clicking past the end of the line
/// returns the line length.
pub fn char_at_visual_col(line: &str, visual_col: usize, tab_width: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in line.chars().enumerate() {
        let width = char_display_width(ch, col, tab_width);
        if visual_col < col + width.max(1) {
            return idx;
        }
        col += width;
    }
    line.chars().count()
}

/// Total visual width of a line
pub fn line_visual_width(line: &str, tab_width: usize) -> usize {
    visual_col_at_char(line, usize::MAX, tab_width)
}

/// Expand tabs to spaces for rendering
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let width = tab_expansion_width(col, tab_width);
            out.extend(std::iter::repeat(' ').take(width));
            col += width;
        } else {
            out.push(ch);
            col += ch.width().unwrap_or(0);
        }
    }
    out
}
