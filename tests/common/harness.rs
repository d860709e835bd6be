// EditorTestHarness - Virtual terminal environment for E2E testing

use codeward::app::Editor;
use codeward::config::Config;
use codeward::model::document::Document;
use codeward::primitives::language::Language;
use codeward::services::action_client::HttpBackend;
use codeward::services::time_source::TestTimeSource;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Terminal layout constants
pub mod layout {
    /// Width of the line number gutter for documents under 10000 lines
    pub const GUTTER_WIDTH: u16 = 7;

    /// Get the status bar row for a given terminal height
    #[inline]
    pub const fn status_bar_row(terminal_height: u16) -> u16 {
        terminal_height - 2
    }

    /// Get the feedback line row for a given terminal height
    #[inline]
    pub const fn feedback_row(terminal_height: u16) -> u16 {
        terminal_height - 1
    }

    /// Screen column of character `column` when the view is not scrolled
    #[inline]
    pub const fn text_col(column: u16) -> u16 {
        GUTTER_WIDTH + column
    }
}

/// Virtual editor environment for testing
/// Captures all rendering output without displaying to actual terminal
pub struct EditorTestHarness {
    editor: Editor,
    terminal: Terminal<TestBackend>,
    clock: Arc<TestTimeSource>,
    term_height: u16,
}

impl EditorTestHarness {
    /// Editor talking to the backend at `base_url`
    pub fn with_backend(width: u16, height: u16, base_url: &str) -> io::Result<Self> {
        let mut config = Config::default();
        config.backend.base_url = base_url.to_string();
        Self::with_config(width, height, config)
    }

    pub fn with_config(width: u16, height: u16, config: Config) -> io::Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        let clock = TestTimeSource::shared();
        let backend = Arc::new(HttpBackend::new(
            &config.backend.base_url,
            Duration::from_secs(5),
        ));
        let editor = Editor::new(config, backend.clone(), backend, clock.clone(), width, height);

        let mut harness = Self {
            editor,
            terminal,
            clock,
            term_height: height,
        };
        harness.render()?;
        Ok(harness)
    }

    pub fn open_file(&mut self, path: &Path) -> io::Result<()> {
        self.editor.open_file(path)?;
        self.render()
    }

    /// Replace the document with `text`
    pub fn load_text(&mut self, text: &str, language: Language) -> io::Result<()> {
        self.editor.set_document(Document::from_text(text), language);
        self.render()
    }

    /// Simulate a key press
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> io::Result<()> {
        // Delegate to the editor's handle_key method (just like main.rs does)
        self.editor.handle_key(code, modifiers)?;
        let _ = self.editor.process_async_messages();
        self.render()
    }

    /// Simulate typing a string of text
    pub fn type_text(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            let code = if ch == '\n' { KeyCode::Enter } else { KeyCode::Char(ch) };
            self.editor.handle_key(code, KeyModifiers::NONE)?;
        }
        let _ = self.editor.process_async_messages();
        self.render()
    }

    /// Simulate a mouse event
    pub fn send_mouse(&mut self, mouse_event: MouseEvent) -> io::Result<()> {
        self.editor.handle_mouse(mouse_event)?;
        Ok(())
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> io::Result<()> {
        self.send_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }

    /// Simulate a mouse click at specific coordinates. The clock moves past
    /// the double-click window first so clicks never pair up by accident.
    pub fn mouse_click(&mut self, col: u16, row: u16) -> io::Result<()> {
        self.clock.advance(Duration::from_secs(1));
        self.mouse(MouseEventKind::Down(MouseButton::Left), col, row)?;
        self.mouse(MouseEventKind::Up(MouseButton::Left), col, row)?;
        self.render()
    }

    /// Simulate a mouse drag from one position to another
    pub fn mouse_drag(
        &mut self,
        start_col: u16,
        start_row: u16,
        end_col: u16,
        end_row: u16,
    ) -> io::Result<()> {
        self.clock.advance(Duration::from_secs(1));
        self.mouse(MouseEventKind::Down(MouseButton::Left), start_col, start_row)?;
        self.mouse(MouseEventKind::Drag(MouseButton::Left), end_col, end_row)?;
        self.mouse(MouseEventKind::Up(MouseButton::Left), end_col, end_row)?;
        self.render()
    }

    /// Select whole lines `first..=last` (0-based) by dragging over them
    pub fn select_lines(&mut self, first: u16, last: u16) -> io::Result<()> {
        let end_col = self.editor.document().line_len(last as usize) as u16;
        self.mouse_drag(layout::text_col(0), first, layout::text_col(end_col), last)
    }

    /// Drain async messages until nothing is outstanding or `timeout` passes
    pub fn wait_for_idle(&mut self, timeout: Duration) -> io::Result<()> {
        let deadline = Instant::now() + timeout;
        while self.editor.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                panic!("Timed out waiting for the backend");
            }
            self.editor
                .wait_for_async_message(remaining.min(Duration::from_millis(100)));
        }
        self.render()
    }

    /// Move the test clock forward and let the editor notice
    pub fn advance_time(&mut self, by: Duration) -> io::Result<()> {
        self.clock.advance(by);
        let _ = self.editor.process_async_messages();
        self.render()
    }

    /// Force a render cycle and capture output
    pub fn render(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| {
            self.editor.render(frame);
        })?;
        Ok(())
    }

    pub fn buffer(&self) -> &ratatui::buffer::Buffer {
        self.terminal.backend().buffer()
    }

    /// Get the text content of a specific screen row
    pub fn get_row_text(&self, y: u16) -> String {
        let buffer = self.buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    /// Get entire screen as string (for debugging)
    pub fn screen_to_string(&self) -> String {
        (0..self.buffer().area.height)
            .map(|y| self.get_row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get_status_bar(&self) -> String {
        self.get_row_text(layout::status_bar_row(self.term_height))
    }

    pub fn get_feedback_line(&self) -> String {
        self.get_row_text(layout::feedback_row(self.term_height))
    }

    /// Verify text appears on screen
    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Verify text does not appear on screen
    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }

    pub fn get_buffer_content(&self) -> String {
        self.editor.document().text()
    }

    /// Verify buffer content matches expected
    pub fn assert_buffer_content(&self, expected: &str) {
        let actual = self.get_buffer_content();
        assert_eq!(
            actual, expected,
            "Buffer content mismatch\nExpected: {expected:?}\nActual: {actual:?}",
        );
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }
}
