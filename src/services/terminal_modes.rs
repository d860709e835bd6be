//! Terminal mode setup for the interactive editor.
//!
//! [`TerminalModes::enable`] switches to raw mode, the alternate screen and
//! mouse capture. Dropping the value restores the terminal, including on
//! early returns and panics that unwind through `main`.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io::{self, stdout};

#[derive(Debug)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
    mouse_capture: bool,
}

impl TerminalModes {
    /// Enter every mode the editor needs. Modes entered before a failure are
    /// undone when the partially built value is dropped.
    pub fn enable() -> io::Result<Self> {
        let mut modes = Self {
            raw_mode: false,
            alternate_screen: false,
            mouse_capture: false,
        };

        enable_raw_mode()?;
        modes.raw_mode = true;

        execute!(stdout(), EnterAlternateScreen)?;
        modes.alternate_screen = true;

        execute!(stdout(), EnableMouseCapture)?;
        modes.mouse_capture = true;

        Ok(modes)
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn undo(&mut self) {
        if self.mouse_capture {
            if let Err(e) = execute!(stdout(), DisableMouseCapture) {
                tracing::warn!("Failed to disable mouse capture: {}", e);
            }
            self.mouse_capture = false;
        }
        if self.alternate_screen {
            if let Err(e) = execute!(stdout(), LeaveAlternateScreen) {
                tracing::warn!("Failed to leave alternate screen: {}", e);
            }
            self.alternate_screen = false;
        }
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                tracing::warn!("Failed to disable raw mode: {}", e);
            }
            self.raw_mode = false;
        }
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}
