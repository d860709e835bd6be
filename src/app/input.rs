use super::Editor;
use crate::app::selection_actions::MenuState;
use crate::services::action_client::ActionKind;
use crossterm::event::{KeyCode, KeyModifiers};

/// What a key did to the buffer view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyEffect {
    /// Cursor moved or text changed; the selection must be re-observed
    SelectionMoved,
    Other,
}

impl Editor {
    /// Handle a key press. This is the central key handling logic used by
    /// both main.rs and tests.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> std::io::Result<()> {
        tracing::trace!("Editor.handle_key: code={:?}, modifiers={:?}", code, modifiers);

        let effect = self.dispatch_key(code, modifiers);
        if effect == KeyEffect::SelectionMoved {
            self.selection_changed();
        }
        self.sync_menu_layout();
        Ok(())
    }

    fn dispatch_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyEffect {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let shift = modifiers.contains(KeyModifiers::SHIFT);

        if ctrl {
            match code {
                KeyCode::Char('q') => self.quit(),
                KeyCode::Char('s') => self.save(),
                KeyCode::Char('a') => {
                    self.view.select_all();
                    return KeyEffect::SelectionMoved;
                }
                _ => {}
            }
            return KeyEffect::Other;
        }

        // Number keys pick a menu item while the menu is open
        if self.controller.menu_state() == MenuState::Visible {
            if let KeyCode::Char(c @ '1'..='9') = code {
                let index = c as usize - '1' as usize;
                if let Some(kind) = ActionKind::ALL.get(index).copied() {
                    self.dispatch_action(kind);
                }
                return KeyEffect::Other;
            }
        }

        match code {
            KeyCode::F(2) => {
                let language = self.controller.language().next();
                self.controller.set_language(language);
                self.status_message = Some(format!("Language: {}", language.label()));
                KeyEffect::Other
            }
            KeyCode::F(4) => {
                self.controller.toggle_menu();
                KeyEffect::Other
            }
            KeyCode::F(5) => {
                self.analyze();
                KeyEffect::Other
            }
            KeyCode::F(6) => {
                self.execute();
                KeyEffect::Other
            }
            KeyCode::Esc => self.handle_escape(),
            KeyCode::PageUp | KeyCode::PageDown => {
                let page = self.view.viewport.visible_lines().max(1) as isize;
                let delta = if code == KeyCode::PageUp { -page } else { page };
                if self.open_panel.is_some() && shift {
                    self.scroll_panel(delta);
                    KeyEffect::Other
                } else {
                    self.view.move_vertical(delta, shift);
                    KeyEffect::SelectionMoved
                }
            }
            KeyCode::Left => {
                self.view.move_left(shift);
                KeyEffect::SelectionMoved
            }
            KeyCode::Right => {
                self.view.move_right(shift);
                KeyEffect::SelectionMoved
            }
            KeyCode::Up => {
                self.view.move_vertical(-1, shift);
                KeyEffect::SelectionMoved
            }
            KeyCode::Down => {
                self.view.move_vertical(1, shift);
                KeyEffect::SelectionMoved
            }
            KeyCode::Home => {
                self.view.move_home(shift);
                KeyEffect::SelectionMoved
            }
            KeyCode::End => {
                self.view.move_end(shift);
                KeyEffect::SelectionMoved
            }
            KeyCode::Enter => {
                self.view.insert_text("\n");
                KeyEffect::SelectionMoved
            }
            KeyCode::Tab => {
                self.view.insert_text("\t");
                KeyEffect::SelectionMoved
            }
            KeyCode::Backspace => {
                self.view.backspace();
                KeyEffect::SelectionMoved
            }
            KeyCode::Delete => {
                self.view.delete_forward();
                KeyEffect::SelectionMoved
            }
            KeyCode::Char(c) => {
                let mut buf = [0u8; 4];
                self.view.insert_text(c.encode_utf8(&mut buf));
                KeyEffect::SelectionMoved
            }
            _ => KeyEffect::Other,
        }
    }

    /// Esc closes the innermost thing: the menu, then the panel, then the
    /// selection
    fn handle_escape(&mut self) -> KeyEffect {
        if self.controller.menu_state() == MenuState::Visible {
            self.controller.hide_menu();
            KeyEffect::Other
        } else if self.open_panel.is_some() {
            self.close_panel();
            KeyEffect::Other
        } else if self.view.has_selection() {
            let cursor = self.view.cursor();
            self.view.move_to(cursor, false);
            KeyEffect::SelectionMoved
        } else {
            KeyEffect::Other
        }
    }
}
