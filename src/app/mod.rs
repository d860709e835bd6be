//! The interactive editor.
//!
//! [`Editor`] owns the open document, the selection action controller and
//! the side panels. The main loop feeds it input events, drains the async
//! bridge once per iteration and renders it with ratatui.

mod async_messages;
pub mod buffer_view;
pub mod dismissal;
pub mod feedback;
pub mod headless;
mod input;
mod mouse_input;
pub mod panels;
mod render;
pub mod selection_actions;
pub mod surface;

use crate::config::Config;
use crate::model::analysis::{AnalysisResult, ExecutionResult};
use crate::model::document::Document;
use crate::primitives::language::Language;
use crate::services::action_client::{ActionKind, ActionService, AnalysisService};
use crate::services::async_bridge::{AsyncBridge, RequestId};
use crate::services::time_source::SharedTimeSource;
use crate::view::viewport::Viewport;
use buffer_view::BufferView;
use dismissal::PointerHub;
use panels::{PanelKind, PanelState};
use ratatui::layout::{Constraint, Layout, Rect};
use selection_actions::{ControllerSettings, SelectionActionController};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Screen regions, recomputed on resize and when a panel opens or closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorLayout {
    pub text: Rect,
    pub panel: Option<Rect>,
    pub status: Rect,
    pub feedback: Rect,
}

impl EditorLayout {
    /// Text on the left, optional panel on the right, status bar and
    /// feedback line at the bottom
    pub fn compute(width: u16, height: u16, panel_open: bool) -> Self {
        let area = Rect::new(0, 0, width, height);
        let [main, status, feedback] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let (text, panel) = if panel_open {
            let [text, panel] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(main);
            (text, Some(panel))
        } else {
            (main, None)
        };

        Self {
            text,
            panel,
            status,
            feedback,
        }
    }
}

pub struct Editor {
    config: Config,
    view: BufferView,
    controller: SelectionActionController,
    bridge: AsyncBridge,
    pointer_hub: PointerHub,
    analysis_service: Arc<dyn AnalysisService>,
    analysis: PanelState<AnalysisResult>,
    execution: PanelState<ExecutionResult>,
    open_panel: Option<PanelKind>,
    panel_scroll: u16,
    layout: EditorLayout,
    terminal_width: u16,
    terminal_height: u16,
    time_source: SharedTimeSource,
    previous_click_time: Option<Instant>,
    previous_click_position: Option<(u16, u16)>,
    mouse_selecting: bool,
    status_message: Option<String>,
    should_quit: bool,
}

impl Editor {
    pub fn new(
        config: Config,
        action_service: Arc<dyn ActionService>,
        analysis_service: Arc<dyn AnalysisService>,
        time_source: SharedTimeSource,
        width: u16,
        height: u16,
    ) -> Self {
        let bridge = AsyncBridge::new();
        let settings = ControllerSettings {
            language: config.default_language,
            user_id: None,
            menu_offset: config.editor.menu_offset,
            feedback_lifetime: config.editor.feedback_duration(),
        };
        let mut controller = SelectionActionController::new(
            action_service,
            bridge.sender(),
            time_source.clone(),
            settings,
        );
        let pointer_hub = PointerHub::new();
        controller.mount(&pointer_hub);

        let layout = EditorLayout::compute(width, height, false);
        let viewport = Viewport::new(layout.text, config.editor.tab_size);
        let view = BufferView::new(Document::empty(), viewport, config.editor.line_numbers);

        Self {
            config,
            view,
            controller,
            bridge,
            pointer_hub,
            analysis_service,
            analysis: PanelState::Idle,
            execution: PanelState::Idle,
            open_panel: None,
            panel_scroll: 0,
            layout,
            terminal_width: width,
            terminal_height: height,
            time_source,
            previous_click_time: None,
            previous_click_position: None,
            mouse_selecting: false,
            status_message: None,
            should_quit: false,
        }
    }

    /// Replace the open document
    pub fn set_document(&mut self, document: Document, language: Language) {
        let viewport = Viewport::new(self.layout.text, self.config.editor.tab_size);
        self.view = BufferView::new(document, viewport, self.config.editor.line_numbers);
        self.controller.set_language(language);
        self.selection_changed();
    }

    /// Open a file, detecting its language from the extension. A missing
    /// file opens empty and is created on save.
    pub fn open_file(&mut self, path: &Path) -> std::io::Result<()> {
        let document = Document::load_from_file(path)?;
        let language = match Language::from_path(path) {
            Language::PlainText => self.config.default_language,
            detected => detected,
        };
        tracing::info!(path = %path.display(), language = language.id(), "Opened file");
        self.set_document(document, language);
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) {
        self.controller.set_language(language);
    }

    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.controller.set_user_id(user_id);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
        self.sync_layout();
    }

    /// Recompute screen regions and keep the cursor visible in them
    fn sync_layout(&mut self) {
        self.layout = EditorLayout::compute(
            self.terminal_width,
            self.terminal_height,
            self.open_panel.is_some(),
        );
        self.view.viewport.set_area(self.layout.text);
        let cursor = self.view.cursor();
        self.view.viewport.ensure_visible(&self.view.document, cursor);
        self.controller.refresh_anchor(&self.view);
        self.sync_menu_layout();
    }

    fn sync_menu_layout(&mut self) {
        self.controller.update_layout(self.layout.text);
    }

    /// Forward the current selection to the controller
    fn selection_changed(&mut self) {
        let range = self.view.selection.range();
        self.controller.on_selection_changed(range, &self.view);
    }

    /// Run a selection action on the current selection
    pub fn dispatch_action(&mut self, kind: ActionKind) -> Option<RequestId> {
        self.controller.dispatch_action(kind, &self.view)
    }

    fn save(&mut self) {
        if self.view.document.file_path().is_none() {
            self.status_message = Some("No file name; start codeward with a path to save".into());
            return;
        }
        self.status_message = Some(match self.view.document.save() {
            Ok(()) => "Saved".to_string(),
            Err(e) => {
                tracing::warn!("Save failed: {}", e);
                format!("Save failed: {e}")
            }
        });
    }

    /// Stop the editor: remove listeners and refuse further edits
    pub fn quit(&mut self) {
        self.controller.teardown();
        self.view.dispose();
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn document(&self) -> &Document {
        &self.view.document
    }

    pub fn buffer_view(&self) -> &BufferView {
        &self.view
    }

    pub fn controller(&self) -> &SelectionActionController {
        &self.controller
    }

    pub fn pointer_hub(&self) -> &PointerHub {
        &self.pointer_hub
    }

    pub fn layout(&self) -> EditorLayout {
        self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.controller.language()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// True while any remote request is outstanding
    pub fn is_busy(&self) -> bool {
        self.controller.is_loading() || self.analysis.is_loading() || self.execution.is_loading()
    }
}
