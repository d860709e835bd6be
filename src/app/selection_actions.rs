//! Selection action controller.
//!
//! Watches selection changes, positions the floating action menu next to the
//! end of the selection and runs one remote action at a time against the
//! selected code. Results are applied through [`EditorSurface::apply_edit`]
//! to the range captured when the action was dispatched, even if the
//! document changed while the request was running.
//!
//! Lifecycle:
//! - `mount` installs the outside-click listener, `teardown` removes it
//! - `dispatch_action` spawns a worker thread that reports back through the
//!   async bridge
//! - `handle_action_completed` is called by the main loop with that report

use crate::app::dismissal::{ListenerGuard, PointerEvent, PointerHub, PointerKind};
use crate::app::feedback::{Feedback, FeedbackSlot, DEFAULT_FEEDBACK_LIFETIME};
use crate::app::surface::EditorSurface;
use crate::model::document::{Position, TextRange};
use crate::model::event::{Edit, EditError, EditSource};
use crate::primitives::language::Language;
use crate::services::action_client::{
    ActionKind, ActionRequest, ActionResponse, ActionService, ServiceError,
};
use crate::services::async_bridge::{AsyncMessage, RequestId};
use crate::services::time_source::SharedTimeSource;
use crate::view::ui::selection_menu::MenuLayout;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

/// Visibility of the action menu body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Hidden,
    Visible,
}

/// Screen cell where the menu trigger is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPoint {
    pub top: u16,
    pub left: u16,
}

/// Selection as last observed
#[derive(Debug, Clone, PartialEq, Eq)]
struct CapturedSelection {
    range: TextRange,
    text: String,
}

#[derive(Debug)]
struct InFlight {
    id: RequestId,
    request: ActionRequest,
}

/// Tunables of the controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub language: Language,
    pub user_id: Option<String>,
    /// Columns between the selection end and the trigger
    pub menu_offset: u16,
    pub feedback_lifetime: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            user_id: None,
            menu_offset: 1,
            feedback_lifetime: DEFAULT_FEEDBACK_LIFETIME,
        }
    }
}

/// Applies a successful response to the surface. Returns the success
/// message, or `None` when the response lacks the field the action needs.
type ApplyFn =
    fn(&ActionRequest, &ActionResponse, &mut dyn EditorSurface) -> Result<Option<String>, EditError>;

struct ActionEntry {
    kind: ActionKind,
    apply: ApplyFn,
}

/// One entry per action, in menu order
const ACTION_TABLE: [ActionEntry; 3] = [
    ActionEntry {
        kind: ActionKind::Enhance,
        apply: apply_enhance,
    },
    ActionEntry {
        kind: ActionKind::GenerateTests,
        apply: apply_generated_tests,
    },
    ActionEntry {
        kind: ActionKind::FixIssues,
        apply: apply_fixed_code,
    },
];

fn handler_for(kind: ActionKind) -> ApplyFn {
    ACTION_TABLE
        .iter()
        .find(|entry| entry.kind == kind)
        .map_or(apply_enhance, |entry| entry.apply)
}

/// Empty strings count as missing
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn apply_enhance(
    _request: &ActionRequest,
    response: &ActionResponse,
    _surface: &mut dyn EditorSurface,
) -> Result<Option<String>, EditError> {
    if !response.improvements.is_empty() {
        tracing::debug!(count = response.improvements.len(), "Enhance returned improvements");
    }
    let summary = non_empty(&response.summary).unwrap_or("Code analyzed successfully");
    Ok(Some(format!("Analysis complete: {summary}")))
}

fn apply_generated_tests(
    request: &ActionRequest,
    response: &ActionResponse,
    surface: &mut dyn EditorSurface,
) -> Result<Option<String>, EditError> {
    let Some(tests) = non_empty(&response.test_cases) else {
        tracing::debug!("generate-test-cases response has no testCases, nothing to insert");
        return Ok(None);
    };
    // Start of the line after the selection; the document clamps it to its
    // end when the selection ends on the last line
    let at = Position::new(request.range.end.line + 1, 0);
    surface.apply_edit(Edit::insert(
        at,
        format!("\n\n{tests}\n"),
        EditSource::RemoteAction,
    ))?;
    Ok(Some("Test cases generated successfully!".to_string()))
}

fn apply_fixed_code(
    request: &ActionRequest,
    response: &ActionResponse,
    surface: &mut dyn EditorSurface,
) -> Result<Option<String>, EditError> {
    let Some(code) = non_empty(&response.modified_code) else {
        tracing::debug!("fix-issues response has no modifiedCode, nothing to replace");
        return Ok(None);
    };
    surface.apply_edit(Edit::replace(request.range, code, EditSource::RemoteAction))?;
    Ok(Some("Code successfully fixed!".to_string()))
}

fn error_message(kind: ActionKind, error: &ServiceError) -> String {
    let cause = error.to_string();
    let cause = if cause.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        cause
    };
    format!("Error during {}: {}", kind.label(), cause)
}

pub struct SelectionActionController {
    service: Arc<dyn ActionService>,
    sender: mpsc::Sender<AsyncMessage>,
    settings: ControllerSettings,
    selection: Option<CapturedSelection>,
    anchor: Option<AnchorPoint>,
    menu: Rc<Cell<MenuState>>,
    layout: Rc<Cell<MenuLayout>>,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    feedback: FeedbackSlot,
    dismissal: Option<ListenerGuard>,
    torn_down: bool,
}

impl std::fmt::Debug for SelectionActionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionActionController")
            .field("selection", &self.selection)
            .field("anchor", &self.anchor)
            .field("menu", &self.menu.get())
            .field("in_flight", &self.in_flight)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl SelectionActionController {
    pub fn new(
        service: Arc<dyn ActionService>,
        sender: mpsc::Sender<AsyncMessage>,
        time_source: SharedTimeSource,
        settings: ControllerSettings,
    ) -> Self {
        let feedback = FeedbackSlot::new(time_source, settings.feedback_lifetime);
        Self {
            service,
            sender,
            settings,
            selection: None,
            anchor: None,
            menu: Rc::new(Cell::new(MenuState::Hidden)),
            layout: Rc::new(Cell::new(MenuLayout::HIDDEN)),
            in_flight: None,
            next_request_id: 1,
            feedback,
            dismissal: None,
            torn_down: false,
        }
    }

    /// Install the outside-click listener on `hub`
    pub fn mount(&mut self, hub: &PointerHub) {
        let menu = self.menu.clone();
        let layout = self.layout.clone();
        let guard = hub.register(move |event: &PointerEvent| {
            if event.kind != PointerKind::Press || menu.get() == MenuState::Hidden {
                return;
            }
            let layout = layout.get();
            if layout.hits_trigger(event.column, event.row)
                || layout.hits_body(event.column, event.row)
            {
                return;
            }
            tracing::trace!(col = event.column, row = event.row, "Press outside menu");
            menu.set(MenuState::Hidden);
        });
        self.dismissal = Some(guard);
        self.torn_down = false;
    }

    /// Remove the listener and stop applying results. An action still in
    /// flight will clear the loading state when it completes but not edit.
    pub fn teardown(&mut self) {
        self.dismissal = None;
        self.torn_down = true;
        self.menu.set(MenuState::Hidden);
        self.layout.set(MenuLayout::HIDDEN);
    }

    pub fn is_mounted(&self) -> bool {
        self.dismissal.is_some()
    }

    /// Observe a new selection. Always hides the menu.
    pub fn on_selection_changed(&mut self, range: TextRange, surface: &dyn EditorSurface) {
        self.menu.set(MenuState::Hidden);

        if range.is_empty() {
            self.selection = None;
            self.anchor = None;
            return;
        }

        self.anchor = self.anchor_for(range, surface);
        self.selection = Some(CapturedSelection {
            range,
            text: surface.text_in_range(range),
        });
    }

    /// Recompute the anchor for the current selection after scrolling,
    /// leaving the menu state alone
    pub fn refresh_anchor(&mut self, surface: &dyn EditorSurface) {
        if let Some(range) = self.selection.as_ref().map(|s| s.range) {
            self.anchor = self.anchor_for(range, surface);
        }
    }

    fn anchor_for(&self, range: TextRange, surface: &dyn EditorSurface) -> Option<AnchorPoint> {
        surface
            .screen_position(range.end)
            .map(|(col, row)| AnchorPoint {
                top: row,
                left: col.saturating_add(self.settings.menu_offset),
            })
    }

    /// Flip the menu. Ignored without a selection or while an action runs.
    pub fn toggle_menu(&mut self) {
        if self.selection.is_none() || self.is_loading() {
            return;
        }
        let next = match self.menu.get() {
            MenuState::Hidden => MenuState::Visible,
            MenuState::Visible => MenuState::Hidden,
        };
        self.menu.set(next);
    }

    pub fn hide_menu(&mut self) {
        self.menu.set(MenuState::Hidden);
    }

    /// Start `kind` on the current selection.
    ///
    /// Returns the request id, or `None` when the call was ignored because
    /// there is no selection, an action is already running or the
    /// controller was torn down.
    pub fn dispatch_action(
        &mut self,
        kind: ActionKind,
        surface: &dyn EditorSurface,
    ) -> Option<RequestId> {
        if self.torn_down || self.in_flight.is_some() {
            tracing::debug!(action = kind.endpoint(), "Dispatch ignored: busy or torn down");
            return None;
        }
        let selection = self.selection.as_ref().filter(|s| !s.text.is_empty())?;

        let request = ActionRequest {
            kind,
            selected_text: selection.text.clone(),
            full_document: surface.text(),
            language: self.settings.language,
            user_id: self.settings.user_id.clone(),
            range: selection.range,
        };
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        self.menu.set(MenuState::Hidden);

        let service = self.service.clone();
        let sender = self.sender.clone();
        let worker_request = request.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("codeward-{}", kind.endpoint()))
            .spawn(move || {
                let result = service.perform_action(&worker_request);
                // The receiver is gone when the editor already exited
                let _ = sender.send(AsyncMessage::ActionCompleted {
                    request_id: id,
                    result,
                });
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn action worker: {}", e);
            self.feedback.set(Feedback::error(format!(
                "Error during {}: {}",
                kind.label(),
                e
            )));
            return None;
        }

        tracing::info!(
            action = kind.endpoint(),
            request = id.0,
            range = %request.range,
            "Action dispatched"
        );
        self.in_flight = Some(InFlight { id, request });
        Some(id)
    }

    /// Apply the outcome of a dispatched action.
    ///
    /// Always clears the loading state for the matching request. Edits are
    /// skipped when the controller was torn down or the surface disposed.
    pub fn handle_action_completed(
        &mut self,
        request_id: RequestId,
        result: Result<ActionResponse, ServiceError>,
        surface: &mut dyn EditorSurface,
    ) {
        if self.in_flight.as_ref().map(|f| f.id) != Some(request_id) {
            tracing::debug!(request = request_id.0, "Ignoring completion of unknown request");
            return;
        }
        let Some(InFlight { request, .. }) = self.in_flight.take() else {
            return;
        };

        if self.torn_down || surface.is_disposed() {
            tracing::debug!(
                request = request_id.0,
                "Surface gone, dropping result of {}",
                request.kind.endpoint()
            );
            return;
        }

        match result {
            Ok(response) => match handler_for(request.kind)(&request, &response, surface) {
                Ok(Some(message)) => {
                    tracing::info!(action = request.kind.endpoint(), "Action applied");
                    self.feedback.set(Feedback::success(message));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(action = request.kind.endpoint(), "Edit rejected: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!(action = request.kind.endpoint(), "Action failed: {}", e);
                self.feedback.set(Feedback::error(error_message(request.kind, &e)));
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Request currently running, if any
    pub fn in_flight_request(&self) -> Option<&ActionRequest> {
        self.in_flight.as_ref().map(|f| &f.request)
    }

    pub fn anchor(&self) -> Option<AnchorPoint> {
        self.anchor
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu.get()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.text.as_str())
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.current()
    }

    /// Drop expired feedback. Returns true if the screen needs a redraw.
    pub fn expire_feedback(&mut self) -> bool {
        self.feedback.expire()
    }

    /// Show a message in the feedback slot
    pub fn set_feedback(&mut self, feedback: Feedback) {
        self.feedback.set(feedback);
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
    }

    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.settings.user_id = user_id;
    }

    /// Lay out the menu inside `bounds` and remember it for hit testing
    pub fn update_layout(&mut self, bounds: ratatui::layout::Rect) -> MenuLayout {
        let anchor = if self.torn_down {
            None
        } else {
            self.anchor.map(|a| (a.left, a.top))
        };
        let layout = MenuLayout::compute(anchor, self.menu.get() == MenuState::Visible, bounds);
        self.layout.set(layout);
        layout
    }

    pub fn menu_layout(&self) -> MenuLayout {
        self.layout.get()
    }
}
