//! Handlers for messages arriving from worker threads

use super::Editor;
use crate::services::async_bridge::AsyncMessage;

impl Editor {
    /// Drain the async bridge and expire stale feedback.
    ///
    /// Returns true when something changed and the screen needs a redraw.
    pub fn process_async_messages(&mut self) -> bool {
        let mut changed = self.controller.expire_feedback();

        for message in self.bridge.try_recv_all() {
            self.handle_async_message(message);
            changed = true;
        }

        if changed {
            self.sync_menu_layout();
        }
        changed
    }

    pub(super) fn handle_async_message(&mut self, message: AsyncMessage) {
        match message {
            AsyncMessage::ActionCompleted { request_id, result } => {
                let version = self.view.document.version();
                self.controller
                    .handle_action_completed(request_id, result, &mut self.view);
                if self.view.document.version() != version {
                    // The edit moved the caret; the controller observes that
                    // like any other selection change
                    self.selection_changed();
                }
            }
            AsyncMessage::AnalysisCompleted(result) => self.finish_analysis(result),
            AsyncMessage::ExecutionCompleted(result) => self.finish_execution(result),
        }
    }

    /// Block up to `timeout` for one message and handle it. Used by tests
    /// and headless commands that have no event loop.
    pub fn wait_for_async_message(&mut self, timeout: std::time::Duration) -> bool {
        match self.bridge.recv_timeout(timeout) {
            Some(message) => {
                self.handle_async_message(message);
                self.sync_menu_layout();
                true
            }
            None => false,
        }
    }
}
