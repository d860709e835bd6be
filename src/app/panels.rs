//! Whole-document analysis and execution.
//!
//! Both run the request on a worker thread and report back through the
//! async bridge, like the selection actions. At most one analysis and one
//! execution are outstanding at a time.

use super::Editor;
use crate::model::analysis::{AnalysisResult, ExecutionResult};
use crate::services::action_client::ServiceError;
use crate::services::async_bridge::AsyncMessage;

/// Which side panel is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Analysis,
    Execution,
}

/// Lifecycle of a panel's content
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }

    pub fn from_result(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(value) => PanelState::Ready(value),
            Err(e) => PanelState::Failed(e.to_string()),
        }
    }
}

impl Editor {
    /// Analyze the whole document. Ignored while an analysis is running.
    pub fn analyze(&mut self) {
        self.open_panel(PanelKind::Analysis);
        if self.analysis.is_loading() {
            return;
        }
        let code = self.view.document.text();
        if code.trim().is_empty() {
            self.analysis = PanelState::Failed("Please enter some code to analyze".to_string());
            return;
        }

        let language = self.controller.language();
        let service = self.analysis_service.clone();
        let sender = self.bridge.sender();
        let spawned = std::thread::Builder::new()
            .name("codeward-analyze".to_string())
            .spawn(move || {
                let result = service.analyze(&code, language);
                let _ = sender.send(AsyncMessage::AnalysisCompleted(result));
            });
        self.analysis = match spawned {
            Ok(_) => {
                tracing::info!(language = language.id(), "Analysis requested");
                PanelState::Loading
            }
            Err(e) => PanelState::Failed(format!("Failed to start analysis: {e}")),
        };
    }

    /// Execute the whole document. Ignored while an execution is running.
    pub fn execute(&mut self) {
        self.open_panel(PanelKind::Execution);
        if self.execution.is_loading() {
            return;
        }
        let code = self.view.document.text();
        if code.trim().is_empty() {
            self.execution = PanelState::Failed("Please enter some code to execute".to_string());
            return;
        }

        let language = self.controller.language();
        let service = self.analysis_service.clone();
        let sender = self.bridge.sender();
        let spawned = std::thread::Builder::new()
            .name("codeward-execute".to_string())
            .spawn(move || {
                let result = service.execute(&code, language);
                let _ = sender.send(AsyncMessage::ExecutionCompleted(result));
            });
        self.execution = match spawned {
            Ok(_) => {
                tracing::info!(language = language.id(), "Execution requested");
                PanelState::Loading
            }
            Err(e) => PanelState::Failed(format!("Failed to start execution: {e}")),
        };
    }

    pub(super) fn finish_analysis(&mut self, result: Result<AnalysisResult, ServiceError>) {
        if let Err(e) = &result {
            tracing::warn!("Analysis failed: {}", e);
        }
        self.analysis = PanelState::from_result(result);
        self.panel_scroll = 0;
    }

    pub(super) fn finish_execution(&mut self, result: Result<ExecutionResult, ServiceError>) {
        if let Err(e) = &result {
            tracing::warn!("Execution failed: {}", e);
        }
        self.execution = PanelState::from_result(result);
        self.panel_scroll = 0;
    }

    fn open_panel(&mut self, kind: PanelKind) {
        if self.open_panel != Some(kind) {
            self.open_panel = Some(kind);
            self.panel_scroll = 0;
            self.sync_layout();
        }
    }

    pub fn close_panel(&mut self) {
        if self.open_panel.take().is_some() {
            self.sync_layout();
        }
    }

    pub(super) fn scroll_panel(&mut self, delta: isize) {
        self.panel_scroll = if delta < 0 {
            self.panel_scroll.saturating_sub(delta.unsigned_abs() as u16)
        } else {
            self.panel_scroll.saturating_add(delta as u16)
        };
    }

    pub fn open_panel_kind(&self) -> Option<PanelKind> {
        self.open_panel
    }

    pub fn analysis_state(&self) -> &PanelState<AnalysisResult> {
        &self.analysis
    }

    pub fn execution_state(&self) -> &PanelState<ExecutionResult> {
        &self.execution
    }
}
