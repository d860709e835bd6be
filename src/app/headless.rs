//! Selection actions without a terminal.
//!
//! Drives the same [`SelectionActionController`] as the interactive editor,
//! with a [`Document`] as the surface and a line span standing in for the
//! mouse selection.

use crate::app::feedback::Feedback;
use crate::app::selection_actions::{ControllerSettings, SelectionActionController};
use crate::model::document::{Document, Position, TextRange};
use crate::services::action_client::{ActionKind, ActionService};
use crate::services::async_bridge::{AsyncBridge, AsyncMessage};
use crate::services::time_source::SharedTimeSource;
use anyhow::{bail, Context};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Inclusive 1-based line span, written `A:B` (or just `A`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
}

impl FromStr for LineSpan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid line number '{part}'"))
        };
        let (first, last) = match s.split_once(':') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let line = parse(s)?;
                (line, line)
            }
        };
        if first == 0 || last < first {
            return Err(format!("invalid line span '{s}': expected A:B with 1 <= A <= B"));
        }
        Ok(Self { first, last })
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

impl LineSpan {
    /// Whole-line range of the span in `document`
    pub fn range_in(&self, document: &Document) -> anyhow::Result<TextRange> {
        let count = document.line_count();
        if self.last > count {
            bail!("line span {} is past the end of the document ({} lines)", self, count);
        }
        let end_line = self.last - 1;
        Ok(TextRange::new(
            Position::new(self.first - 1, 0),
            Position::new(end_line, document.line_len(end_line)),
        ))
    }
}

/// Run `kind` on `lines` of `document` and wait for the result.
///
/// Returns the feedback the controller produced, `None` when the response
/// lacked the field the action needs.
pub fn run_action(
    document: &mut Document,
    kind: ActionKind,
    lines: LineSpan,
    service: Arc<dyn ActionService>,
    time_source: SharedTimeSource,
    settings: ControllerSettings,
    timeout: Duration,
) -> anyhow::Result<Option<Feedback>> {
    let range = lines.range_in(document)?;
    let bridge = AsyncBridge::new();
    let mut controller =
        SelectionActionController::new(service, bridge.sender(), time_source, settings);

    controller.on_selection_changed(range, &*document);
    if !controller.has_selection() {
        bail!("lines {} are empty, nothing to send", lines);
    }
    let request_id = controller
        .dispatch_action(kind, &*document)
        .context("selection action was not dispatched")?;

    match bridge.recv_timeout(timeout) {
        Some(AsyncMessage::ActionCompleted { request_id: id, result }) if id == request_id => {
            controller.handle_action_completed(id, result, document);
        }
        Some(other) => bail!("unexpected message from worker: {:?}", other),
        None => bail!("{} timed out after {:?}", kind.label(), timeout),
    }
    Ok(controller.feedback().cloned())
}
