//! Async Bridge: Communication between worker threads and the sync main loop
//!
//! - Worker threads perform blocking backend calls
//! - The main UI loop stays synchronous (rendering, input, buffer manipulation)
//! - std::sync::mpsc channels bridge the two worlds
//!
//! The main loop drains the bridge once per iteration, so a slow backend
//! never blocks input handling.

use crate::model::analysis::{AnalysisResult, ExecutionResult};
use crate::services::action_client::{ActionResponse, ServiceError};
use std::sync::mpsc;

/// Identifier of one dispatched selection action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

/// Messages sent from worker threads to the synchronous main loop
#[derive(Debug)]
pub enum AsyncMessage {
    /// A selection action finished (successfully or not)
    ActionCompleted {
        request_id: RequestId,
        result: Result<ActionResponse, ServiceError>,
    },

    /// Whole-document analysis finished
    AnalysisCompleted(Result<AnalysisResult, ServiceError>),

    /// Code execution finished
    ExecutionCompleted(Result<ExecutionResult, ServiceError>),
}

/// Bridge between worker threads and the main loop
///
/// Design:
/// - Lightweight, cloneable sender that can be passed to worker threads
/// - Non-blocking receiver checked each iteration of the main loop
#[derive(Clone)]
pub struct AsyncBridge {
    sender: mpsc::Sender<AsyncMessage>,
    // Receiver wrapped in Arc<Mutex<>> to allow cloning
    receiver: std::sync::Arc<std::sync::Mutex<mpsc::Receiver<AsyncMessage>>>,
}

impl AsyncBridge {
    /// Create a new async bridge with an unbounded channel
    ///
    /// Unbounded is fine here: at most one action, one analysis and one
    /// execution are outstanding at any time.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: std::sync::Arc::new(std::sync::Mutex::new(receiver)),
        }
    }

    /// Get a cloneable sender for worker threads
    pub fn sender(&self) -> mpsc::Sender<AsyncMessage> {
        self.sender.clone()
    }

    /// Try to receive pending messages (non-blocking)
    ///
    /// Called each iteration of the main loop. Returns all pending messages
    /// without blocking.
    pub fn try_recv_all(&self) -> Vec<AsyncMessage> {
        let mut messages = Vec::new();

        if let Ok(receiver) = self.receiver.lock() {
            while let Ok(msg) = receiver.try_recv() {
                messages.push(msg);
            }
        }

        messages
    }

    /// Block until one message arrives or the timeout elapses.
    ///
    /// Headless callers (the CLI subcommands and tests) use this instead of
    /// polling in a render loop.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<AsyncMessage> {
        let receiver = self.receiver.lock().ok()?;
        receiver.recv_timeout(timeout).ok()
    }
}

impl Default for AsyncBridge {
    fn default() -> Self {
        Self::new()
    }
}
