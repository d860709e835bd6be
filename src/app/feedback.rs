//! Transient success/error messages shown after a remote action.
//!
//! Each message carries its own expiry instant. Setting a new message
//! replaces the old one together with its expiry, so there is no timer that
//! could later clear the newer message.

use crate::services::time_source::SharedTimeSource;
use std::time::{Duration, Instant};

/// Default display lifetime of a message
pub const DEFAULT_FEEDBACK_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

/// Holds at most one [`Feedback`] and hides it once its lifetime has passed
pub struct FeedbackSlot {
    current: Option<(Feedback, Instant)>,
    lifetime: Duration,
    time_source: SharedTimeSource,
}

impl std::fmt::Debug for FeedbackSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackSlot")
            .field("current", &self.current)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl FeedbackSlot {
    pub fn new(time_source: SharedTimeSource, lifetime: Duration) -> Self {
        Self {
            current: None,
            lifetime,
            time_source,
        }
    }

    /// Show `feedback`, superseding whatever was shown before
    pub fn set(&mut self, feedback: Feedback) {
        let expires_at = self.time_source.now() + self.lifetime;
        tracing::debug!(kind = ?feedback.kind, message = %feedback.message, "Feedback set");
        self.current = Some((feedback, expires_at));
    }

    /// The visible message, if it has not expired yet
    pub fn current(&self) -> Option<&Feedback> {
        let now = self.time_source.now();
        self.current
            .as_ref()
            .filter(|(_, expires_at)| now < *expires_at)
            .map(|(feedback, _)| feedback)
    }

    /// Drop an expired message. Returns true if something was removed.
    pub fn expire(&mut self) -> bool {
        let now = self.time_source.now();
        match &self.current {
            Some((_, expires_at)) if now >= *expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
