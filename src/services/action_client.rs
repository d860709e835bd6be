//! HTTP client for the analysis backend.
//!
//! This module provides:
//! - The remote actions that operate on a selection (enhance, fix, generate tests)
//! - Whole-document analysis and execution
//! - A blocking [`HttpBackend`] built on `ureq`, meant to be called from a
//!   worker thread, never from the UI loop

use crate::model::analysis::{AnalysisResult, ExecutionResult, HistoryEntry};
use crate::model::document::TextRange;
use crate::primitives::language::Language;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default backend location used when no config overrides it
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote operations that act on the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Enhance,
    GenerateTests,
    FixIssues,
}

impl ActionKind {
    /// Menu order
    pub const ALL: [ActionKind; 3] = [
        ActionKind::Enhance,
        ActionKind::GenerateTests,
        ActionKind::FixIssues,
    ];

    /// Path segment under `/api/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            ActionKind::Enhance => "enhance",
            ActionKind::GenerateTests => "generate-test-cases",
            ActionKind::FixIssues => "fix-issues",
        }
    }

    /// Human-readable name, used in the menu and in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Enhance => "Enhance Code",
            ActionKind::GenerateTests => "Generate Test Cases",
            ActionKind::FixIssues => "Fix Issues",
        }
    }
}

/// Snapshot of everything a remote action needs, captured at dispatch time.
///
/// Later edits to the document never change an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub selected_text: String,
    pub full_document: String,
    pub language: Language,
    pub user_id: Option<String>,
    /// Selection range the result is applied to
    pub range: TextRange,
}

impl ActionRequest {
    pub fn payload(&self) -> ActionPayload<'_> {
        ActionPayload {
            code: &self.selected_text,
            full_code: &self.full_document,
            language: self.language.id(),
            user_id: self.user_id.as_deref(),
        }
    }
}

/// Request body for the selection actions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload<'a> {
    pub code: &'a str,
    pub full_code: &'a str,
    pub language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

/// Union of the response shapes of the selection actions. Which field
/// matters depends on the action that was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub modified_code: Option<String>,
    #[serde(default)]
    pub test_cases: Option<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct CodePayload<'a> {
    code: &'a str,
    language: &'a str,
}

/// Error body returned by the backend on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Failure talking to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Connection refused, DNS failure, timeout, ...
    Transport(String),
    /// Non-2xx status, with the backend's `error` field when it sent one
    Status { code: u16, message: Option<String> },
    /// 2xx response whose body could not be decoded
    Decode(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "{msg}"),
            ServiceError::Status {
                code,
                message: Some(message),
            } => write!(f, "API request failed with status {code}: {message}"),
            ServiceError::Status { code, message: None } => {
                write!(f, "API request failed with status {code}")
            }
            ServiceError::Decode(msg) => write!(f, "Invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Backend operations on a selection
pub trait ActionService: Send + Sync {
    fn perform_action(&self, request: &ActionRequest) -> Result<ActionResponse, ServiceError>;
}

/// Backend operations on the whole document
pub trait AnalysisService: Send + Sync {
    fn analyze(&self, code: &str, language: Language) -> Result<AnalysisResult, ServiceError>;
    fn execute(&self, code: &str, language: Language) -> Result<ExecutionResult, ServiceError>;
}

/// Blocking HTTP client for the backend
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("codeward/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path such as `fix-issues`
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// POST a JSON body and decode a JSON response
    pub fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ServiceError> {
        let url = self.url(path);
        let body =
            serde_json::to_string(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
        tracing::debug!(url = %url, bytes = body.len(), "POST");

        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_string(&body);
        Self::decode(&url, result)
    }

    /// GET with query parameters and decode a JSON response
    pub fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, ServiceError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let mut request = self.agent.get(&url).set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        Self::decode(&url, request.call())
    }

    fn decode<R: DeserializeOwned>(
        url: &str,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<R, ServiceError> {
        match result {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| ServiceError::Transport(format!("Failed to read response body: {e}")))?;
                serde_json::from_str(&body).map_err(|e| {
                    tracing::debug!(url, "Undecodable response: {}", e);
                    ServiceError::Decode(e.to_string())
                })
            }
            Err(ureq::Error::Status(code, response)) => {
                let message = response
                    .into_string()
                    .ok()
                    .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                    .and_then(|body| body.error);
                tracing::debug!(url, code, ?message, "Backend returned an error status");
                Err(ServiceError::Status { code, message })
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::debug!(url, "HTTP request failed: {}", transport);
                Err(ServiceError::Transport(transport.to_string()))
            }
        }
    }

    /// Saved analyses for a user
    pub fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, ServiceError> {
        self.get_json("history", &[("userId", user_id)])
    }
}

impl ActionService for HttpBackend {
    fn perform_action(&self, request: &ActionRequest) -> Result<ActionResponse, ServiceError> {
        tracing::info!(
            action = request.kind.endpoint(),
            language = request.language.id(),
            selected_bytes = request.selected_text.len(),
            "Performing remote action"
        );
        self.post_json(request.kind.endpoint(), &request.payload())
    }
}

impl AnalysisService for HttpBackend {
    fn analyze(&self, code: &str, language: Language) -> Result<AnalysisResult, ServiceError> {
        self.post_json(
            "analyze",
            &CodePayload {
                code,
                language: language.id(),
            },
        )
    }

    fn execute(&self, code: &str, language: Language) -> Result<ExecutionResult, ServiceError> {
        self.post_json(
            "execute",
            &CodePayload {
                code,
                language: language.id(),
            },
        )
    }
}
