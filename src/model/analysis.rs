//! Result payloads returned by the analysis backend.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    #[serde(other)]
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Security,
    Performance,
    Readability,
    #[serde(other)]
    Syntax,
}

impl IssueType {
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::Security => "Security",
            IssueType::Performance => "Performance",
            IssueType::Readability => "Readability",
            IssueType::Syntax => "Syntax",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeIssue {
    /// 1-based line number reported by the analyzer
    pub line: u32,
    pub message: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub description: String,
    #[serde(default)]
    pub original_code: Option<String>,
    #[serde(default)]
    pub improved_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Scores are integers in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub readability_score: u8,
    pub security_score: u8,
    pub performance_score: u8,
    pub overall_score: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub issues: Vec<CodeIssue>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: Option<String>,
    /// Milliseconds
    #[serde(default)]
    pub execution_time: f64,
}

/// A saved analysis as listed by the history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub language: String,
    pub code: String,
    /// Stored as JSON by the backend; older rows hold it as a JSON string
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(rename = "created_at", alias = "createdAt", default)]
    pub created_at: String,
}

impl HistoryEntry {
    /// Decode the stored analysis, if it is well-formed
    pub fn analysis(&self) -> Option<AnalysisResult> {
        match &self.result {
            serde_json::Value::String(raw) => serde_json::from_str(raw).ok(),
            value => serde_json::from_value(value.clone()).ok(),
        }
    }
}

/// Rating bucket used to color score cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRating {
    Good,
    Fair,
    Poor,
}

impl ScoreRating {
    pub fn for_score(score: u8) -> Self {
        if score >= 80 {
            ScoreRating::Good
        } else if score >= 60 {
            ScoreRating::Fair
        } else {
            ScoreRating::Poor
        }
    }
}
