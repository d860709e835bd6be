use crate::common::harness::EditorTestHarness;
use crate::common::mock_backend::MockBackend;
use codeward::app::panels::{PanelKind, PanelState};
use codeward::primitives::language::Language;
use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::json;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(10);

fn analysis_response() -> serde_json::Value {
    json!({
        "issues": [
            {"line": 2, "message": "eval is dangerous", "severity": "error", "type": "security"}
        ],
        "suggestions": [
            {"description": "Use JSON.parse", "originalCode": "eval(x)", "improvedCode": "JSON.parse(x)"}
        ],
        "testCases": [],
        "metrics": {
            "readabilityScore": 80,
            "securityScore": 20,
            "performanceScore": 70,
            "overallScore": 55
        }
    })
}

#[test]
fn test_analyze_opens_results_panel() {
    let backend = MockBackend::start();
    backend.route("/api/analyze", 200, analysis_response());
    let mut harness = EditorTestHarness::with_backend(120, 30, backend.url()).unwrap();
    harness
        .load_text("const x = input();\neval(x);", Language::Javascript)
        .unwrap();

    harness.send_key(KeyCode::F(5), KeyModifiers::NONE).unwrap();
    assert_eq!(harness.editor().open_panel_kind(), Some(PanelKind::Analysis));
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_screen_contains("Analysis Results");
    harness.assert_screen_contains("Overall:  55");
    harness.assert_screen_contains("eval is dangerous");
    harness.assert_screen_contains("+ JSON.parse(x)");
    // Text stays visible beside the panel
    harness.assert_screen_contains("eval(x);");

    let requests = backend.requests_to("/api/analyze");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body["language"], "javascript");
    assert_eq!(requests[0].body["code"], "const x = input();\neval(x);");
}

#[test]
fn test_analyze_empty_document_does_not_call_backend() {
    let backend = MockBackend::start();
    let mut harness = EditorTestHarness::with_backend(120, 30, backend.url()).unwrap();
    harness.load_text("   \n", Language::Python).unwrap();

    harness.send_key(KeyCode::F(5), KeyModifiers::NONE).unwrap();

    assert_eq!(
        harness.editor().analysis_state(),
        &PanelState::Failed("Please enter some code to analyze".to_string())
    );
    assert!(!harness.editor().is_busy());
    assert!(backend.requests().is_empty());
}

#[test]
fn test_analysis_failure_is_shown_in_panel() {
    let backend = MockBackend::start();
    backend.route("/api/analyze", 503, json!({"error": "overloaded"}));
    let mut harness = EditorTestHarness::with_backend(120, 30, backend.url()).unwrap();
    harness.load_text("x = 1", Language::Python).unwrap();

    harness.send_key(KeyCode::F(5), KeyModifiers::NONE).unwrap();
    harness.wait_for_idle(WAIT).unwrap();

    match harness.editor().analysis_state() {
        PanelState::Failed(message) => {
            assert!(message.contains("503"), "{message}");
            assert!(message.contains("overloaded"), "{message}");
        }
        other => panic!("expected a failed analysis, got {other:?}"),
    }
}

#[test]
fn test_execute_shows_output_and_escape_closes_panel() {
    let backend = MockBackend::start();
    backend.route(
        "/api/execute",
        200,
        json!({"output": "hello\nworld", "executionTime": 3.5}),
    );
    let mut harness = EditorTestHarness::with_backend(120, 30, backend.url()).unwrap();
    harness.load_text("print('hello')", Language::Python).unwrap();

    harness.send_key(KeyCode::F(6), KeyModifiers::NONE).unwrap();
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_screen_contains("Execution");
    harness.assert_screen_contains("hello");
    harness.assert_screen_contains("world");
    harness.assert_screen_contains("Execution time: 3.50 ms");

    harness.send_key(KeyCode::Esc, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.editor().open_panel_kind(), None);
    harness.assert_screen_not_contains("Execution time");
}

#[test]
fn test_execute_without_output() {
    let backend = MockBackend::start();
    backend.route(
        "/api/execute",
        200,
        json!({"output": "", "error": "NameError: y", "executionTime": 1.0}),
    );
    let mut harness = EditorTestHarness::with_backend(120, 30, backend.url()).unwrap();
    harness.load_text("print(y)", Language::Python).unwrap();

    harness.send_key(KeyCode::F(6), KeyModifiers::NONE).unwrap();
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_screen_contains("No output");
    harness.assert_screen_contains("NameError: y");
}
