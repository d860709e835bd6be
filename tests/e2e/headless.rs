use crate::common::mock_backend::MockBackend;
use codeward::app::headless::{run_action, LineSpan};
use codeward::app::selection_actions::ControllerSettings;
use codeward::model::document::Document;
use codeward::primitives::language::Language;
use codeward::services::action_client::{ActionKind, HttpBackend};
use codeward::services::time_source::TestTimeSource;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn settings() -> ControllerSettings {
    ControllerSettings {
        language: Language::Python,
        ..Default::default()
    }
}

#[test]
fn test_headless_fix_rewrites_line_span() {
    let backend = MockBackend::start();
    backend.route("/api/fix-issues", 200, json!({"modifiedCode": "total = a + b"}));
    let service = Arc::new(HttpBackend::new(backend.url(), Duration::from_secs(5)));
    let mut document = Document::from_text("def add(a, b):\n    total = a +  b\n    return total");

    let span = "2".parse::<LineSpan>().unwrap();
    let feedback = run_action(
        &mut document,
        ActionKind::FixIssues,
        span,
        service,
        TestTimeSource::shared(),
        settings(),
        Duration::from_secs(10),
    )
    .unwrap();

    assert_eq!(
        document.text(),
        "def add(a, b):\ntotal = a + b\n    return total"
    );
    assert_eq!(feedback.unwrap().message, "Code successfully fixed!");
    let requests = backend.requests_to("/api/fix-issues");
    assert_eq!(requests[0].body["code"], "    total = a +  b");
    assert_eq!(requests[0].body["language"], "python");
}

#[test]
fn test_headless_error_comes_back_as_feedback() {
    let backend = MockBackend::start();
    backend.route("/api/enhance", 500, json!({"error": "boom"}));
    let service = Arc::new(HttpBackend::new(backend.url(), Duration::from_secs(5)));
    let mut document = Document::from_text("x = 1");

    let feedback = run_action(
        &mut document,
        ActionKind::Enhance,
        "1:1".parse::<LineSpan>().unwrap(),
        service,
        TestTimeSource::shared(),
        settings(),
        Duration::from_secs(10),
    )
    .unwrap()
    .unwrap();

    assert!(feedback.is_error());
    assert_eq!(
        feedback.message,
        "Error during Enhance Code: API request failed with status 500: boom"
    );
    assert_eq!(document.text(), "x = 1");
}
