use crate::common::harness::{layout::text_col, EditorTestHarness};
use crate::common::mock_backend::MockBackend;
use codeward::app::selection_actions::MenuState;
use codeward::primitives::language::Language;
use codeward::services::action_client::ActionKind;
use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::json;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(10);

fn ten_lines() -> String {
    (1..=10)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn harness(backend: &MockBackend) -> EditorTestHarness {
    EditorTestHarness::with_backend(80, 24, backend.url()).unwrap()
}

/// Click the trigger, then the menu item at `index`
fn click_menu_item(harness: &mut EditorTestHarness, index: u16) {
    let trigger = harness
        .editor()
        .controller()
        .menu_layout()
        .trigger
        .expect("trigger should be shown for the selection");
    harness.mouse_click(trigger.x, trigger.y).unwrap();
    let body = harness
        .editor()
        .controller()
        .menu_layout()
        .body
        .expect("menu should be open after clicking the trigger");
    harness.mouse_click(body.x + 2, body.y + 1 + index).unwrap();
}

#[test]
fn test_fix_issues_through_menu_rewrites_selected_lines() {
    let backend = MockBackend::start();
    backend.route("/api/fix-issues", 200, json!({"modifiedCode": "y = 2"}));
    let mut harness = harness(&backend);
    harness.load_text(&ten_lines(), Language::Python).unwrap();

    // Lines 3 to 5
    harness.select_lines(2, 4).unwrap();
    harness.assert_screen_contains("⋮");

    click_menu_item(&mut harness, 2);
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_buffer_content("line 1\nline 2\ny = 2\nline 6\nline 7\nline 8\nline 9\nline 10");
    assert_eq!(harness.editor().document().line_count(), 8);
    assert!(harness.get_feedback_line().contains("Code successfully fixed!"));

    let requests = backend.requests_to("/api/fix-issues");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].body["code"], "line 3\nline 4\nline 5");
    assert_eq!(requests[0].body["fullCode"], json!(ten_lines()));
    assert_eq!(requests[0].body["language"], "python");
    assert!(requests[0].body.get("userId").is_none());
}

#[test]
fn test_generate_tests_from_keyboard_inserts_below_selection() {
    let backend = MockBackend::start();
    backend.route(
        "/api/generate-test-cases",
        200,
        json!({"testCases": "test('adds', () => {})"}),
    );
    let mut harness = harness(&backend);
    harness
        .load_text("function add(a, b) {\n  return a + b;\n}\nadd(1, 2);", Language::Javascript)
        .unwrap();

    harness.select_lines(0, 2).unwrap();
    harness.send_key(KeyCode::F(4), KeyModifiers::NONE).unwrap();
    assert_eq!(harness.editor().controller().menu_state(), MenuState::Visible);
    harness.send_key(KeyCode::Char('2'), KeyModifiers::NONE).unwrap();
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_buffer_content(
        "function add(a, b) {\n  return a + b;\n}\n\n\ntest('adds', () => {})\nadd(1, 2);",
    );
    assert!(harness
        .get_feedback_line()
        .contains("Test cases generated successfully!"));
}

#[test]
fn test_enhance_shows_summary_and_leaves_document() {
    let backend = MockBackend::start();
    backend.route(
        "/api/enhance",
        200,
        json!({"summary": "Consider a guard clause", "improvements": ["a", "b"]}),
    );
    let mut harness = harness(&backend);
    let text = "if x:\n    y()";
    harness.load_text(text, Language::Python).unwrap();

    harness.select_lines(0, 1).unwrap();
    click_menu_item(&mut harness, 0);
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_buffer_content(text);
    assert!(harness
        .get_feedback_line()
        .contains("Analysis complete: Consider a guard clause"));
}

#[test]
fn test_backend_error_is_reported_and_next_attempt_succeeds() {
    let backend = MockBackend::start();
    backend.route("/api/fix-issues", 500, json!({"error": "model unavailable"}));
    let mut harness = harness(&backend);
    harness.load_text("a = 1\nb = 2", Language::Python).unwrap();

    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 2);
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_buffer_content("a = 1\nb = 2");
    let feedback = harness.get_feedback_line();
    assert!(feedback.contains("Error during Fix Issues"), "{feedback}");
    assert!(feedback.contains("500"), "{feedback}");
    assert!(!harness.editor().is_busy());

    backend.route("/api/fix-issues", 200, json!({"modifiedCode": "a = 10"}));
    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 2);
    harness.wait_for_idle(WAIT).unwrap();
    harness.assert_buffer_content("a = 10\nb = 2");
}

#[test]
fn test_response_without_expected_field_changes_nothing() {
    let backend = MockBackend::start();
    backend.route("/api/fix-issues", 200, json!({"message": "Nothing to fix"}));
    let mut harness = harness(&backend);
    harness.load_text("ok()", Language::Python).unwrap();

    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 2);
    harness.wait_for_idle(WAIT).unwrap();

    harness.assert_buffer_content("ok()");
    assert!(harness.get_feedback_line().contains("F4 actions"));
}

#[test]
fn test_feedback_disappears_after_its_lifetime() {
    let backend = MockBackend::start();
    backend.route("/api/enhance", 200, json!({}));
    let mut harness = harness(&backend);
    harness.load_text("x = 1", Language::Python).unwrap();

    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 0);
    harness.wait_for_idle(WAIT).unwrap();
    assert!(harness
        .get_feedback_line()
        .contains("Analysis complete: Code analyzed successfully"));

    harness.advance_time(Duration::from_secs(4)).unwrap();
    assert!(harness.get_feedback_line().contains("Analysis complete"));

    harness.advance_time(Duration::from_secs(2)).unwrap();
    assert!(!harness.get_feedback_line().contains("Analysis complete"));
}

#[test]
fn test_trigger_is_disabled_while_request_runs() {
    let backend = MockBackend::start();
    backend.route_delayed(
        "/api/fix-issues",
        200,
        json!({"modifiedCode": "done"}),
        Duration::from_millis(500),
    );
    let mut harness = harness(&backend);
    harness.load_text("todo", Language::Python).unwrap();

    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 2);
    assert!(harness.editor().controller().is_loading());
    harness.assert_screen_contains("…");
    assert!(harness.get_status_bar().contains("Working..."));

    // Neither the trigger key nor a second dispatch start anything
    harness.send_key(KeyCode::F(4), KeyModifiers::NONE).unwrap();
    assert_eq!(harness.editor().controller().menu_state(), MenuState::Hidden);
    harness.editor_mut().dispatch_action(ActionKind::Enhance);

    harness.wait_for_idle(WAIT).unwrap();
    harness.assert_buffer_content("done");
    assert_eq!(backend.requests().len(), 1);
}

#[test]
fn test_result_lands_on_captured_range_after_selection_moves() {
    let backend = MockBackend::start();
    backend.route_delayed(
        "/api/fix-issues",
        200,
        json!({"modifiedCode": "FIXED"}),
        Duration::from_millis(300),
    );
    let mut harness = harness(&backend);
    harness.load_text("first\nsecond\nthird", Language::Python).unwrap();

    harness.select_lines(1, 1).unwrap();
    click_menu_item(&mut harness, 2);
    // Select something else while the request runs
    harness.select_lines(2, 2).unwrap();

    harness.wait_for_idle(WAIT).unwrap();
    harness.assert_buffer_content("first\nFIXED\nthird");
}

#[test]
fn test_user_id_is_sent_when_logged_in() {
    let backend = MockBackend::start();
    backend.route("/api/enhance", 200, json!({"summary": "fine"}));
    let mut harness = harness(&backend);
    harness.editor_mut().set_user_id(Some("42".to_string()));
    harness.load_text("print(1)", Language::Python).unwrap();

    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 0);
    harness.wait_for_idle(WAIT).unwrap();

    let requests = backend.requests_to("/api/enhance");
    assert_eq!(requests[0].body["userId"], "42");
}

#[test]
fn test_clicking_outside_closes_menu_without_dispatch() {
    let backend = MockBackend::start();
    let mut harness = harness(&backend);
    harness.load_text("alpha beta", Language::Python).unwrap();

    harness.mouse_drag(text_col(0), 0, text_col(5), 0).unwrap();
    let trigger = harness.editor().controller().menu_layout().trigger.unwrap();
    harness.mouse_click(trigger.x, trigger.y).unwrap();
    assert_eq!(harness.editor().controller().menu_state(), MenuState::Visible);

    harness.mouse_click(60, 15).unwrap();
    assert_eq!(harness.editor().controller().menu_state(), MenuState::Hidden);
    assert!(backend.requests().is_empty());
}

#[test]
fn test_quit_with_request_in_flight_leaves_document_alone() {
    let backend = MockBackend::start();
    backend.route_delayed(
        "/api/fix-issues",
        200,
        json!({"modifiedCode": "late"}),
        Duration::from_millis(300),
    );
    let mut harness = harness(&backend);
    harness.load_text("keep me", Language::Python).unwrap();

    harness.select_lines(0, 0).unwrap();
    click_menu_item(&mut harness, 2);
    harness
        .send_key(KeyCode::Char('q'), KeyModifiers::CONTROL)
        .unwrap();
    assert!(harness.editor().should_quit());

    harness.wait_for_idle(WAIT).unwrap();
    harness.assert_buffer_content("keep me");
    assert!(!harness.editor().controller().is_loading());
}
