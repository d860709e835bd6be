use crate::common::harness::{layout::text_col, EditorTestHarness};
use codeward::app::selection_actions::MenuState;
use crossterm::event::{KeyCode, KeyModifiers};
use std::fs;
use tempfile::TempDir;

const UNUSED_BACKEND: &str = "http://127.0.0.1:9";

#[test]
fn test_empty_editor_shows_no_name_and_hints() {
    let harness = EditorTestHarness::with_backend(80, 24, UNUSED_BACKEND).unwrap();

    assert!(harness.get_status_bar().contains("[No Name]"));
    assert!(harness.get_status_bar().contains("Ln 1, Col 1"));
    assert!(harness.get_feedback_line().contains("F4 actions"));
}

#[test]
fn test_open_file_shows_name_language_and_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hello.py");
    fs::write(&path, "def greet():\n    return 'hi'\n").unwrap();

    let mut harness = EditorTestHarness::with_backend(80, 24, UNUSED_BACKEND).unwrap();
    harness.open_file(&path).unwrap();

    let status = harness.get_status_bar();
    assert!(status.contains("hello.py"), "{status}");
    assert!(status.contains("Python"), "{status}");
    harness.assert_screen_contains("def greet():");
    harness.assert_screen_contains("return 'hi'");
}

#[test]
fn test_typing_and_saving() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.js");
    fs::write(&path, "").unwrap();

    let mut harness = EditorTestHarness::with_backend(80, 24, UNUSED_BACKEND).unwrap();
    harness.open_file(&path).unwrap();
    harness.type_text("let a = 1;\nlet b = 2;").unwrap();

    harness.assert_buffer_content("let a = 1;\nlet b = 2;");
    assert!(harness.get_status_bar().contains("[+]"));

    harness
        .send_key(KeyCode::Char('s'), KeyModifiers::CONTROL)
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "let a = 1;\nlet b = 2;");
    let status = harness.get_status_bar();
    assert!(!status.contains("[+]"), "{status}");
    assert!(status.contains("Saved"), "{status}");
}

#[test]
fn test_save_without_file_name_reports_it() {
    let mut harness = EditorTestHarness::with_backend(80, 24, UNUSED_BACKEND).unwrap();
    harness.type_text("scratch").unwrap();
    harness
        .send_key(KeyCode::Char('s'), KeyModifiers::CONTROL)
        .unwrap();

    assert!(harness.get_status_bar().contains("No file name"));
}

#[test]
fn test_selecting_shows_trigger_and_collapsing_hides_it() {
    let mut harness = EditorTestHarness::with_backend(80, 24, UNUSED_BACKEND).unwrap();
    harness.type_text("hello world").unwrap();
    harness.assert_screen_not_contains("⋮");

    harness.mouse_drag(text_col(0), 0, text_col(5), 0).unwrap();
    assert_eq!(harness.editor().controller().selected_text(), Some("hello"));
    harness.assert_screen_contains("⋮");

    // The trigger sits one column past the selection end and is three cells wide
    let trigger = harness.editor().controller().menu_layout().trigger.unwrap();
    assert_eq!((trigger.x, trigger.width), (text_col(6), 3));

    // Clicking the trigger opens the menu and keeps the selection
    harness.mouse_click(text_col(7), 0).unwrap();
    assert_eq!(harness.editor().controller().menu_state(), MenuState::Visible);
    assert_eq!(harness.editor().controller().selected_text(), Some("hello"));

    // Clicking past the trigger closes the menu and collapses the selection
    harness.mouse_click(text_col(11), 0).unwrap();
    assert_eq!(harness.editor().controller().menu_state(), MenuState::Hidden);
    assert!(!harness.editor().controller().has_selection());
    harness.assert_screen_not_contains("⋮");
}

#[test]
fn test_ctrl_q_quits() {
    let mut harness = EditorTestHarness::with_backend(80, 24, UNUSED_BACKEND).unwrap();
    assert!(!harness.editor().should_quit());

    harness
        .send_key(KeyCode::Char('q'), KeyModifiers::CONTROL)
        .unwrap();

    assert!(harness.editor().should_quit());
    assert_eq!(harness.editor().pointer_hub().listener_count(), 0);
}
