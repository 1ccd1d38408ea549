//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use footprint_gui_lib::command::{execute_json, execute_json_batch};
use footprint_gui_lib::harness::TestHarness;

const SQUARE_BATCH: &str = r#"[
    {"command": "click", "x": -1.0, "z": -1.0},
    {"command": "click", "x": 1.0, "z": -1.0},
    {"command": "click", "x": 1.0, "z": 1.0},
    {"command": "click", "x": -1.0, "z": 1.0},
    {"command": "click", "x": -0.95, "z": -1.0}
]"#;

#[test]
fn test_command_full_workflow_via_json_batch() {
    let mut h = TestHarness::new();

    let responses = execute_json_batch(&mut h, SQUARE_BATCH).unwrap();
    assert_eq!(responses.len(), 5);
    assert!(responses.iter().all(|r| r.success));

    let events: Vec<String> = responses
        .iter()
        .map(|r| r.data.as_ref().unwrap()["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events, ["appended", "appended", "appended", "appended", "closed"]);
    assert!(h.is_closed());
}

#[test]
fn test_command_set_height_and_inspect() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, SQUARE_BATCH).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "set_height", "height": 3.5}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["height"], 3.5);
    // Two caps of 2 triangles and 4 walls of 2
    assert_eq!(data["triangles"], 12);

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["point_count"], 5);
    assert_eq!(data["closed"], true);
    assert_eq!(data["orbit_enabled"], true);
    let dims = &data["building"]["dimensions"];
    assert!((dims[0].as_f64().unwrap() - 2.0).abs() < 1e-4);
    assert!((dims[1].as_f64().unwrap() - 3.5).abs() < 1e-4);
    assert!((dims[2].as_f64().unwrap() - 2.0).abs() < 1e-4);
}

#[test]
fn test_command_click_after_closure_is_ignored() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, SQUARE_BATCH).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "click", "x": 0.0, "z": 0.0}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["event"], "ignored");
    assert_eq!(data["point_count"], 5);
}

#[test]
fn test_command_click_screen() {
    let mut h = TestHarness::new();
    let resp = execute_json(
        &mut h,
        r#"{"command": "click_screen", "ndc_x": 0.0, "ndc_y": 0.0}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["event"], "appended");
    assert_eq!(h.point_count(), 1);
}

#[test]
fn test_command_export_session() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, SQUARE_BATCH).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "export_session"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    let session: shared::SessionDescription =
        serde_json::from_str(data["session_json"].as_str().unwrap()).unwrap();
    assert!(session.closed);
    assert_eq!(session.points.len(), 5);
    assert_eq!(session.building.unwrap().height, 1.0);
}

#[test]
fn test_command_invalid_json_error() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h, "{").is_err());
    assert!(execute_json(&mut h, r#"{"command": "click", "x": 1.0}"#).is_err());
    assert!(execute_json_batch(&mut h, r#"{"command": "inspect"}"#).is_err());
}
