//! JSON command protocol for scripted sessions.
//!
//! Each command is an object tagged by `"command"`; a batch is a JSON array.

use serde::{Deserialize, Serialize};

use crate::harness::TestHarness;
use crate::state::CaptureEvent;

/// A command that can be executed against a headless session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Click the ground at world X/Z
    Click { x: f64, z: f64 },
    /// Click through the camera at normalized device coordinates
    ClickScreen { ndc_x: f32, ndc_y: f32 },
    /// Move the height slider
    SetHeight { height: f64 },
    /// Report points, closure and building state
    Inspect,
    /// Export the session as JSON
    ExportSession,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn click_data(event: Option<CaptureEvent>, harness: &TestHarness) -> serde_json::Value {
    let event = match event {
        None => "miss",
        Some(CaptureEvent::Appended) => "appended",
        Some(CaptureEvent::Closed) => "closed",
        Some(CaptureEvent::Ignored) => "ignored",
    };
    serde_json::json!({
        "event": event,
        "point_count": harness.point_count(),
        "closed": harness.is_closed(),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::Click { x, z } => {
            let event = harness.click_world(x, z);
            CommandResponse::ok_with_data(click_data(event, harness))
        }

        AgentCommand::ClickScreen { ndc_x, ndc_y } => {
            if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
                return CommandResponse::err(format!(
                    "NDC ({ndc_x}, {ndc_y}) outside [-1, 1]"
                ));
            }
            let event = harness.click_ndc(ndc_x, ndc_y);
            CommandResponse::ok_with_data(click_data(event, harness))
        }

        AgentCommand::SetHeight { height } => match harness.set_height(height) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({
                "height": harness.height(),
                "triangles": harness.mesh().map(|m| m.triangle_count()).unwrap_or(0),
            })),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::Inspect => {
            let building = harness.mesh().map(|mesh| {
                let dims = harness
                    .validate_mesh()
                    .map(|v| v.dimensions())
                    .unwrap_or([0.0; 3]);
                serde_json::json!({
                    "height": harness.height(),
                    "vertices": mesh.vertex_count(),
                    "triangles": mesh.triangle_count(),
                    "dimensions": dims,
                })
            });
            CommandResponse::ok_with_data(serde_json::json!({
                "point_count": harness.point_count(),
                "points": harness.points(),
                "closed": harness.is_closed(),
                "orbit_enabled": harness.orbit_enabled(),
                "building": building,
            }))
        }

        AgentCommand::ExportSession => {
            let json = harness.export_session_json();
            CommandResponse::ok_with_data(serde_json::json!({ "session_json": json }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_click() {
        let json = r#"{"command": "click", "x": 1.5, "z": -2.0}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::Click { x, z } => assert_eq!((x, z), (1.5, -2.0)),
            _ => panic!("Expected Click"),
        }
    }

    #[test]
    fn test_command_serde_click_screen() {
        let json = r#"{"command": "click_screen", "ndc_x": 0.25, "ndc_y": -0.5}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::ClickScreen { .. }));
    }

    #[test]
    fn test_execute_click_miss() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "click", "x": 9.0, "z": 0.0}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["event"], "miss");
    }

    #[test]
    fn test_execute_click_screen_out_of_range() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "click_screen", "ndc_x": 1.5, "ndc_y": 0.0}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert_eq!(h.point_count(), 0);
    }

    #[test]
    fn test_set_height_before_closure_fails() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "set_height", "height": 3.0}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.is_some());
    }

    #[test]
    fn test_execute_inspect_empty() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["point_count"], 0);
        assert_eq!(data["closed"], false);
        assert!(data["building"].is_null());
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        assert!(execute_json(&mut h, "not valid json").is_err());
        assert!(execute_json(&mut h, r#"{"command": "undo"}"#).is_err());
    }
}
