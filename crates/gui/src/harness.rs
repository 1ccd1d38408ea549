//! Headless test harness for driving the capture/extrude pipeline without a window.

use glam::{Vec2, Vec3};
use shared::SessionDescription;

use crate::state::settings::AppSettings;
use crate::state::{AppState, CaptureEvent};
use crate::validation::MeshValidator;
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Ray;

/// Height of the vertical rays used by `click_world`
const WORLD_CLICK_HEIGHT: f32 = 100.0;

/// Headless test harness. Owns an `AppState` with default settings
pub struct TestHarness {
    pub state: AppState,
    /// Viewport aspect ratio used for NDC clicks
    pub aspect: f32,
}

impl TestHarness {
    /// Create a fresh session (settings are not read from disk)
    pub fn new() -> Self {
        Self {
            state: AppState::with_settings(AppSettings::default()),
            aspect: 1.0,
        }
    }

    // ── Input ─────────────────────────────────────────────────

    /// Click straight down onto ground point (x, z)
    pub fn click_world(&mut self, x: f64, z: f64) -> Option<CaptureEvent> {
        let ray = Ray {
            origin: Vec3::new(x as f32, WORLD_CLICK_HEIGHT, z as f32),
            direction: Vec3::NEG_Y,
        };
        self.state.click_ray(&ray)
    }

    /// Click through the current camera at normalized device coordinates
    pub fn click_ndc(&mut self, x: f32, y: f32) -> Option<CaptureEvent> {
        let ray = self.state.camera.ray_from_ndc(Vec2::new(x, y), self.aspect);
        self.state.click_ray(&ray)
    }

    /// Click every point in order, returning the last event
    pub fn trace(&mut self, points: &[[f64; 2]]) -> Option<CaptureEvent> {
        points
            .iter()
            .map(|p| self.click_world(p[0], p[1]))
            .last()
            .flatten()
    }

    pub fn set_height(&mut self, height: f64) -> Result<(), String> {
        self.state.set_height(height)
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn points(&self) -> &[[f64; 2]] {
        self.state.capture.points()
    }

    pub fn point_count(&self) -> usize {
        self.state.capture.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.capture.is_closed()
    }

    pub fn orbit_enabled(&self) -> bool {
        self.state.camera.enabled
    }

    pub fn height(&self) -> f64 {
        self.state.building.height()
    }

    /// The preview polyline, if one would be drawn
    pub fn outline(&self) -> Option<&[[f64; 2]]> {
        self.state.capture.outline()
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        self.state.building.mesh()
    }

    /// Create a validator for the building mesh
    pub fn validate_mesh(&self) -> Option<MeshValidator<'_>> {
        self.mesh().map(MeshValidator::new)
    }

    pub fn session(&self) -> SessionDescription {
        self.state.session()
    }

    /// Export the current session as JSON
    pub fn export_session_json(&self) -> String {
        serde_json::to_string_pretty(&self.session()).unwrap_or_default()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-0.95, -1.0]];

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.point_count(), 0);
        assert!(!h.is_closed());
        assert!(!h.orbit_enabled());
        assert!(h.mesh().is_none());
    }

    #[test]
    fn test_click_world_off_plane() {
        let mut h = TestHarness::new();
        assert_eq!(h.click_world(6.0, 0.0), None);
        assert_eq!(h.point_count(), 0);
    }

    #[test]
    fn test_click_ndc_center_hits_origin() {
        let mut h = TestHarness::new();
        assert_eq!(h.click_ndc(0.0, 0.0), Some(CaptureEvent::Appended));
        let p = h.points()[0];
        assert!(p[0].abs() < 1e-3 && p[1].abs() < 1e-3, "{p:?}");
    }

    #[test]
    fn test_click_ndc_right_moves_positive_x() {
        let mut h = TestHarness::new();
        h.click_ndc(0.4, 0.0);
        let p = h.points()[0];
        // fov 90 at distance 10: half-width of the view at ground level is 10
        assert!((p[0] - 4.0).abs() < 0.05, "{p:?}");
        assert!(p[1].abs() < 0.05, "{p:?}");
    }

    #[test]
    fn test_trace_and_close() {
        let mut h = TestHarness::new();
        assert_eq!(h.trace(&OUTLINE), Some(CaptureEvent::Closed));
        assert!(h.is_closed());
        assert!(h.orbit_enabled());
        assert!(h.outline().is_none());
        let v = h.validate_mesh().unwrap();
        assert!(v.validate_all().is_empty());
    }

    #[test]
    fn test_export_session_json() {
        let mut h = TestHarness::new();
        h.trace(&OUTLINE);
        let json = h.export_session_json();
        let session: SessionDescription = serde_json::from_str(&json).unwrap();
        assert!(session.closed);
        assert_eq!(session.points.len(), 4);
        assert!(session.building.is_some());
    }
}
