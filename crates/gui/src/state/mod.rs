pub mod building;
pub mod capture;
pub mod settings;

use shared::{GroundPlane, SessionDescription, INITIAL_HEIGHT};

pub use building::BuildingState;
pub use capture::{CaptureEvent, CaptureState};
pub use settings::AppSettings;

use crate::viewport::camera::OrbitCamera;
use crate::viewport::picking::{ray_ground_plane, Ray};

/// Combined application state
pub struct AppState {
    pub capture: CaptureState,
    pub building: BuildingState,
    pub camera: OrbitCamera,
    pub plane: GroundPlane,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AppSettings::load())
    }
}

impl AppState {
    pub fn with_settings(settings: AppSettings) -> Self {
        let color = AppSettings::rgb(settings.viewport.building_color);
        Self {
            capture: CaptureState::default(),
            building: BuildingState::with_color(color),
            camera: OrbitCamera::new(&settings.camera),
            plane: GroundPlane::default(),
            settings,
            show_settings_window: false,
        }
    }

    /// Run one click through the pipeline: raycast, append, closure, extrusion.
    /// Returns None when the ray misses the ground plane.
    pub fn click_ray(&mut self, ray: &Ray) -> Option<CaptureEvent> {
        let Some(hit) = ray_ground_plane(ray, &self.plane) else {
            tracing::debug!("Click missed the ground plane");
            return None;
        };
        Some(self.click_ground([hit.x as f64, hit.z as f64]))
    }

    /// Feed a ground point (X/Z) directly
    pub fn click_ground(&mut self, point: [f64; 2]) -> CaptureEvent {
        let event = self.capture.push_point(point);
        if event == CaptureEvent::Closed {
            if let Err(e) = self.building.create(self.capture.points(), INITIAL_HEIGHT) {
                tracing::error!("Failed to extrude closed outline: {e}");
            }
            self.camera.enabled = true;
        }
        event
    }

    /// Slider change: replace the prism with one of the new height
    pub fn set_height(&mut self, height: f64) -> Result<(), String> {
        if !self.capture.is_closed() {
            return Err("Outline is not closed yet".to_string());
        }
        self.building.set_height(height)
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset_view(&self.settings.camera);
    }

    pub fn session(&self) -> SessionDescription {
        SessionDescription {
            points: self.capture.to_points2d(),
            closed: self.capture.is_closed(),
            building: self.building.description(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn state() -> AppState {
        AppState::with_settings(AppSettings::default())
    }

    fn down(x: f32, z: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn test_missed_click_changes_nothing() {
        let mut s = state();
        assert_eq!(s.click_ray(&down(20.0, 0.0)), None);
        let up = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::Y,
        };
        assert_eq!(s.click_ray(&up), None);
        assert!(s.capture.is_empty());
        assert_eq!(s.capture.version(), 0);
    }

    #[test]
    fn test_closure_builds_and_enables_orbit() {
        let mut s = state();
        assert!(!s.camera.enabled);
        for (x, z) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)] {
            assert_eq!(s.click_ray(&down(x, z)), Some(CaptureEvent::Appended));
        }
        assert!(s.building.mesh().is_none());
        assert_eq!(s.click_ray(&down(0.05, 0.0)), Some(CaptureEvent::Closed));
        assert!(s.camera.enabled);
        assert_eq!(s.building.height(), INITIAL_HEIGHT);
        assert!(s.building.mesh().is_some());
    }

    #[test]
    fn test_set_height_requires_closure() {
        let mut s = state();
        s.click_ground([0.0, 0.0]);
        assert!(s.set_height(3.0).is_err());
    }

    #[test]
    fn test_session_snapshot() {
        let mut s = state();
        for p in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.1]] {
            s.click_ground(p);
        }
        s.set_height(4.5).unwrap();
        let session = s.session();
        assert!(session.closed);
        assert_eq!(session.points.len(), 4);
        assert_eq!(session.building.unwrap().height, 4.5);
    }
}
