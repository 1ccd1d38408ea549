use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::{screen_to_ndc, Ray};
use crate::state::settings::CameraSettings;

/// Lowest pitch: the camera never goes below the horizon
const MIN_PITCH: f32 = 0.0;
/// Highest pitch: just short of straight down so look_at keeps a valid up vector
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 1e-3;
/// Pending deltas smaller than this are dropped
const SETTLE_EPSILON: f32 = 1e-5;

/// Orbit camera around a ground target, with damped rotation and panning.
///
/// Starts looking straight down at the target with controls disabled;
/// input is ignored until `enabled` is set.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Elevation above the ground plane (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Whether orbit/pan/zoom input is accepted
    pub enabled: bool,
    min_distance: f32,
    max_distance: f32,
    damping: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

impl OrbitCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            yaw: 0.0,
            pitch: MAX_PITCH,
            distance: settings.start_distance.clamp(settings.min_distance, settings.max_distance),
            target: Vec3::ZERO,
            fov: settings.fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            enabled: false,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            damping: settings.damping.clamp(0.001, 1.0),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: Vec3::ZERO,
        }
    }

    /// Queue a rotation (degrees); applied gradually by `update`
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        self.pending_yaw -= dx.to_radians();
        self.pending_pitch += dy.to_radians();
    }

    /// Zoom by a relative amount (positive moves closer)
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * (1.0 - delta)).clamp(self.min_distance, self.max_distance);
    }

    /// Queue a pan in the ground plane (screen-space panning is off)
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let right = Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
        let forward = Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
        let scale = self.distance * 0.1;
        self.pending_pan += (-right * dx + forward * dy) * scale;
    }

    /// Apply a damped fraction of queued motion. Returns true while motion remains.
    pub fn update(&mut self) -> bool {
        if !self.enabled {
            return false;
        }

        self.yaw += self.pending_yaw * self.damping;
        self.pitch = (self.pitch + self.pending_pitch * self.damping).clamp(MIN_PITCH, MAX_PITCH);
        self.target += self.pending_pan * self.damping;

        let decay = 1.0 - self.damping;
        self.pending_yaw *= decay;
        self.pending_pitch *= decay;
        self.pending_pan *= decay;

        if self.pending_yaw.abs() < SETTLE_EPSILON {
            self.pending_yaw = 0.0;
        }
        if self.pending_pitch.abs() < SETTLE_EPSILON {
            self.pending_pitch = 0.0;
        }
        if self.pending_pan.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON {
            self.pending_pan = Vec3::ZERO;
        }

        self.is_moving()
    }

    pub fn is_moving(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0 || self.pending_pan != Vec3::ZERO
    }

    /// Return to the top-down start view, keeping the enabled flag
    pub fn reset_view(&mut self, settings: &CameraSettings) {
        let enabled = self.enabled;
        *self = Self::new(settings);
        self.enabled = enabled;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: [f32; 3], rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point[0], point[1], point[2], 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray through normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        let ndc = screen_to_ndc(
            Vec2::new(screen_pos.x, screen_pos.y),
            Vec2::new(rect.min.x, rect.min.y),
            Vec2::new(rect.width(), rect.height()),
        );
        self.ray_from_ndc(ndc, rect.width() / rect.height())
    }
}
