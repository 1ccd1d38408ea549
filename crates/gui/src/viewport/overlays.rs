//! Viewport overlay drawing (point markers, closing hint, camera info)

use egui::Painter;
use shared::CLOSE_DISTANCE;

use crate::state::AppState;

use super::camera::OrbitCamera;
use super::mesh::OUTLINE_LIFT;

/// Draw markers on the captured points while the outline is open.
/// The first point gets a ring showing the closing distance.
pub fn draw_point_markers(painter: &Painter, rect: egui::Rect, camera: &OrbitCamera, state: &AppState) {
    if state.capture.is_closed() {
        return;
    }
    let points = state.capture.points();
    let point_color = egui::Color32::from_rgba_unmultiplied(255, 90, 90, 230);

    for (i, p) in points.iter().enumerate() {
        let Some(screen) = camera.project([p[0] as f32, OUTLINE_LIFT, p[1] as f32], rect) else {
            continue;
        };
        painter.circle_filled(screen, 3.0, point_color);

        if i == 0 && points.len() > 1 {
            draw_close_ring(painter, rect, camera, *p);
        }
    }
}

/// Projected circle of radius `CLOSE_DISTANCE` around the start point
fn draw_close_ring(painter: &Painter, rect: egui::Rect, camera: &OrbitCamera, center: [f64; 2]) {
    const SEGMENTS: usize = 32;
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 200, 80, 180));
    let r = CLOSE_DISTANCE as f32;

    let ring: Option<Vec<egui::Pos2>> = (0..=SEGMENTS)
        .map(|i| {
            let a = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            camera.project(
                [center[0] as f32 + r * a.cos(), OUTLINE_LIFT, center[1] as f32 + r * a.sin()],
                rect,
            )
        })
        .collect();

    if let Some(ring) = ring {
        painter.add(egui::Shape::line(ring, stroke));
    }
}

/// Camera distance and angles, top-right corner
pub fn draw_camera_info(painter: &Painter, rect: egui::Rect, camera: &OrbitCamera) {
    let overlay_rect = egui::Rect::from_min_size(
        egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
        egui::vec2(136.0, 44.0),
    );
    painter.rect_filled(
        overlay_rect,
        4.0,
        egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
    );
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        egui::Align2::LEFT_TOP,
        format!(
            "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
            camera.distance,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
        ),
        egui::FontId::monospace(10.0),
        egui::Color32::from_rgb(160, 160, 170),
    );
}
