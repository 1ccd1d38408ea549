//! Wireframe rendering for the viewport when no GL context is available

use egui::{Color32, Rect, Stroke, Ui};

use super::camera::OrbitCamera;
use super::mesh::{MeshData, OUTLINE_LIFT};
use crate::state::settings::GridSettings;
use crate::state::AppState;

/// Paint the 3D viewport using egui's painter (wireframe rendering)
pub fn paint_viewport(ui: &Ui, rect: Rect, camera: &OrbitCamera, state: &AppState) {
    let painter = ui.painter_at(rect);

    // Background
    let bg = &state.settings.viewport.background_color;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

    draw_ground(&painter, rect, camera, state);

    if state.settings.grid.visible {
        draw_grid(&painter, rect, camera, &state.settings.grid);
    }

    if let Some(points) = state.capture.outline() {
        let c = state.settings.viewport.outline_color;
        draw_polyline(&painter, rect, camera, points, Stroke::new(2.0, Color32::from_rgb(c[0], c[1], c[2])));
    }

    if let Some(mesh) = state.building.mesh() {
        let c = state.settings.viewport.building_color;
        draw_wireframe(&painter, rect, camera, mesh, Stroke::new(1.0, Color32::from_rgb(c[0], c[1], c[2])));
    }
}

fn draw_ground(painter: &egui::Painter, rect: Rect, camera: &OrbitCamera, state: &AppState) {
    let h = state.plane.half_extent() as f32;
    let corners = [[-h, 0.0, -h], [h, 0.0, -h], [h, 0.0, h], [-h, 0.0, h]];
    let projected: Option<Vec<egui::Pos2>> = corners.iter().map(|c| camera.project(*c, rect)).collect();
    if let Some(points) = projected {
        let g = state.settings.viewport.ground_color;
        painter.add(egui::Shape::convex_polygon(
            points,
            Color32::from_rgb(g[0], g[1], g[2]),
            Stroke::NONE,
        ));
    }
}

fn draw_grid(painter: &egui::Painter, rect: Rect, camera: &OrbitCamera, settings: &GridSettings) {
    let alpha = (settings.opacity * 255.0) as u8;
    let grid_color = Color32::from_rgba_unmultiplied(90, 90, 96, alpha);
    let stroke = Stroke::new(0.5, grid_color);

    let range = settings.range;
    let step = settings.size;

    for i in -range..=range {
        let f = i as f32 * step;
        let extent = range as f32 * step;

        // Lines along Z
        if let (Some(a), Some(b)) = (
            camera.project([f, 0.0, -extent], rect),
            camera.project([f, 0.0, extent], rect),
        ) {
            if rect.contains(a) || rect.contains(b) {
                painter.line_segment([a, b], stroke);
            }
        }
        // Lines along X
        if let (Some(a), Some(b)) = (
            camera.project([-extent, 0.0, f], rect),
            camera.project([extent, 0.0, f], rect),
        ) {
            if rect.contains(a) || rect.contains(b) {
                painter.line_segment([a, b], stroke);
            }
        }
    }
}

fn draw_polyline(
    painter: &egui::Painter,
    rect: Rect,
    camera: &OrbitCamera,
    points: &[[f64; 2]],
    stroke: Stroke,
) {
    for pair in points.windows(2) {
        let a = camera.project([pair[0][0] as f32, OUTLINE_LIFT, pair[0][1] as f32], rect);
        let b = camera.project([pair[1][0] as f32, OUTLINE_LIFT, pair[1][1] as f32], rect);
        if let (Some(a), Some(b)) = (a, b) {
            painter.line_segment([a, b], stroke);
        }
    }
}

fn draw_wireframe(
    painter: &egui::Painter,
    rect: Rect,
    camera: &OrbitCamera,
    mesh: &MeshData,
    stroke: Stroke,
) {
    let screen: Vec<Option<egui::Pos2>> = (0..mesh.vertex_count())
        .map(|i| camera.project(mesh.position(i).to_array(), rect))
        .collect();

    for tri in mesh.indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if let (Some(Some(pa)), Some(Some(pb))) = (screen.get(a as usize), screen.get(b as usize)) {
                painter.line_segment([*pa, *pb], stroke);
            }
        }
    }
}
