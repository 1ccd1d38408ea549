//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
pub use footprint_gui_lib::viewport::{camera, mesh};
mod overlays;
mod renderer;

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::i18n::t;
use crate::state::{AppSettings, AppState, CaptureEvent};
use crate::tile::TileImage;
use gl_renderer::GlRenderer;

/// Degrees of orbit per dragged pixel
const ROTATE_SPEED: f32 = 0.5;
/// Ground units of pan per dragged pixel (scaled by camera distance)
const PAN_SPEED: f32 = 0.01;
const ZOOM_SPEED: f32 = 0.01;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self { gl_renderer: None }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context, ground_size: f32) {
        match GlRenderer::new(gl, ground_size) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer unavailable, using wireframe fallback: {e}"),
        }
    }

    /// Hand a fetched tile to the renderer
    pub fn set_tile(&self, image: TileImage) {
        match &self.gl_renderer {
            Some(gl_renderer) => {
                if let Ok(mut r) = gl_renderer.lock() {
                    r.queue_tile(image);
                }
            }
            None => tracing::debug!("No GL renderer; tile texture not used"),
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        if let Some(gl_renderer) = &self.gl_renderer {
            if let Ok(r) = gl_renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        // ── Ground clicks ───────────────────────────────────────
        self.handle_click(&response, rect, state);

        // ── Orbit controls (inert until the outline closes) ─────
        self.handle_camera(&response, ui, state);

        if state.camera.update() {
            ui.ctx().request_repaint();
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // ── GL rendering ────────────────────────────────────────
        self.render_gl(ui, rect, state);

        // ── Overlays ─────────────────────────────────────
        self.draw_overlays(ui, rect, state);
    }

    fn handle_click(&mut self, response: &egui::Response, rect: egui::Rect, state: &mut AppState) {
        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let ray = state.camera.screen_ray(pos, rect);
        if let Some(CaptureEvent::Closed) = state.click_ray(&ray) {
            tracing::info!(
                "Building created from {} points, orbit controls enabled",
                state.capture.len()
            );
        }
    }

    fn handle_camera(&mut self, response: &egui::Response, ui: &Ui, state: &mut AppState) {
        if !state.camera.enabled {
            return;
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            state.camera.rotate(delta.x * ROTATE_SPEED, delta.y * ROTATE_SPEED);
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            state.camera.pan(delta.x * PAN_SPEED, delta.y * PAN_SPEED);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                state.camera.zoom(scroll * ZOOM_SPEED);
            }
        }
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        if let Some(gl_renderer) = &self.gl_renderer {
            let renderer_clone = gl_renderer.clone();
            let camera = state.camera.clone();

            let building = state.building.mesh().cloned();
            let building_version = state.building.version();

            let outline_rgb = state.settings.viewport.outline_color;
            let outline_color = AppSettings::rgb(outline_rgb);
            let outline = state.capture.outline().and_then(|points| {
                mesh::outline(points, [outline_color[0], outline_color[1], outline_color[2], 1.0])
            });
            // Closure bumps the capture version, which clears the outline
            let outline_version = state.capture.version();

            let grid_settings = state.settings.grid.clone();
            let bg_color = state.settings.viewport.background_color;
            let ground_color = state.settings.viewport.ground_color;

            let callback = egui::PaintCallback {
                rect,
                callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                    let gl = painter.gl();

                    let clip = info.clip_rect_in_pixels();
                    let viewport = [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ];

                    if let Ok(mut r) = renderer_clone.lock() {
                        r.upload_pending_tile(gl);
                        r.update_grid(gl, &grid_settings);
                        r.sync_building(gl, building.as_ref(), building_version);
                        r.sync_outline(gl, outline.as_ref(), outline_version, outline_rgb);

                        let render_params = gl_renderer::RenderParams {
                            viewport,
                            grid_visible: grid_settings.visible,
                            bg_color,
                            ground_color,
                        };
                        r.paint(gl, &camera, &render_params);
                    }
                })),
            };

            ui.painter().add(callback);
        } else {
            // Fallback: software wireframe rendering
            renderer::paint_viewport(ui, rect, &state.camera, state);
        }
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);

        overlays::draw_point_markers(&painter, rect, &state.camera, state);

        if state.camera.enabled {
            overlays::draw_camera_info(&painter, rect, &state.camera);
        }

        // Navigation hint
        let hint = if state.capture.is_closed() {
            t("hint.orbit")
        } else if state.capture.is_empty() {
            t("hint.first_point")
        } else {
            t("hint.next_point")
        };
        painter.text(
            egui::pos2(rect.center().x, rect.bottom() - 20.0),
            egui::Align2::CENTER_BOTTOM,
            hint,
            egui::FontId::proportional(11.0),
            egui::Color32::from_rgb(140, 140, 150),
        );
    }
}
