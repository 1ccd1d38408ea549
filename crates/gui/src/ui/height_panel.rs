//! Building height control, shown once the outline is closed

use egui::Ui;
use shared::{HEIGHT_STEP, MAX_HEIGHT, MIN_HEIGHT};

use crate::extrude::footprint_ring;
use crate::i18n::t;
use crate::state::AppState;
use crate::validation::footprint_self_intersects;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading(t("height.title"));
    ui.separator();

    let mut height = state.building.height();
    ui.label(t("height.label"));
    let response = ui.add(
        egui::Slider::new(&mut height, MIN_HEIGHT..=MAX_HEIGHT)
            .step_by(HEIGHT_STEP)
            .fixed_decimals(1),
    );
    if response.changed() {
        if let Err(e) = state.set_height(height) {
            tracing::warn!("Height change rejected: {e}");
        }
    }

    ui.label(format!("{}: {:.1}", t("height.value"), state.building.height()));

    ui.add_space(8.0);

    if let Ok(ring) = footprint_ring(state.building.footprint()) {
        ui.weak(format!("{}: {}", t("height.corners"), ring.len()));
        if footprint_self_intersects(&ring) {
            ui.colored_label(egui::Color32::from_rgb(255, 180, 80), t("height.self_intersects"));
        }
    }
    if let Some(mesh) = state.building.mesh() {
        ui.weak(format!("{}: {}", t("height.triangles"), mesh.triangle_count()));
    }

    if let Some(err) = state.building.error() {
        ui.colored_label(egui::Color32::from_rgb(230, 110, 110), err);
    }
}
