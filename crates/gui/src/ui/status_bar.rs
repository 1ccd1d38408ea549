use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;
use crate::tile::TileStatus;

pub fn show(ui: &mut Ui, state: &AppState, tile: &TileStatus) {
    ui.horizontal(|ui| {
        ui.weak(format!("{}: {}", t("status.points"), state.capture.len()));

        ui.separator();

        if state.capture.is_closed() {
            ui.colored_label(egui::Color32::from_rgb(120, 200, 120), t("status.closed"));
        } else {
            ui.weak(t("status.open"));
        }

        match tile {
            TileStatus::Ready => {}
            TileStatus::Loading => {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(255, 200, 100), t("status.tile_loading"));
            }
            TileStatus::Failed(e) => {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(230, 110, 110), t("status.tile_failed"))
                    .on_hover_text(e.as_str());
            }
            TileStatus::Disabled => {
                ui.separator();
                ui.weak(t("status.tile_off"));
            }
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("footprint v", env!("CARGO_PKG_VERSION")));
        });
    });
}
