//! Menu bar and settings window

use eframe::egui;

use crate::i18n::{lang, lang_code, set_lang, t, Lang};
use crate::state::AppState;

pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.view"), |ui| {
        if ui.button(t("menu.reset_camera")).clicked() {
            state.reset_camera();
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, label) in [(Lang::Ru, "Русский"), (Lang::En, "English")] {
                if ui.selectable_label(lang() == l, label).clicked() {
                    set_lang(l);
                    state.settings.ui.language = lang_code(l).to_string();
                    ui.close_menu();
                }
            }
        });
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.settings_window")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(380.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_grid_settings(ui, state);
                show_viewport_settings(ui, state);
                show_camera_settings(ui, state);
                show_tile_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open;
}

fn show_grid_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.grid"));
    ui.checkbox(&mut state.settings.grid.visible, t("settings.grid_visible"));

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.size)
                .speed(0.1)
                .range(0.1..=5.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_range"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.range)
                .speed(1)
                .range(1..=50),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_opacity"));
        ui.add(egui::Slider::new(&mut state.settings.grid.opacity, 0.0..=1.0));
    });
    ui.add_space(10.0);
}

fn color_row(ui: &mut egui::Ui, label: &str, rgb: &mut [u8; 3]) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
        if ui.color_edit_button_srgba(&mut color).changed() {
            *rgb = [color.r(), color.g(), color.b()];
        }
    });
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.viewport"));
    color_row(ui, t("settings.bg_color"), &mut state.settings.viewport.background_color);
    color_row(ui, t("settings.ground_color"), &mut state.settings.viewport.ground_color);
    color_row(ui, t("settings.outline_color"), &mut state.settings.viewport.outline_color);
    ui.add_space(10.0);
}

fn show_camera_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.camera"));
    ui.horizontal(|ui| {
        ui.label(t("settings.damping"));
        ui.add(egui::Slider::new(&mut state.settings.camera.damping, 0.01..=1.0));
    });
    ui.add_space(10.0);
}

fn show_tile_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.tiles"));
    ui.checkbox(&mut state.settings.tile.enabled, t("settings.tiles_enabled"));
    ui.horizontal(|ui| {
        ui.label(t("settings.tile_url"));
        ui.text_edit_singleline(&mut state.settings.tile.source.url_template);
    });
    ui.weak(t("settings.restart_note"));
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = crate::state::settings::AppSettings::default();
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
