//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (home, escape) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Home),
            i.key_pressed(egui::Key::Escape),
        )
    });

    // Home: back to the top-down start view
    if home {
        state.reset_camera();
        tracing::debug!("Camera reset");
    }
    // Escape: close the settings window
    if escape && state.show_settings_window {
        state.show_settings_window = false;
    }
}
