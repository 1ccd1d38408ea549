//! Main application module

mod keyboard;
mod menus;
mod styles;

use eframe::egui;

use crate::i18n::{lang_from_code, set_lang};
use crate::state::settings::TileSettings;
use crate::state::AppState;
use crate::tile::TileLoader;
use crate::ui::{height_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Startup options from the command line
#[derive(Debug, Default)]
pub struct LaunchOptions {
    /// Skip the tile fetch regardless of settings
    pub no_tiles: bool,
    /// Override the configured tile address
    pub tile: Option<shared::TileCoords>,
}

impl LaunchOptions {
    /// Tile to fetch for this run, or `None` when fetching is off.
    ///
    /// The `--tile` override applies to this launch only; `settings` is left untouched.
    pub fn tile_source(&self, settings: &TileSettings) -> Option<shared::TileSource> {
        if self.no_tiles || !settings.enabled {
            return None;
        }
        let mut source = settings.source.clone();
        if let Some(coords) = self.tile {
            source.coords = coords;
        }
        Some(source)
    }
}

/// Main application
pub struct FootprintApp {
    state: AppState,
    viewport: ViewportPanel,
    tile_loader: TileLoader,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl FootprintApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = AppState::default();

        set_lang(lang_from_code(&state.settings.ui.language));
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl, state.plane.size as f32);
        }

        let tile_loader = match options.tile_source(&state.settings.tile) {
            Some(source) => TileLoader::spawn(&source, &state.settings.tile.user_agent),
            None => {
                tracing::info!("Map tile fetch disabled");
                TileLoader::disabled()
            }
        };

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            tile_loader,
            last_font_size,
        }
    }
}

impl eframe::App for FootprintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        if let Some(image) = self.tile_loader.poll() {
            self.viewport.set_tile(image);
            ctx.request_repaint();
        } else if *self.tile_loader.status() == crate::tile::TileStatus::Loading {
            // Keep polling until the worker reports back
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::view_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, self.tile_loader.status());
            });

        // ── Right panel: height control, only after closure ──
        if self.state.capture.is_closed() {
            egui::SidePanel::right("height_panel")
                .default_width(220.0)
                .resizable(false)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)),
                )
                .show(ctx, |ui| {
                    height_panel::show(ui, &mut self.state);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.state.settings.save();
        if let Some(gl) = gl {
            self.viewport.destroy(gl);
        }
    }
}
