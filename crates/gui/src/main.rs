mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::extrude`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use footprint_gui_lib::extrude;
pub use footprint_gui_lib::state;
pub use footprint_gui_lib::tile;
pub use footprint_gui_lib::validation;

use app::{FootprintApp, LaunchOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footprint_gui=info,footprint_gui_lib=info".into()),
        )
        .init();

    let options = parse_args(std::env::args().skip(1));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Footprint")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        depth_buffer: 24,
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "footprint-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(FootprintApp::new(cc, options)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Parse `--no-tiles` and `--tile Z/X/Y`
fn parse_args(mut args: impl Iterator<Item = String>) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-tiles" => options.no_tiles = true,
            "--tile" => match args.next() {
                Some(value) => match shared::TileCoords::parse(&value) {
                    Ok(coords) => options.tile = Some(coords),
                    Err(e) => tracing::error!("Ignoring --tile: {e}"),
                },
                None => tracing::error!("--tile expects Z/X/Y"),
            },
            other => tracing::warn!("Unknown argument: {other}"),
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> LaunchOptions {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_args() {
        let o = args(&[]);
        assert!(!o.no_tiles);
        assert!(o.tile.is_none());
    }

    #[test]
    fn test_no_tiles_and_tile() {
        let o = args(&["--no-tiles", "--tile", "3/1/2"]);
        assert!(o.no_tiles);
        assert_eq!(o.tile, Some(shared::TileCoords { z: 3, x: 1, y: 2 }));
    }

    #[test]
    fn test_bad_tile_ignored() {
        let o = args(&["--tile", "3/9/2"]);
        assert!(o.tile.is_none());
        let o = args(&["--tile"]);
        assert!(o.tile.is_none());
    }
}
