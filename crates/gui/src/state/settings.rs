//! Application settings

use serde::{Deserialize, Serialize};
use shared::TileSource;

/// Grid display settings (drawn over the ground when no tile is loaded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Show grid
    pub visible: bool,
    /// Grid cell size in world units
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 1.0,
            range: 5,
            opacity: 0.6,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Ground color RGB, used until the tile arrives
    pub ground_color: [u8; 3],
    /// Preview outline color RGB
    pub outline_color: [u8; 3],
    /// Building color RGB
    pub building_color: [u8; 3],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [0, 0, 0],
            ground_color: [70, 80, 70],
            outline_color: [255, 0, 0],
            building_color: [128, 128, 128],
        }
    }
}

/// Camera and orbit-control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Distance above the target at startup
    pub start_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of pending motion applied per frame
    pub damping: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            start_distance: 10.0,
            min_distance: 1.0,
            max_distance: 50.0,
            damping: 0.05,
        }
    }
}

/// Map tile settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSettings {
    /// Fetch the tile at startup
    pub enabled: bool,
    pub source: TileSource,
    /// User-Agent sent to the tile server
    pub user_agent: String,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source: TileSource::default(),
            user_agent: format!("footprint-gui/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    /// Interface language ("en" or "ru")
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: default_language(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    /// Grid settings
    #[serde(default)]
    pub grid: GridSettings,
    /// Viewport settings
    #[serde(default)]
    pub viewport: ViewportSettings,
    /// Camera settings
    #[serde(default)]
    pub camera: CameraSettings,
    /// Tile settings
    #[serde(default)]
    pub tile: TileSettings,
    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "footprint", "footprint")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Cannot create config dir {}: {e}", dir.display());
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("Failed to serialize settings: {e}"),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid settings JSON: {e}"))
    }

    /// Color as normalized RGB
    pub fn rgb(c: [u8; 3]) -> [f32; 3] {
        [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene() {
        let s = AppSettings::default();
        assert_eq!(s.camera.fov_degrees, 90.0);
        assert_eq!(s.camera.damping, 0.05);
        assert_eq!(s.viewport.building_color, [128, 128, 128]);
        assert!(s.tile.enabled);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = AppSettings::from_json(r#"{"camera": {"fov_degrees": 60.0, "start_distance": 8.0, "min_distance": 1.0, "max_distance": 20.0, "damping": 0.1}}"#).unwrap();
        assert_eq!(s.camera.fov_degrees, 60.0);
        assert_eq!(s.grid.range, 5);
        assert_eq!(s.ui.language, "en");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AppSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_rgb() {
        assert_eq!(AppSettings::rgb([255, 0, 0]), [1.0, 0.0, 0.0]);
    }
}
