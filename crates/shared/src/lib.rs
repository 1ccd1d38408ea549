use serde::{Deserialize, Serialize};

/// Unique id of the building in the session
pub type BuildingId = String;

/// Distance (world units) below which the last click closes the outline
pub const CLOSE_DISTANCE: f64 = 0.2;

/// Height slider range and step
pub const MIN_HEIGHT: f64 = 0.0;
pub const MAX_HEIGHT: f64 = 10.0;
pub const HEIGHT_STEP: f64 = 0.1;

/// Height of the first extrusion produced when the outline closes
pub const INITIAL_HEIGHT: f64 = 1.0;

/// 2D point on the ground plane (world X/Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

/// Square ground plane centred on the origin at y = 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    /// Edge length in world units
    pub size: f64,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self { size: 10.0 }
    }
}

impl GroundPlane {
    pub fn half_extent(&self) -> f64 {
        self.size * 0.5
    }

    /// Whether a ground point (X/Z) lies on the plane
    pub fn contains(&self, x: f64, z: f64) -> bool {
        let h = self.half_extent();
        x.abs() <= h && z.abs() <= h
    }
}

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCoords {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl Default for TileCoords {
    fn default() -> Self {
        Self {
            z: 16,
            x: 19294,
            y: 24641,
        }
    }
}

impl TileCoords {
    /// Parse "Z/X/Y"
    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 3 {
            return Err(format!("Expected Z/X/Y, got '{s}'"));
        }
        let num = |p: &str| {
            p.parse::<u32>()
                .map_err(|e| format!("Invalid tile component '{p}': {e}"))
        };
        let coords = Self {
            z: num(parts[0])?,
            x: num(parts[1])?,
            y: num(parts[2])?,
        };
        // At zoom z the grid is 2^z tiles wide
        let max = 1u64 << coords.z.min(31);
        if coords.x as u64 >= max || coords.y as u64 >= max {
            return Err(format!(
                "Tile {}/{}/{} is outside the zoom-{} grid",
                coords.z, coords.x, coords.y, coords.z
            ));
        }
        Ok(coords)
    }
}

/// Where the ground texture comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSource {
    /// URL with {z}, {x}, {y} placeholders
    pub url_template: String,
    pub coords: TileCoords,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            coords: TileCoords::default(),
        }
    }
}

impl TileSource {
    pub fn url(&self) -> String {
        self.url_template
            .replace("{z}", &self.coords.z.to_string())
            .replace("{x}", &self.coords.x.to_string())
            .replace("{y}", &self.coords.y.to_string())
    }
}

/// Snapshot of the extruded building (for inspection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDescription {
    pub id: BuildingId,
    pub footprint: Vec<Point2D>,
    pub height: f64,
}

/// Snapshot of the whole drawing session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    pub points: Vec<Point2D>,
    pub closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingDescription>,
}

/// Clamp a height to the slider range
pub fn clamp_height(height: f64) -> f64 {
    if height.is_nan() {
        return MIN_HEIGHT;
    }
    height.clamp(MIN_HEIGHT, MAX_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_ground_plane_contains() {
        let plane = GroundPlane::default();
        assert!(plane.contains(0.0, 0.0));
        assert!(plane.contains(5.0, -5.0));
        assert!(!plane.contains(5.01, 0.0));
        assert!(!plane.contains(0.0, -7.0));
    }

    #[test]
    fn test_tile_url() {
        let src = TileSource::default();
        assert_eq!(src.url(), "https://tile.openstreetmap.org/16/19294/24641.png");
    }

    #[test]
    fn test_tile_parse() {
        let c = TileCoords::parse("16/19294/24641").unwrap();
        assert_eq!(c, TileCoords::default());
        assert!(TileCoords::parse("16/19294").is_err());
        assert!(TileCoords::parse("a/b/c").is_err());
        assert!(TileCoords::parse("1/2/0").is_err());
    }

    #[test]
    fn test_clamp_height() {
        assert_eq!(clamp_height(-1.0), 0.0);
        assert_eq!(clamp_height(12.0), 10.0);
        assert_eq!(clamp_height(f64::NAN), 0.0);
        assert_eq!(clamp_height(3.5), 3.5);
    }

    #[test]
    fn test_session_serde() {
        let s = SessionDescription {
            points: vec![Point2D::new(1.0, 2.0)],
            closed: false,
            building: None,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("building"));
        let back: SessionDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
