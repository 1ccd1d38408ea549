//! The extruded building: footprint, height and the current prism mesh

use shared::{clamp_height, BuildingDescription, BuildingId, Point2D};

use crate::extrude::{extrude_footprint, ExtrudeSettings, DEFAULT_COLOR};
use crate::viewport::mesh::MeshData;

/// Building state. The mesh is regenerated (never edited) on every height change.
pub struct BuildingState {
    id: Option<BuildingId>,
    footprint: Vec<[f64; 2]>,
    height: f64,
    color: [f32; 3],
    mesh: Option<MeshData>,
    /// Last extrusion error, shown in the UI
    error: Option<String>,
    /// Incremented whenever the mesh is replaced
    version: u64,
}

impl Default for BuildingState {
    fn default() -> Self {
        Self {
            id: None,
            footprint: Vec::new(),
            height: 0.0,
            color: DEFAULT_COLOR,
            mesh: None,
            error: None,
            version: 0,
        }
    }
}

impl BuildingState {
    pub fn with_color(color: [f32; 3]) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Take the closed footprint and build the first prism
    pub fn create(&mut self, points: &[[f64; 2]], height: f64) -> Result<(), String> {
        self.footprint = points.to_vec();
        if self.id.is_none() {
            self.id = Some(uuid::Uuid::new_v4().to_string());
        }
        self.rebuild(height)
    }

    /// Replace the prism with one of the given height
    pub fn set_height(&mut self, height: f64) -> Result<(), String> {
        if self.footprint.is_empty() {
            return Err("No footprint to extrude".to_string());
        }
        self.rebuild(height)
    }

    fn rebuild(&mut self, height: f64) -> Result<(), String> {
        self.height = clamp_height(height);
        // Previous prism is discarded whatever the outcome
        self.mesh = None;
        self.version += 1;

        match extrude_footprint(&self.footprint, &ExtrudeSettings::straight(self.height), self.color) {
            Ok(mesh) => {
                tracing::debug!(
                    "Building extruded to {:.1} ({} triangles)",
                    self.height,
                    mesh.triangle_count()
                );
                self.mesh = Some(mesh);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Extrusion failed: {e}");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn id(&self) -> Option<&BuildingId> {
        self.id.as_ref()
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn footprint(&self) -> &[[f64; 2]] {
        &self.footprint
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn description(&self) -> Option<BuildingDescription> {
        let id = self.id.clone()?;
        Some(BuildingDescription {
            id,
            footprint: self.footprint.iter().copied().map(Point2D::from).collect(),
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_square() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.01, 0.02]]
    }

    #[test]
    fn test_set_height_without_footprint_fails() {
        let mut b = BuildingState::default();
        assert!(b.set_height(2.0).is_err());
        assert!(b.mesh().is_none());
    }

    #[test]
    fn test_create_then_replace() {
        let mut b = BuildingState::default();
        b.create(&closed_square(), 1.0).unwrap();
        let first = b.mesh().cloned().unwrap();
        let v1 = b.version();

        b.set_height(5.0).unwrap();
        assert!(b.version() > v1);
        assert_ne!(b.mesh().unwrap(), &first);
        assert_eq!(b.height(), 5.0);

        b.set_height(1.0).unwrap();
        assert_eq!(b.mesh().unwrap(), &first);
    }

    #[test]
    fn test_height_is_clamped() {
        let mut b = BuildingState::default();
        b.create(&closed_square(), 25.0).unwrap();
        assert_eq!(b.height(), 10.0);
        b.set_height(-3.0).unwrap();
        assert_eq!(b.height(), 0.0);
    }

    #[test]
    fn test_failed_extrusion_clears_mesh() {
        let mut b = BuildingState::default();
        let err = b.create(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]], 1.0);
        assert!(err.is_err());
        assert!(b.mesh().is_none());
        assert!(b.error().is_some());
    }

    #[test]
    fn test_id_is_stable() {
        let mut b = BuildingState::default();
        b.create(&closed_square(), 1.0).unwrap();
        let id = b.id().cloned();
        b.set_height(3.0).unwrap();
        assert_eq!(b.id().cloned(), id);
        assert_eq!(b.description().unwrap().footprint.len(), 5);
    }
}
