use glam::{Vec2, Vec3};
use shared::GroundPlane;

use super::mesh::MeshData;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for i in 0..data.vertex_count() {
            let p = data.position(i);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Convert a screen position inside `rect_min..rect_min+rect_size` to
/// normalized device coordinates (x right, y up, both in [-1, 1]).
pub fn screen_to_ndc(pos: Vec2, rect_min: Vec2, rect_size: Vec2) -> Vec2 {
    Vec2::new(
        (pos.x - rect_min.x) / rect_size.x * 2.0 - 1.0,
        -((pos.y - rect_min.y) / rect_size.y) * 2.0 + 1.0,
    )
}

/// Intersect a ray with the ground plane (y = 0).
/// Returns None if the ray is parallel, the hit is behind the origin,
/// or the hit falls outside the plane's extent.
pub fn ray_ground_plane(ray: &Ray, plane: &GroundPlane) -> Option<Vec3> {
    let denom = ray.direction.dot(Vec3::Y);
    if denom.abs() < 1e-6 {
        return None; // Ray parallel to plane
    }

    let t = -ray.origin.dot(Vec3::Y) / denom;
    if t < 0.0 {
        return None; // Intersection behind camera
    }

    let hit = ray.at(t);
    if !plane.contains(hit.x as f64, hit.z as f64) {
        return None;
    }
    Some(Vec3::new(hit.x, 0.0, hit.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn test_ray_hits_plane() {
        let hit = ray_ground_plane(&down_ray(1.0, -2.0), &GroundPlane::default()).unwrap();
        assert!((hit - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_outside_plane_misses() {
        assert!(ray_ground_plane(&down_ray(6.0, 0.0), &GroundPlane::default()).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
        };
        assert!(ray_ground_plane(&ray, &GroundPlane::default()).is_none());
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::Y,
        };
        assert!(ray_ground_plane(&ray, &GroundPlane::default()).is_none());
    }

    #[test]
    fn test_screen_to_ndc_corners() {
        let min = Vec2::new(100.0, 50.0);
        let size = Vec2::new(200.0, 100.0);
        let c = screen_to_ndc(Vec2::new(200.0, 100.0), min, size);
        assert!(c.length() < 1e-6);
        let tl = screen_to_ndc(min, min, size);
        assert_eq!(tl, Vec2::new(-1.0, 1.0));
        let br = screen_to_ndc(min + size, min, size);
        assert_eq!(br, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_aabb_from_mesh() {
        let mesh = MeshData {
            vertices: vec![
                -1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.5, 0.5, 0.5,
                3.0, 4.0, -2.0, 0.0, 1.0, 0.0, 0.5, 0.5, 0.5,
            ],
            indices: vec![],
        };
        let aabb = Aabb::from_mesh(&mesh);
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 0.0));
    }
}
