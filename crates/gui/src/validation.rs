//! Mesh and footprint validation utilities.
//!
//! `MeshValidator` provides methods to check mesh data integrity:
//! correct stride, in-range indices, normalized normals, AABB dimensions, etc.
//! `footprint_self_intersects` checks a captured outline for crossing edges.

use kurbo::{Line, Point};

use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    /// Number of vertices (vertices buffer length / 9).
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / 9
    }

    /// Number of triangles (indices buffer length / 3).
    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Check that the vertex buffer length is a multiple of 9 (the stride).
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % 9 == 0
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// Check that all vertex normals have unit length (within epsilon).
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| (self.mesh.normal(i).length() - 1.0).abs() <= epsilon)
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_mesh(self.mesh)
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb().size().to_array()
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (dims[0] - expected[0]).abs() < tolerance
            && (dims[1] - expected[1]).abs() < tolerance
            && (dims[2] - expected[2]).abs() < tolerance
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of 9",
                self.mesh.vertices.len()
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        errors
    }
}

// ── Footprint checks ─────────────────────────────────────────

/// True if any two non-adjacent edges of the closed ring cross.
pub fn footprint_self_intersects(ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }

    let edge = |i: usize| {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        Line::new(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
    };

    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_cross(edge(i), edge(j)) {
                return true;
            }
        }
    }
    false
}

/// Proper crossing of two segments (touching endpoints don't count)
fn segments_cross(l1: Line, l2: Line) -> bool {
    let d1 = l1.p1 - l1.p0;
    let d2 = l2.p1 - l2.p0;
    let cross = d1.cross(d2);
    if cross.abs() < 1e-12 {
        return false;
    }
    let d = l2.p0 - l1.p0;
    let t = d.cross(d2) / cross;
    let u = d.cross(d1) / cross;
    const EPS: f64 = 1e-9;
    t > EPS && t < 1.0 - EPS && u > EPS && u < 1.0 - EPS
}
