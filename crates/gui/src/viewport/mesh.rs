use glam::Vec3;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, i: usize) -> Vec3 {
        let b = i * 9;
        Vec3::new(self.vertices[b], self.vertices[b + 1], self.vertices[b + 2])
    }

    pub fn normal(&self, i: usize) -> Vec3 {
        let b = i * 9;
        Vec3::new(self.vertices[b + 3], self.vertices[b + 4], self.vertices[b + 5])
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 7
    }
}

/// Textured quad: interleaved [pos.x, pos.y, pos.z, u, v]
#[derive(Clone, Debug)]
pub struct TexturedMeshData {
    /// 5 floats per vertex: position(3) + uv(2)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

// ── Ground ───────────────────────────────────────────────────

/// Ground plane quad at y = 0. The tile's top edge (v = 0) lies at -Z,
/// matching a plane rotated -90° about X.
pub fn ground_quad(size: f32) -> TexturedMeshData {
    let h = size * 0.5;
    #[rustfmt::skip]
    let vertices = vec![
        -h, 0.0,  h, 0.0, 1.0,
         h, 0.0,  h, 1.0, 1.0,
         h, 0.0, -h, 1.0, 0.0,
        -h, 0.0, -h, 0.0, 0.0,
    ];
    TexturedMeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Grid lines over the ground plane, shown when no tile texture is present
pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.35_f32, 0.35, 0.38, opacity];
    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        // Line along Z
        push_line_vert(&mut vertices, f, 0.001, -extent, grid_color);
        push_line_vert(&mut vertices, f, 0.001, extent, grid_color);
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.001, f, grid_color);
        push_line_vert(&mut vertices, extent, 0.001, f, grid_color);
    }

    LineMeshData { vertices }
}

// ── Outline preview ──────────────────────────────────────────

/// Height at which the preview outline floats above the ground
pub const OUTLINE_LIFT: f32 = 0.01;

/// Open polyline through the captured points, as GL_LINES segment pairs.
/// Returns None for fewer than two points.
pub fn outline(points: &[[f64; 2]], color: [f32; 4]) -> Option<LineMeshData> {
    if points.len() < 2 {
        return None;
    }
    let mut vertices = Vec::with_capacity((points.len() - 1) * 2 * 7);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        push_line_vert(&mut vertices, a[0] as f32, OUTLINE_LIFT, a[1] as f32, color);
        push_line_vert(&mut vertices, b[0] as f32, OUTLINE_LIFT, b[1] as f32, color);
    }
    Some(LineMeshData { vertices })
}

// ── Helpers ──────────────────────────────────────────────────

pub fn push_vert(v: &mut Vec<f32>, p: Vec3, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}
