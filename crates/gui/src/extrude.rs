use glam::Vec3;

use crate::viewport::mesh::{push_vert, MeshData};

pub const DEFAULT_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Points closer than this are treated as the same corner
const DUPLICATE_EPS: f64 = 1e-9;
/// Sine of the turn angle below which a corner is treated as straight
const COLLINEAR_EPS: f64 = 1e-6;
/// Rings with less area than this are rejected
const MIN_AREA: f64 = 1e-9;
/// Heights below this produce a flat footprint
const FLAT_EPS: f64 = 1e-9;

/// Straight extrusion parameters (no bevel)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeSettings {
    /// Extrusion height along +Y
    pub depth: f64,
    /// Number of wall subdivisions along the height
    pub steps: u32,
}

impl ExtrudeSettings {
    /// Single-step extrusion to `depth`
    pub fn straight(depth: f64) -> Self {
        Self { depth, steps: 1 }
    }
}

// ── Footprint ring ───────────────────────────────────────────

/// Shoelace sum over (x, z); positive when counter-clockwise in that frame
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum * 0.5
}

/// Turn captured points into a clean polygon ring.
///
/// Every captured point is a corner, the closing click included. Repeated
/// points and straight (or back-tracking) corners are removed, and the ring
/// is oriented so that `(-dz, 0, dx)` of every edge points outward.
pub fn footprint_ring(points: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, String> {
    let mut ring: Vec<[f64; 2]> = Vec::with_capacity(points.len());

    for p in points {
        if ring.last().is_some_and(|q| dist_sq(q, p) < DUPLICATE_EPS * DUPLICATE_EPS) {
            continue;
        }
        ring.push(*p);
    }
    while ring.len() > 1 && dist_sq(&ring[0], &ring[ring.len() - 1]) < DUPLICATE_EPS * DUPLICATE_EPS {
        ring.pop();
    }
    drop_straight_corners(&mut ring);

    if ring.len() < 3 {
        return Err(format!(
            "Footprint needs at least 3 distinct points, got {}",
            ring.len()
        ));
    }

    let area = signed_area(&ring);
    if area.abs() < MIN_AREA {
        return Err("Footprint has zero area".to_string());
    }
    if area > 0.0 {
        ring.reverse();
    }

    Ok(ring)
}

/// Remove straight corners and zero-width spikes, keeping at least three corners.
///
/// A spike keeps its tip: the nearer neighbour lies on the way out to it and
/// is the one removed, so the ring's extents never shrink.
fn drop_straight_corners(ring: &mut Vec<[f64; 2]>) {
    while ring.len() > 3 {
        let n = ring.len();
        let found = (0..n).find_map(|i| {
            let (a, b, c) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
            let (u, v) = ([b[0] - a[0], b[1] - a[1]], [c[0] - b[0], c[1] - b[1]]);
            let (lu, lv) = (u[0].hypot(u[1]), v[0].hypot(v[1]));
            let cross = u[0] * v[1] - u[1] * v[0];
            if cross.abs() > COLLINEAR_EPS * lu * lv {
                return None;
            }
            if u[0] * v[0] + u[1] * v[1] >= 0.0 {
                Some(i)
            } else if lu < lv {
                Some((i + n - 1) % n)
            } else {
                Some((i + 1) % n)
            }
        });
        match found {
            Some(i) => {
                ring.remove(i);
            }
            None => break,
        }
    }
}

/// Ear-clip a ring into triangles (indices into the ring)
pub fn triangulate(ring: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, String> {
    let coords: Vec<f64> = ring.iter().flat_map(|p| [p[0], p[1]]).collect();
    let flat = earcutr::earcut(&coords, &[], 2)
        .map_err(|e| format!("Footprint triangulation failed: {e:?}"))?;
    if flat.is_empty() {
        return Err("Footprint triangulation produced no triangles".to_string());
    }
    Ok(flat.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect())
}

// ── Extrude ─────────────────────────────────────────────────

/// Extrude the captured footprint straight up from y = 0.
///
/// Output depends only on `(points, settings, color)`.
pub fn extrude_footprint(
    points: &[[f64; 2]],
    settings: &ExtrudeSettings,
    color: [f32; 3],
) -> Result<MeshData, String> {
    let ring = footprint_ring(points)?;
    let triangles = triangulate(&ring)?;
    let height = settings.depth.max(0.0);
    let n = ring.len();

    let mut vertices: Vec<f32> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Top cap
    add_cap(&mut vertices, &mut indices, &ring, &triangles, height as f32, true, color);

    if height < FLAT_EPS {
        return Ok(MeshData { vertices, indices });
    }

    // Bottom cap
    add_cap(&mut vertices, &mut indices, &ring, &triangles, 0.0, false, color);

    // Side walls
    let steps = settings.steps.max(1);
    for s in 0..steps {
        let y0 = (height * s as f64 / steps as f64) as f32;
        let y1 = (height * (s + 1) as f64 / steps as f64) as f32;

        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            let b0 = Vec3::new(a[0] as f32, y0, a[1] as f32);
            let b1 = Vec3::new(b[0] as f32, y0, b[1] as f32);
            let t0 = Vec3::new(a[0] as f32, y1, a[1] as f32);
            let t1 = Vec3::new(b[0] as f32, y1, b[1] as f32);

            let normal = Vec3::new(-(b[1] - a[1]) as f32, 0.0, (b[0] - a[0]) as f32).normalize_or_zero();

            let base_idx = (vertices.len() / 9) as u32;
            push_vert(&mut vertices, b0, normal, color);
            push_vert(&mut vertices, b1, normal, color);
            push_vert(&mut vertices, t1, normal, color);
            push_vert(&mut vertices, t0, normal, color);

            indices.extend_from_slice(&[base_idx, base_idx + 1, base_idx + 2]);
            indices.extend_from_slice(&[base_idx, base_idx + 2, base_idx + 3]);
        }
    }

    Ok(MeshData { vertices, indices })
}

// ── Helpers ──────────────────────────────────────────────────

fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    ring: &[[f64; 2]],
    triangles: &[[usize; 3]],
    y: f32,
    facing_up: bool,
    color: [f32; 3],
) {
    let normal = if facing_up { Vec3::Y } else { Vec3::NEG_Y };
    let base_idx = (vertices.len() / 9) as u32;
    for p in ring {
        push_vert(vertices, Vec3::new(p[0] as f32, y, p[1] as f32), normal, color);
    }

    for &[i0, i1, i2] in triangles {
        let (a, b, c) = (ring[i0], ring[i1], ring[i2]);
        // y component of (b - a) x (c - a) for points in the X/Z plane
        let cross_y = (b[1] - a[1]) * (c[0] - a[0]) - (b[0] - a[0]) * (c[1] - a[1]);
        let (j1, j2) = if (cross_y > 0.0) == facing_up { (i1, i2) } else { (i2, i1) };
        indices.extend_from_slice(&[
            base_idx + i0 as u32,
            base_idx + j1 as u32,
            base_idx + j2 as u32,
        ]);
    }
}

fn dist_sq(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}
