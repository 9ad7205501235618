//! Unit icosphere with unwelded vertices and barycentric UVs.
//!
//! Every triangle owns its three vertices, so each one can carry the
//! barycentric corner `(1,0)`, `(0,1)` or `(0,0)` in its UV channel. Shaders
//! use that for wireframe and edge effects without extra geometry.

use glam::{Vec2, Vec3, Vec4};

/// Highest subdivision level accepted (60 * 4^6 vertices).
pub const MAX_SUBDIVIDE_LEVEL: u32 = 6;

/// Barycentric coordinates assigned to the corners of every triangle.
const BARYCENTRIC: [Vec2; 3] = [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0)];

/// Golden ratio, the icosahedron's corner offset.
const PHI: f32 = 1.618_034;

const CORNERS: [Vec3; 12] = [
    Vec3::new(-1.0, PHI, 0.0),
    Vec3::new(1.0, PHI, 0.0),
    Vec3::new(-1.0, -PHI, 0.0),
    Vec3::new(1.0, -PHI, 0.0),
    Vec3::new(0.0, -1.0, PHI),
    Vec3::new(0.0, 1.0, PHI),
    Vec3::new(0.0, -1.0, -PHI),
    Vec3::new(0.0, 1.0, -PHI),
    Vec3::new(PHI, 0.0, -1.0),
    Vec3::new(PHI, 0.0, 1.0),
    Vec3::new(-PHI, 0.0, -1.0),
    Vec3::new(-PHI, 0.0, 1.0),
];

/// Faces of the base icosahedron, indices into [`CORNERS`].
const FACES: [[usize; 3]; 20] = [
    // Five faces around the top corner
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    // Upper band
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    // Five faces around the bottom corner
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    // Lower band
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Renderable triangle list. All per-vertex lists have the same length.
#[derive(Debug, Clone, Default)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    pub barycentric: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A triangle on the unit sphere plus the tangent its vertices share.
struct Triangle {
    corners: [Vec3; 3],
    tangent: Vec4,
}

impl Triangle {
    /// `corners` are projected onto the sphere; the tangent follows the
    /// unprojected first edge.
    fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            corners: [a.normalize(), b.normalize(), c.normalize()],
            tangent: (b - a).normalize().extend(0.0),
        }
    }

    /// Split into four through the edge midpoints.
    fn subdivide(&self, out: &mut Vec<Triangle>) {
        let [a, b, c] = self.corners;
        let m1 = 0.5 * (a + b);
        let m2 = 0.5 * (b + c);
        let m3 = 0.5 * (c + a);

        out.push(Triangle::new(a, m1, m3));
        out.push(Triangle::new(b, m2, m1));
        out.push(Triangle::new(c, m3, m2));
        out.push(Triangle::new(m1, m2, m3));
    }
}

/// Build a unit icosphere subdivided `subdivide_level` times.
///
/// Level 0 is the plain icosahedron (20 triangles); each level multiplies the
/// triangle count by four. Levels above [`MAX_SUBDIVIDE_LEVEL`] are clamped.
pub fn create_icosphere(subdivide_level: u32) -> SphereMesh {
    let level = if subdivide_level > MAX_SUBDIVIDE_LEVEL {
        tracing::warn!(
            requested = subdivide_level,
            max = MAX_SUBDIVIDE_LEVEL,
            "clamping icosphere subdivision level"
        );
        MAX_SUBDIVIDE_LEVEL
    } else {
        subdivide_level
    };

    let mut triangles: Vec<Triangle> = FACES
        .iter()
        .map(|&[a, b, c]| Triangle::new(CORNERS[a], CORNERS[b], CORNERS[c]))
        .collect();

    for _ in 0..level {
        let mut next = Vec::with_capacity(triangles.len() * 4);
        for triangle in &triangles {
            triangle.subdivide(&mut next);
        }
        triangles = next;
    }

    let vertex_count = triangles.len() * 3;
    let mut mesh = SphereMesh {
        positions: Vec::with_capacity(vertex_count),
        barycentric: Vec::with_capacity(vertex_count),
        normals: Vec::with_capacity(vertex_count),
        tangents: Vec::with_capacity(vertex_count),
        indices: (0..vertex_count as u32).collect(),
    };

    for triangle in &triangles {
        for (corner, uv) in triangle.corners.iter().zip(BARYCENTRIC) {
            mesh.positions.push(*corner);
            // Unit sphere: the normal is the position
            mesh.normals.push(corner.normalize());
            mesh.barycentric.push(uv);
            mesh.tangents.push(triangle.tangent);
        }
    }

    tracing::debug!(
        level,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "generated icosphere"
    );
    mesh
}
