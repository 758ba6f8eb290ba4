//! Normal reconstruction for Gouraud lighting of the ripple mesh.
//!
//! Two passes over the shared tables:
//!
//! 1. Face normals: `(v1 - v0) × (v2 - v1)` for every triangle, unnormalized.
//! 2. Vertex normals: the mean of the face normals of every adjacent triangle,
//!    normalized and quantized to signed bytes.
//!
//! Where adjacent triangles cancel out (possible at the wave front) the
//! averaged vector has zero length and the vertex gets the zero normal.

use glam::Vec3;

use crate::deform::RippleVertex;
use crate::mesh::{BaseMesh, NeighborTable};

/// Quantize one unit-normal component to a signed byte.
///
/// Positive components scale by 127 and negative ones by 128, each rounded
/// away from zero and then truncated, so the full `i8` range is used.
/// Exactly zero stays zero.
#[inline]
pub fn normalize_component(comp: f32) -> i8 {
    if comp > 0.0 {
        (comp * 127.0 + 0.5) as i8
    } else if comp < 0.0 {
        (comp * 128.0 - 0.5) as i8
    } else {
        0
    }
}

/// Surface normal of every triangle in the deformed mesh.
///
/// A triangle naming a vertex missing from `verts` gets the zero normal.
pub fn triangle_normals(mesh: &BaseMesh, verts: &[RippleVertex]) -> Vec<Vec3> {
    let position = |i: u16| {
        verts
            .get(i as usize)
            .map(|v| Vec3::new(v.pos[0] as f32, v.pos[1] as f32, v.pos[2] as f32))
    };

    mesh.triangles()
        .iter()
        .map(|&[v0, v1, v2]| match (position(v0), position(v1), position(v2)) {
            (Some(p0), Some(p1), Some(p2)) => (p1 - p0).cross(p2 - p1),
            _ => Vec3::ZERO,
        })
        .collect()
}

/// Average the neighbor face normals of every vertex into `verts[i].norm`.
pub fn average_vertex_normals(neighbors: &NeighborTable, tri_norms: &[Vec3], verts: &mut [RippleVertex]) {
    for (i, vertex) in verts.iter_mut().enumerate() {
        let tris = neighbors.neighbors(i);
        if tris.is_empty() {
            vertex.norm = [0; 3];
            continue;
        }

        let sum: Vec3 = tris.iter().filter_map(|&t| tri_norms.get(t as usize)).copied().sum();
        let avg = sum / tris.len() as f32;
        let len = avg.length();

        vertex.norm = if len == 0.0 {
            [0; 3]
        } else {
            let n = avg / len;
            [normalize_component(n.x), normalize_component(n.y), normalize_component(n.z)]
        };
    }
}

/// Run both passes, writing quantized normals into `verts`.
///
/// `verts` must come from [`crate::deform::generate_mesh`] on the same mesh
/// the neighbor table was validated against.
pub fn reconstruct_normals(mesh: &BaseMesh, neighbors: &NeighborTable, verts: &mut [RippleVertex]) {
    let tri_norms = triangle_normals(mesh, verts);
    average_vertex_normals(neighbors, &tri_norms, verts);
}
