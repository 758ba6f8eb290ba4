//! Mesh deformation: the base mesh displaced by the ripple field.
//!
//! Runs once per frame, and only for a painting that is currently rippling.
//! Idle paintings draw their static display list and never touch the mesh.

use glam::Vec2;

use crate::field::ripple_at_point;
use crate::mesh::BaseMesh;
use crate::painting::Painting;

/// A vertex of the generated ripple mesh.
///
/// Regenerated from scratch every frame; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RippleVertex {
    pub pos: [i16; 3],
    /// Quantized unit normal, filled in by [`crate::normals`].
    pub norm: [i8; 3],
}

/// Displacement of one base-mesh vertex.
///
/// Immovable vertices, and movable ones the wave has not reached, stay at zero.
#[inline]
pub fn ripple_if_movable(painting: &Painting, movable: bool, x: i16, y: i16) -> i16 {
    if !movable {
        return 0;
    }
    ripple_at_point(
        &painting.ripple.current,
        painting.ripple_timer,
        painting.ripple_origin,
        Vec2::new(x as f32, y as f32),
        painting.size,
    )
    .unwrap_or(0)
}

/// Build a fresh ripple mesh for `painting`.
///
/// The result has the same length and order as the base mesh. `x` and `y`
/// are copied unchanged; `z` is the ripple displacement. Normals are zero
/// until [`crate::normals::reconstruct_normals`] runs.
pub fn generate_mesh(painting: &Painting, mesh: &BaseMesh) -> Vec<RippleVertex> {
    mesh.vertices()
        .iter()
        .map(|v| RippleVertex {
            pos: [v.x, v.y, ripple_if_movable(painting, v.movable, v.x, v.y)],
            norm: [0; 3],
        })
        .collect()
}
