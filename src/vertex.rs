//! GPU vertex records uploaded by the rippling render path.

use bytemuck::{Pod, Zeroable};

use crate::deform::RippleVertex;
use crate::textures::TexMapping;

/// Number of vertices the upload buffer holds.
pub const VERTEX_BUFFER_SIZE: usize = 16;

/// Triangles drawn per full upload (15 of the 16 slots are used).
pub const TRIS_PER_GROUP: usize = VERTEX_BUFFER_SIZE / 3;

/// A textured, lit vertex: 16 bytes, laid out for direct upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PaintingVertex {
    pub pos: [i16; 3],
    pub flag: u16,
    /// Texture coordinate, 10.5 fixed point.
    pub tc: [i16; 2],
    pub normal: [i8; 3],
    pub alpha: u8,
}

impl PaintingVertex {
    /// Combine a ripple-mesh vertex with its texture mapping.
    pub fn new(vertex: &RippleVertex, mapping: &TexMapping, alpha: u8) -> Self {
        Self {
            pos: vertex.pos,
            flag: 0,
            tc: [mapping.s, mapping.t],
            normal: vertex.norm,
            alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<PaintingVertex>(), 16);
        assert_eq!(TRIS_PER_GROUP, 5);
    }

    #[test]
    fn test_vertex_bytes() {
        let v = PaintingVertex::new(
            &RippleVertex { pos: [1, 2, 3], norm: [0, 0, 127] },
            &TexMapping { mesh_vertex: 0, s: 32, t: 64 },
            0xFF,
        );
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[12..16], &[0, 0, 127, 0xFF]);
    }
}
