//! Painting textures and the tables that map them onto the ripple mesh.
//!
//! A painting shows one or more images. Each image comes with a
//! [`TextureMap`] that says which mesh triangles it covers and which texture
//! coordinate every covered vertex uses. Castle paintings typically split
//! the face into a top and a bottom image.
//!
//! # Texture Kinds
//!
//! - [`TextureKind::Image`]: one or more flat images, one map per image
//! - [`TextureKind::EnvMap`]: a single environment-mapped image
//!
//! # Flat Map Format
//!
//! `numMaps, (meshVtx, s, t) * numMaps, numTris, (m0, m1, m2) * numTris`
//!
//! where each `m` indexes the mapping list. Texture coordinates are in
//! 10.5 fixed point (one texel = 32).
//!
//! # Example
//!
//! ```ignore
//! let tables = MeshTables::grid(8);
//! let maps = TextureMap::planar_bands(&tables.mesh, 2, 64, 32);
//! let top = TextureImage::from_file("assets/bob_top.png")?;
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, TextureError};
use crate::mesh::{BaseMesh, RawReader};
use crate::PAINTING_SIZE;

/// How a painting's texture is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    /// One or more flat images.
    #[default]
    Image,
    /// A single environment-mapped image.
    EnvMap,
}

/// Largest accepted texture edge, in texels.
pub const MAX_TEXTURE_DIMENSION: u32 = 4096;

/// An RGBA image shown on a painting.
///
/// The engine itself only reads the dimensions, which go into
/// [`Command::LoadBlockTexture`](crate::Command::LoadBlockTexture). The host
/// uploads `data` for the referenced image index when it executes that command.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    /// Raw RGBA pixel data (width * height * 4 bytes), for the host to upload.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureImage {
    /// Byte length of a `width` x `height` RGBA image.
    pub fn byte_len(width: u32, height: u32) -> Result<usize, TextureError> {
        let in_range = |d: u32| (1..=MAX_TEXTURE_DIMENSION).contains(&d);
        if !in_range(width) || !in_range(height) {
            return Err(TextureError::BadDimensions { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|texels| texels.checked_mul(4))
            .ok_or(TextureError::BadDimensions { width, height })
    }

    /// Create an image from raw RGBA data.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        if data.len() != Self::byte_len(width, height)? {
            return Err(TextureError::SizeMismatch { width, height, len: data.len() });
        }
        Ok(Self { data, width, height })
    }

    /// Load an image file (PNG or JPEG).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path.as_ref())?;
        let img = image::load_from_memory(&bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// A single-color image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, TextureError> {
        let len = Self::byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self { data, width, height })
    }

    /// A two-color checkerboard, handy for seeing the ripple in demos.
    pub fn checkerboard(
        width: u32,
        height: u32,
        cell_size: u32,
        color1: [u8; 4],
        color2: [u8; 4],
    ) -> Result<Self, TextureError> {
        let cell_size = cell_size.max(1);
        let mut data = Vec::with_capacity(Self::byte_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                let color = if (x / cell_size + y / cell_size) % 2 == 0 { color1 } else { color2 };
                data.extend_from_slice(&color);
            }
        }
        Ok(Self { data, width, height })
    }
}

/// One texture-map entry: a mesh vertex and its texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexMapping {
    pub mesh_vertex: u16,
    pub s: i16,
    pub t: i16,
}

/// Maps one image onto a subset of the mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureMap {
    /// Vertex mappings. Shared vertices may appear more than once.
    pub mappings: Vec<TexMapping>,
    /// Triangles as triples of indices into `mappings`.
    pub triangles: Vec<[u16; 3]>,
}

impl TextureMap {
    /// Parse a flat authored texture map.
    pub fn from_raw(raw: &[i16]) -> Result<Self, MeshError> {
        let mut reader = RawReader::new("texture map", raw);

        let num_maps = reader.count()?;
        let mut mappings = Vec::with_capacity(num_maps);
        for _ in 0..num_maps {
            let position = reader.position();
            let [vtx, s, t] = reader.triple()?;
            if vtx < 0 {
                return Err(MeshError::NegativeEntry { table: "texture map", position });
            }
            mappings.push(TexMapping { mesh_vertex: vtx as u16, s, t });
        }

        let num_tris = reader.count()?;
        let mut triangles = Vec::with_capacity(num_tris);
        for _ in 0..num_tris {
            let position = reader.position();
            let [m0, m1, m2] = reader.triple()?;
            if m0 < 0 || m1 < 0 || m2 < 0 {
                return Err(MeshError::NegativeEntry { table: "texture map", position });
            }
            triangles.push([m0 as u16, m1 as u16, m2 as u16]);
        }
        reader.finish()?;

        let map = Self { mappings, triangles };
        map.check_mappings()?;
        Ok(map)
    }

    fn check_mappings(&self) -> Result<(), MeshError> {
        let limit = self.mappings.len();
        for tri in &self.triangles {
            if let Some(&bad) = tri.iter().find(|&&m| m as usize >= limit) {
                return Err(MeshError::MappingOutOfRange { index: bad as usize, limit });
            }
        }
        Ok(())
    }

    /// Check every index against `mesh`.
    pub fn validate(&self, mesh: &BaseMesh) -> Result<(), MeshError> {
        self.check_mappings()?;
        let limit = mesh.vertex_count();
        if let Some(bad) = self.mappings.iter().find(|m| m.mesh_vertex as usize >= limit) {
            return Err(MeshError::MappingOutOfRange { index: bad.mesh_vertex as usize, limit });
        }
        Ok(())
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Split the mesh into `images` horizontal bands, one map per band.
    ///
    /// Band 0 is the bottom of the painting. A triangle belongs to the band
    /// containing its centroid. Texture `t` runs top-down inside each band.
    pub fn planar_bands(mesh: &BaseMesh, images: usize, width: u32, height: u32) -> Vec<TextureMap> {
        let images = images.max(1);
        let band_height = PAINTING_SIZE / images as f32;
        let mut maps = vec![TextureMap::default(); images];
        let mut lookup: Vec<HashMap<u16, u16>> = vec![HashMap::new(); images];

        for tri in mesh.triangles() {
            let centroid_y =
                tri.iter().map(|&v| mesh.vertices()[v as usize].y as f32).sum::<f32>() / 3.0;
            let band = ((centroid_y / band_height) as usize).min(images - 1);
            let band_top = (band + 1) as f32 * band_height;

            let mut mapped = [0u16; 3];
            for (slot, &v) in mapped.iter_mut().zip(tri) {
                let next = maps[band].mappings.len() as u16;
                *slot = *lookup[band].entry(v).or_insert_with(|| {
                    let vertex = mesh.vertices()[v as usize];
                    let s = vertex.x as f32 / PAINTING_SIZE * width as f32 * 32.0;
                    let t = (band_top - vertex.y as f32) / band_height * height as f32 * 32.0;
                    maps[band].mappings.push(TexMapping {
                        mesh_vertex: v,
                        s: s.round() as i16,
                        t: t.round() as i16,
                    });
                    next
                });
            }
            maps[band].triangles.push(mapped);
        }

        maps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_size_check() {
        assert!(TextureImage::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            TextureImage::from_rgba(vec![0; 15], 2, 2),
            Err(TextureError::SizeMismatch { width: 2, height: 2, len: 15 })
        ));
    }

    #[test]
    fn test_solid_and_checkerboard() {
        let red = TextureImage::solid(2, 3, [255, 0, 0, 255]).unwrap();
        assert_eq!(red.data.len(), 24);
        assert_eq!(&red.data[20..24], &[255, 0, 0, 255]);

        let checker = TextureImage::checkerboard(4, 4, 2, [255; 4], [0, 0, 0, 255]).unwrap();
        assert_eq!(&checker.data[0..4], &[255; 4]);
        assert_eq!(&checker.data[8..12], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_oversized_textures_are_errors() {
        assert!(matches!(
            TextureImage::solid(40000, 40000, [0; 4]),
            Err(TextureError::BadDimensions { width: 40000, height: 40000 })
        ));
        assert!(matches!(
            TextureImage::checkerboard(u32::MAX, 2, 1, [0; 4], [255; 4]),
            Err(TextureError::BadDimensions { .. })
        ));
        assert!(matches!(TextureImage::solid(0, 8, [0; 4]), Err(TextureError::BadDimensions { .. })));
        assert!(matches!(
            TextureImage::from_rgba(Vec::new(), 65536, 65536),
            Err(TextureError::BadDimensions { width: 65536, height: 65536 })
        ));
        assert_eq!(TextureImage::byte_len(MAX_TEXTURE_DIMENSION, MAX_TEXTURE_DIMENSION).unwrap(), 4096 * 4096 * 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TextureImage::from_file("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
    }

    #[test]
    fn test_from_raw() {
        let raw = [3, 0, 0, 0, 1, 32, 0, 2, 0, 32, 1, 0, 1, 2];
        let map = TextureMap::from_raw(&raw).unwrap();
        assert_eq!(map.mappings.len(), 3);
        assert_eq!(map.mappings[1], TexMapping { mesh_vertex: 1, s: 32, t: 0 });
        assert_eq!(map.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_from_raw_rejects_bad_mapping() {
        let raw = [1, 0, 0, 0, 1, 0, 0, 3];
        assert_eq!(
            TextureMap::from_raw(&raw),
            Err(MeshError::MappingOutOfRange { index: 3, limit: 1 })
        );
    }

    #[test]
    fn test_validate_against_mesh() {
        let mesh = BaseMesh::grid(1);
        let good = TextureMap::from_raw(&[3, 0, 0, 0, 1, 0, 0, 3, 0, 0, 1, 0, 1, 2]).unwrap();
        assert!(good.validate(&mesh).is_ok());
        let bad = TextureMap::from_raw(&[3, 0, 0, 0, 1, 0, 0, 9, 0, 0, 1, 0, 1, 2]).unwrap();
        assert_eq!(bad.validate(&mesh), Err(MeshError::MappingOutOfRange { index: 9, limit: 4 }));
    }

    #[test]
    fn test_planar_single_band_covers_mesh() {
        let mesh = BaseMesh::grid(4);
        let maps = TextureMap::planar_bands(&mesh, 1, 64, 64);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].triangle_count(), mesh.triangle_count());
        assert_eq!(maps[0].mappings.len(), mesh.vertex_count());
        assert!(maps[0].validate(&mesh).is_ok());
    }

    #[test]
    fn test_planar_two_bands_split_triangles() {
        let mesh = BaseMesh::grid(4);
        let maps = TextureMap::planar_bands(&mesh, 2, 64, 32);
        assert_eq!(maps[0].triangle_count(), 16);
        assert_eq!(maps[1].triangle_count(), 16);
        // the middle row of vertices is mapped by both bands
        assert_eq!(maps[0].mappings.len(), 15);
        assert_eq!(maps[1].mappings.len(), 15);

        let top_left = maps[1]
            .mappings
            .iter()
            .find(|m| mesh.vertices()[m.mesh_vertex as usize] == crate::mesh::MeshVertex::new(0, 614, false))
            .unwrap();
        assert_eq!((top_left.s, top_left.t), (0, 0));
        let bottom_right = maps[0]
            .mappings
            .iter()
            .find(|m| mesh.vertices()[m.mesh_vertex as usize] == crate::mesh::MeshVertex::new(614, 0, false))
            .unwrap();
        assert_eq!((bottom_right.s, bottom_right.t), (64 * 32, 32 * 32));
    }
}
