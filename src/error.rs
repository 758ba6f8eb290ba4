//! Error types for ripplepaint.
//!
//! This module provides error types for loading geometry tables, texture
//! images and level configurations. The per-frame simulation and render
//! paths never fail; only authoring data is validated.

use std::fmt;

/// Errors that can occur when parsing or validating geometry tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The flat table ended before the declared number of entries.
    Truncated {
        /// Which table was being read.
        table: &'static str,
        /// Number of entries the table needed.
        expected: usize,
        /// Number of entries actually present.
        found: usize,
    },
    /// A count or index field was negative.
    NegativeEntry {
        table: &'static str,
        position: usize,
    },
    /// A triangle referenced a vertex that does not exist.
    VertexOutOfRange { triangle: usize, vertex: usize, vertex_count: usize },
    /// A neighbor entry referenced a triangle that does not exist.
    TriangleOutOfRange { vertex: usize, triangle: usize, triangle_count: usize },
    /// A texture map entry referenced a mesh vertex or mapping that does not exist.
    MappingOutOfRange { index: usize, limit: usize },
    /// The neighbor table has a different number of entries than the mesh has vertices.
    NeighborCountMismatch { vertices: usize, entries: usize },
    /// Trailing data after the last declared entry.
    TrailingData { table: &'static str, extra: usize },
    /// More triangles than `u16` indices can address.
    TooManyTriangles { count: usize, max: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Truncated { table, expected, found } => write!(
                f,
                "{} table truncated: expected {} entries, found {}",
                table, expected, found
            ),
            MeshError::NegativeEntry { table, position } => {
                write!(f, "{} table has a negative count or index at position {}", table, position)
            }
            MeshError::VertexOutOfRange { triangle, vertex, vertex_count } => write!(
                f,
                "triangle {} references vertex {} but the mesh has {} vertices",
                triangle, vertex, vertex_count
            ),
            MeshError::TriangleOutOfRange { vertex, triangle, triangle_count } => write!(
                f,
                "vertex {} lists neighbor triangle {} but the mesh has {} triangles",
                vertex, triangle, triangle_count
            ),
            MeshError::MappingOutOfRange { index, limit } => {
                write!(f, "texture map index {} out of range (limit {})", index, limit)
            }
            MeshError::NeighborCountMismatch { vertices, entries } => write!(
                f,
                "neighbor table has {} entries but the mesh has {} vertices",
                entries, vertices
            ),
            MeshError::TrailingData { table, extra } => {
                write!(f, "{} table has {} trailing entries", table, extra)
            }
            MeshError::TooManyTriangles { count, max } => {
                write!(f, "mesh has {} triangles, at most {} are addressable", count, max)
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// Errors that can occur during texture loading.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode image file.
    ImageLoad(image::ImageError),
    /// Failed to read file from disk.
    Io(std::io::Error),
    /// Raw RGBA data does not match the declared dimensions.
    SizeMismatch { width: u32, height: u32, len: usize },
    /// A dimension is zero or exceeds [`crate::textures::MAX_TEXTURE_DIMENSION`].
    BadDimensions { width: u32, height: u32 },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "Failed to load image: {}", e),
            TextureError::Io(e) => write!(f, "Failed to read texture file: {}", e),
            TextureError::SizeMismatch { width, height, len } => write!(
                f,
                "RGBA data of {} bytes does not match a {}x{} texture",
                len, width, height
            ),
            TextureError::BadDimensions { width, height } => {
                write!(f, "Unsupported texture size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Io(e) => Some(e),
            TextureError::SizeMismatch { .. } | TextureError::BadDimensions { .. } => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

/// Errors that can occur when loading or building a level configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    Io(std::io::Error),
    /// The configuration is not valid JSON for the expected schema.
    Json(serde_json::Error),
    /// A texture referenced by a painting could not be loaded.
    Texture(TextureError),
    /// A geometry or texture-map table is malformed.
    Mesh(MeshError),
    /// The configuration parsed but describes an impossible painting.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access level config: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse level config: {}", e),
            ConfigError::Texture(e) => write!(f, "Texture error: {}", e),
            ConfigError::Mesh(e) => write!(f, "Mesh error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid level config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Texture(e) => Some(e),
            ConfigError::Mesh(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<TextureError> for ConfigError {
    fn from(e: TextureError) -> Self {
        ConfigError::Texture(e)
    }
}

impl From<MeshError> for ConfigError {
    fn from(e: MeshError) -> Self {
        ConfigError::Mesh(e)
    }
}
