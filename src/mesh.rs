//! Shared geometry tables for the ripple mesh.
//!
//! Every painting ripples the same base mesh. The mesh is a flat square in
//! painting-local units (`0..=PAINTING_SIZE` on both axes) whose interior
//! vertices are marked movable. A second table lists, for every vertex, the
//! triangles that touch it; it drives the averaged vertex normals.
//!
//! # Flat Table Formats
//!
//! Authored tables are stored as flat `i16` arrays:
//!
//! | Table | Layout |
//! |-------|--------|
//! | Mesh | `numVtx, (x, y, movable) * numVtx, numTris, (v0, v1, v2) * numTris` |
//! | Neighbors | `(count, tri0 .. triN) * numVtx` |
//!
//! # Example
//!
//! ```ignore
//! let tables = MeshTables::grid(8);
//! assert_eq!(tables.mesh.vertex_count(), 81);
//! ```

use crate::error::MeshError;
use crate::PAINTING_SIZE;

/// Most grid divisions whose triangles still fit `u16` indices.
pub const MAX_GRID_DIVISIONS: u16 = 181;

/// Triangle indices are stored as `u16`.
pub const MAX_TRIANGLES: usize = u16::MAX as usize + 1;

/// One vertex of the base mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshVertex {
    /// Local x, `0..=PAINTING_SIZE`.
    pub x: i16,
    /// Local y, `0..=PAINTING_SIZE`.
    pub y: i16,
    /// Whether the ripple may displace this vertex.
    /// Frame-edge vertices are immovable so the painting stays flush with the wall.
    pub movable: bool,
}

impl MeshVertex {
    pub fn new(x: i16, y: i16, movable: bool) -> Self {
        Self { x, y, movable }
    }
}

/// The base mesh: vertex positions plus triangle indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseMesh {
    vertices: Vec<MeshVertex>,
    triangles: Vec<[u16; 3]>,
}

impl BaseMesh {
    /// Create a mesh from vertices and triangles, checking every index.
    pub fn new(vertices: Vec<MeshVertex>, triangles: Vec<[u16; 3]>) -> Result<Self, MeshError> {
        if triangles.len() > MAX_TRIANGLES {
            return Err(MeshError::TooManyTriangles { count: triangles.len(), max: MAX_TRIANGLES });
        }
        for (t, tri) in triangles.iter().enumerate() {
            for &v in tri {
                if v as usize >= vertices.len() {
                    return Err(MeshError::VertexOutOfRange {
                        triangle: t,
                        vertex: v as usize,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }
        Ok(Self { vertices, triangles })
    }

    /// Parse the flat authored mesh table.
    pub fn from_raw(raw: &[i16]) -> Result<Self, MeshError> {
        let mut reader = RawReader::new("mesh", raw);

        let num_vtx = reader.count()?;
        let mut vertices = Vec::with_capacity(num_vtx);
        for _ in 0..num_vtx {
            let [x, y, movable] = reader.triple()?;
            vertices.push(MeshVertex::new(x, y, movable != 0));
        }

        let num_tris = reader.count()?;
        let mut triangles = Vec::with_capacity(num_tris);
        for _ in 0..num_tris {
            let start = reader.position();
            let [v0, v1, v2] = reader.triple()?;
            if v0 < 0 || v1 < 0 || v2 < 0 {
                return Err(MeshError::NegativeEntry { table: "mesh", position: start });
            }
            triangles.push([v0 as u16, v1 as u16, v2 as u16]);
        }
        reader.finish()?;

        Self::new(vertices, triangles)
    }

    /// Generate a regular grid spanning the full painting face.
    ///
    /// `divisions` cells per side, two triangles per cell, wound so that an
    /// undeformed mesh faces `+z`. Border vertices are immovable.
    /// `divisions` is clamped to `1..=MAX_GRID_DIVISIONS`.
    pub fn grid(divisions: u16) -> Self {
        let n = divisions.clamp(1, MAX_GRID_DIVISIONS) as usize;
        let size = PAINTING_SIZE as usize;
        let coord = |i: usize| ((i * size + n / 2) / n) as i16;

        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        for j in 0..=n {
            for i in 0..=n {
                let movable = i != 0 && j != 0 && i != n && j != n;
                vertices.push(MeshVertex::new(coord(i), coord(j), movable));
            }
        }

        let idx = |i: usize, j: usize| (j * (n + 1) + i) as u16;
        let mut triangles = Vec::with_capacity(n * n * 2);
        for j in 0..n {
            for i in 0..n {
                let v00 = idx(i, j);
                let v10 = idx(i + 1, j);
                let v01 = idx(i, j + 1);
                let v11 = idx(i + 1, j + 1);
                triangles.push([v00, v10, v11]);
                triangles.push([v00, v11, v01]);
            }
        }

        Self { vertices, triangles }
    }

    #[inline]
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u16; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Serialize back to the flat authored format.
    pub fn to_raw(&self) -> Vec<i16> {
        let mut raw = Vec::with_capacity(2 + self.vertices.len() * 3 + self.triangles.len() * 3);
        raw.push(self.vertices.len() as i16);
        for v in &self.vertices {
            raw.extend_from_slice(&[v.x, v.y, v.movable as i16]);
        }
        raw.push(self.triangles.len() as i16);
        for t in &self.triangles {
            raw.extend(t.iter().map(|&v| v as i16));
        }
        raw
    }
}

/// Per-vertex list of adjacent triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborTable {
    entries: Vec<Vec<u16>>,
}

impl NeighborTable {
    /// Derive the adjacency of every vertex from a mesh.
    pub fn from_mesh(mesh: &BaseMesh) -> Self {
        let mut entries = vec![Vec::new(); mesh.vertex_count()];
        for (t, tri) in mesh.triangles().iter().enumerate() {
            for &v in tri {
                let list = &mut entries[v as usize];
                if !list.contains(&(t as u16)) {
                    list.push(t as u16);
                }
            }
        }
        Self { entries }
    }

    /// Parse the flat authored neighbor table for a mesh with `vertex_count` vertices.
    pub fn from_raw(raw: &[i16], vertex_count: usize) -> Result<Self, MeshError> {
        let mut reader = RawReader::new("neighbor", raw);
        let mut entries = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            let count = reader.count()?;
            let mut tris = Vec::with_capacity(count);
            for _ in 0..count {
                let position = reader.position();
                let tri = reader.read()?;
                if tri < 0 {
                    return Err(MeshError::NegativeEntry { table: "neighbor", position });
                }
                tris.push(tri as u16);
            }
            entries.push(tris);
        }
        reader.finish()?;
        Ok(Self { entries })
    }

    /// Check this table against the mesh it will be used with.
    pub fn validate(&self, mesh: &BaseMesh) -> Result<(), MeshError> {
        if self.entries.len() != mesh.vertex_count() {
            return Err(MeshError::NeighborCountMismatch {
                vertices: mesh.vertex_count(),
                entries: self.entries.len(),
            });
        }
        for (v, tris) in self.entries.iter().enumerate() {
            if let Some(&bad) = tris.iter().find(|&&t| t as usize >= mesh.triangle_count()) {
                return Err(MeshError::TriangleOutOfRange {
                    vertex: v,
                    triangle: bad as usize,
                    triangle_count: mesh.triangle_count(),
                });
            }
        }
        Ok(())
    }

    /// Triangles adjacent to `vertex`.
    #[inline]
    pub fn neighbors(&self, vertex: usize) -> &[u16] {
        self.entries.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pair of tables every painting shares.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshTables {
    pub mesh: BaseMesh,
    pub neighbors: NeighborTable,
}

impl MeshTables {
    /// Pair a mesh with an authored neighbor table.
    pub fn new(mesh: BaseMesh, neighbors: NeighborTable) -> Result<Self, MeshError> {
        neighbors.validate(&mesh)?;
        Ok(Self { mesh, neighbors })
    }

    /// Pair a mesh with its derived neighbor table.
    pub fn from_mesh(mesh: BaseMesh) -> Self {
        let neighbors = NeighborTable::from_mesh(&mesh);
        Self { mesh, neighbors }
    }

    /// A grid mesh and its adjacency.
    pub fn grid(divisions: u16) -> Self {
        Self::from_mesh(BaseMesh::grid(divisions))
    }
}

/// Cursor over a flat `i16` table.
pub(crate) struct RawReader<'a> {
    table: &'static str,
    raw: &'a [i16],
    pos: usize,
}

impl<'a> RawReader<'a> {
    pub(crate) fn new(table: &'static str, raw: &'a [i16]) -> Self {
        Self { table, raw, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn read(&mut self) -> Result<i16, MeshError> {
        let value = *self.raw.get(self.pos).ok_or(MeshError::Truncated {
            table: self.table,
            expected: self.pos + 1,
            found: self.raw.len(),
        })?;
        self.pos += 1;
        Ok(value)
    }

    pub(crate) fn count(&mut self) -> Result<usize, MeshError> {
        let position = self.pos;
        let value = self.read()?;
        if value < 0 {
            return Err(MeshError::NegativeEntry { table: self.table, position });
        }
        Ok(value as usize)
    }

    pub(crate) fn triple(&mut self) -> Result<[i16; 3], MeshError> {
        Ok([self.read()?, self.read()?, self.read()?])
    }

    pub(crate) fn finish(self) -> Result<(), MeshError> {
        let extra = self.raw.len() - self.pos;
        if extra > 0 {
            return Err(MeshError::TrailingData { table: self.table, extra });
        }
        Ok(())
    }
}
