//! The parsed OBJ aggregate.

use crate::buffer::{BufferF32, BufferU32};

/// Floats per position.
pub const POSITION_COMPONENTS: usize = 3;
/// Floats per texture coordinate.
pub const TEXCOORD_COMPONENTS: usize = 2;
/// Floats per normal.
pub const NORMAL_COMPONENTS: usize = 3;
/// Indices per triangle corner: position, texcoord, normal.
pub const CORNER_INDICES: usize = 3;
/// Indices per triangle.
pub const TRIANGLE_INDICES: usize = 3 * CORNER_INDICES;

/// One triangle corner, as zero-based attribute indices.
///
/// Attributes absent from the face record are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Corner {
    /// Index into positions.
    pub position: u32,
    /// Index into texture coordinates.
    pub texcoord: u32,
    /// Index into normals.
    pub normal: u32,
}

impl Corner {
    fn from_slice(indices: &[u32]) -> Self {
        Self {
            position: indices[0],
            texcoord: indices[1],
            normal: indices[2],
        }
    }
}

/// Attribute streams and triangle list decoded from OBJ text.
///
/// The attribute buffers are tightly packed (`[x, y, z, x, y, z, ...]`) and
/// are not interleaved. `triangles` holds 9 indices per triangle: three
/// corners of (position, texcoord, normal). Building GPU vertex layouts from
/// these streams is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    /// Positions, 3 floats each.
    pub positions: BufferF32,
    /// Texture coordinates, 2 floats each.
    pub texcoords: BufferF32,
    /// Normals, 3 floats each.
    pub normals: BufferF32,
    /// Triangle corner indices, 9 per triangle.
    pub triangles: BufferU32,
}

impl ObjMesh {
    /// Number of complete positions.
    pub fn position_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    /// Number of complete texture coordinates.
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / TEXCOORD_COMPONENTS
    }

    /// Number of complete normals.
    pub fn normal_count(&self) -> usize {
        self.normals.len() / NORMAL_COMPONENTS
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / TRIANGLE_INDICES
    }

    /// Get the corners of triangle `index`.
    pub fn triangle(&self, index: usize) -> Option<[Corner; 3]> {
        let start = index.checked_mul(TRIANGLE_INDICES)?;
        let end = start.checked_add(TRIANGLE_INDICES)?;
        let indices = self.triangles.get(start..end)?;
        Some([
            Corner::from_slice(&indices[0..3]),
            Corner::from_slice(&indices[3..6]),
            Corner::from_slice(&indices[6..9]),
        ])
    }

    /// Iterate over all triangles.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [Corner; 3]> + '_ {
        (0..self.triangle_count()).filter_map(|i| self.triangle(i))
    }

    /// Check whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Release all buffers.
    pub fn free(&mut self) {
        self.positions.free();
        self.texcoords.free();
        self.normals.free();
        self.triangles.free();
    }

    /// Split into `(positions, texcoords, normals, triangles)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<f32>, Vec<u32>) {
        (
            self.positions.into_vec(),
            self.texcoords.into_vec(),
            self.normals.into_vec(),
            self.triangles.into_vec(),
        )
    }
}
