//! Reusable conversion buffers for draw lists

use std::ops::Range;

use glam::Vec2;
use imbridge_core::{Color32, DrawList};

use crate::backend::TriangleMesh;

/// Offset applied to every vertex so triangle edges land on pixel centers
pub const PIXEL_CENTER_OFFSET: Vec2 = Vec2::splat(0.5);

/// Capacity needed to hold `required` elements given `current` capacity.
///
/// Never shrinks; when growing, rounds up to the next power of two.
pub fn grown_capacity(current: usize, required: usize) -> usize {
    if required <= current {
        current
    } else {
        required.next_power_of_two()
    }
}

/// Host-format copies of one draw list's vertex and index buffers.
///
/// The backing arrays only ever grow, so steady-state frames allocate
/// nothing.
#[derive(Debug, Default)]
pub struct StagingBuffers {
    positions: Vec<Vec2>,
    uvs: Vec<Vec2>,
    colors: Vec<Color32>,
    indices: Vec<u16>,
    vertex_count: usize,
    index_count: usize,
}

impl StagingBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_capacity(&self) -> usize {
        self.positions.len()
    }

    pub fn index_capacity(&self) -> usize {
        self.indices.len()
    }

    /// Vertices loaded from the current list
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Indices loaded from the current list
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Make room for `vertices` and `indices` elements
    pub fn reserve(&mut self, vertices: usize, indices: usize) {
        let vertex_capacity = grown_capacity(self.positions.len(), vertices);
        if vertex_capacity != self.positions.len() {
            self.positions.resize(vertex_capacity, Vec2::ZERO);
            self.uvs.resize(vertex_capacity, Vec2::ZERO);
            self.colors.resize(vertex_capacity, Color32::TRANSPARENT);
        }

        let index_capacity = grown_capacity(self.indices.len(), indices);
        if index_capacity != self.indices.len() {
            self.indices.resize(index_capacity, 0);
        }
    }

    /// Convert `list` into host vertex format, replacing the previous list
    pub fn load(&mut self, list: &DrawList) {
        let vertex_count = list.vtx_buffer.len();
        let index_count = list.idx_buffer.len();
        self.reserve(vertex_count, index_count);

        for (i, vert) in list.vtx_buffer.iter().enumerate() {
            self.positions[i] = Vec2::from_array(vert.pos) + PIXEL_CENTER_OFFSET;
            self.uvs[i] = Vec2::from_array(vert.uv);
            self.colors[i] = Color32::from_packed(vert.col);
        }
        self.indices[..index_count].copy_from_slice(&list.idx_buffer);

        self.vertex_count = vertex_count;
        self.index_count = index_count;
    }

    /// Triangles for one draw command: indices `idx` of the loaded list,
    /// relative to vertex `vtx_offset`. `None` if either range falls outside
    /// the loaded list.
    pub fn mesh(&self, vtx_offset: usize, idx: Range<usize>) -> Option<TriangleMesh<'_>> {
        if vtx_offset > self.vertex_count || idx.start > idx.end || idx.end > self.index_count {
            return None;
        }
        let vertices = vtx_offset..self.vertex_count;
        Some(TriangleMesh {
            positions: &self.positions[vertices.clone()],
            uvs: &self.uvs[vertices.clone()],
            colors: &self.colors[vertices],
            indices: &self.indices[idx],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imbridge_core::DrawVert;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_growth_rounds_to_power_of_two() {
        assert_eq!(grown_capacity(256, 300), 512);
        assert_eq!(grown_capacity(0, 1), 1);
        assert_eq!(grown_capacity(512, 300), 512);
        assert_eq!(grown_capacity(0, 0), 0);
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut staging = StagingBuffers::new();
        staging.reserve(256, 256);
        assert_eq!(staging.vertex_capacity(), 256);

        staging.reserve(300, 10);
        assert_eq!(staging.vertex_capacity(), 512);
        assert_eq!(staging.index_capacity(), 256);

        let mut small = DrawList::new();
        small.vtx_buffer.push(DrawVert::default());
        staging.load(&small);
        assert_eq!(staging.vertex_capacity(), 512);
        assert_eq!(staging.vertex_count(), 1);
    }

    #[test]
    fn test_load_offsets_positions_and_unpacks_colors() {
        let mut list = DrawList::new();
        list.vtx_buffer
            .push(DrawVert::new([10.0, 20.0], [0.25, 0.75], 0x8040_20FF));
        list.idx_buffer.extend_from_slice(&[0, 0, 0]);

        let mut staging = StagingBuffers::new();
        staging.load(&list);
        let mesh = staging.mesh(0, 0..3).unwrap();

        assert_eq!(mesh.positions[0], Vec2::new(10.5, 20.5));
        assert_eq!(mesh.uvs[0], Vec2::new(0.25, 0.75));
        assert_eq!(mesh.colors[0], Color32::rgba(0xFF, 0x20, 0x40, 0x80));
        assert_eq!(mesh.indices, &[0, 0, 0]);
    }

    #[test]
    fn test_mesh_rejects_out_of_range() {
        let mut list = DrawList::new();
        list.vtx_buffer.resize(4, DrawVert::default());
        list.idx_buffer.extend_from_slice(&[0, 1, 2, 0, 2, 3]);

        let mut staging = StagingBuffers::new();
        staging.load(&list);

        assert!(staging.mesh(0, 0..6).is_some());
        assert_eq!(staging.mesh(2, 3..6).map(|m| m.vertex_count()), Some(2));
        assert!(staging.mesh(0, 3..9).is_none());
        assert!(staging.mesh(5, 0..3).is_none());
    }
}
