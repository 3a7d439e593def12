//! Draw data produced by the GUI library once per frame

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::texture::{TextureData, TextureId};
use crate::types::ClipRect;

/// One vertex in the GUI library's layout
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    /// Packed little-endian RGBA
    pub col: u32,
}

impl DrawVert {
    pub fn new(pos: [f32; 2], uv: [f32; 2], col: u32) -> Self {
        Self { pos, uv, col }
    }
}

/// Callback invoked in place of geometry for a draw command
pub type DrawCallback = Arc<dyn Fn(&DrawList, &DrawCmd) + Send + Sync>;

/// A single draw command within a draw list
#[derive(Clone, Default)]
pub struct DrawCmd {
    /// Clip rectangle in display coordinates
    pub clip_rect: ClipRect,
    pub texture_id: Option<TextureId>,
    /// Start offset in the vertex buffer; indices are relative to it
    pub vtx_offset: u32,
    /// Start offset in the index buffer
    pub idx_offset: u32,
    /// Number of indices (multiple of 3)
    pub elem_count: u32,
    pub user_callback: Option<DrawCallback>,
}

impl fmt::Debug for DrawCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCmd")
            .field("clip_rect", &self.clip_rect)
            .field("texture_id", &self.texture_id)
            .field("vtx_offset", &self.vtx_offset)
            .field("idx_offset", &self.idx_offset)
            .field("elem_count", &self.elem_count)
            .field("user_callback", &self.user_callback.is_some())
            .finish()
    }
}

/// An ordered batch of geometry for one UI layer
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vtx_buffer: Vec<DrawVert>,
    pub idx_buffer: Vec<u16>,
    pub cmd_buffer: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an axis-aligned textured quad as its own command
    pub fn add_rect(
        &mut self,
        min: Vec2,
        max: Vec2,
        col: u32,
        texture_id: Option<TextureId>,
        clip_rect: ClipRect,
    ) {
        let vtx_offset = self.vtx_buffer.len() as u32;
        let idx_offset = self.idx_buffer.len() as u32;
        self.vtx_buffer.extend_from_slice(&[
            DrawVert::new([min.x, min.y], [0.0, 0.0], col),
            DrawVert::new([max.x, min.y], [1.0, 0.0], col),
            DrawVert::new([max.x, max.y], [1.0, 1.0], col),
            DrawVert::new([min.x, max.y], [0.0, 1.0], col),
        ]);
        self.idx_buffer.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        self.cmd_buffer.push(DrawCmd {
            clip_rect,
            texture_id,
            vtx_offset,
            idx_offset,
            elem_count: 6,
            user_callback: None,
        });
    }

    /// Append a command that runs `callback` instead of drawing
    pub fn add_callback(&mut self, callback: DrawCallback) {
        self.cmd_buffer.push(DrawCmd {
            idx_offset: self.idx_buffer.len() as u32,
            vtx_offset: self.vtx_buffer.len() as u32,
            user_callback: Some(callback),
            ..Default::default()
        });
    }
}

/// Everything the GUI library produced for one frame
#[derive(Debug, Clone)]
pub struct DrawData {
    /// Top-left of the displayed area
    pub display_pos: Vec2,
    pub display_size: Vec2,
    /// Framebuffer pixels per display unit
    pub framebuffer_scale: Vec2,
    pub draw_lists: Vec<DrawList>,
    /// Textures the GUI library wants the backend to act on
    pub textures: Vec<TextureData>,
}

impl Default for DrawData {
    fn default() -> Self {
        Self {
            display_pos: Vec2::ZERO,
            display_size: Vec2::ZERO,
            framebuffer_scale: Vec2::ONE,
            draw_lists: Vec::new(),
            textures: Vec::new(),
        }
    }
}

impl DrawData {
    pub fn total_vtx_count(&self) -> usize {
        self.draw_lists.iter().map(|l| l.vtx_buffer.len()).sum()
    }

    pub fn total_idx_count(&self) -> usize {
        self.draw_lists.iter().map(|l| l.idx_buffer.len()).sum()
    }
}
