//! Host renderer seams
//!
//! The bridge never talks to a graphics API directly. It creates and uploads
//! textures through [`TextureBackend`] and emits scissored, textured triangle
//! lists through [`Render2D`]. Two implementations ship with the crate: a
//! [`CommandRecorder`] that records everything it is asked to do, and a
//! [`WgpuBackend`] that renders with wgpu.

use anyhow::Result;
use glam::Vec2;
use imbridge_core::{Color32, Rect, TextureRect};

pub mod commands;
pub mod wgpu;

pub use commands::{CommandRecorder, RecordedTexture, RenderCommand};
pub use wgpu::{WgpuBackend, WgpuTarget, WgpuTexture};

/// Host pixel format every bridge texture is created in
pub const HOST_BYTES_PER_PIXEL: usize = 4;

/// A GPU texture owned by the texture registry
pub trait GpuTexture {
    /// Whether the GPU resource is still alive
    fn is_allocated(&self) -> bool;

    /// Free the GPU resource; the value stays around but reports unallocated
    fn release_gpu(&mut self);

    /// Width and height in pixels
    fn size(&self) -> (u32, u32);
}

/// Parameters for a new host texture in the RGBA8 host format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
}

/// One region upload into an existing texture.
///
/// `data` is the whole source image; the region starts `offset` bytes in and
/// successive rows are `row_pitch` bytes apart, so pitches always describe the
/// full texture, never the region.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub region: TextureRect,
    pub data: &'a [u8],
    pub offset: usize,
    pub row_pitch: u32,
    pub slice_pitch: u32,
}

impl<'a> TextureUpload<'a> {
    /// Upload `region` out of a tightly packed RGBA8 image of `width` x `height`
    pub fn region_of(data: &'a [u8], width: u32, height: u32, region: TextureRect) -> Self {
        let row_pitch = width * HOST_BYTES_PER_PIXEL as u32;
        let offset = (region.y as usize * width as usize + region.x as usize) * HOST_BYTES_PER_PIXEL;
        Self {
            region,
            data,
            offset,
            row_pitch,
            slice_pitch: row_pitch * height,
        }
    }

    /// Upload the whole image
    pub fn full(data: &'a [u8], width: u32, height: u32) -> Self {
        Self::region_of(data, width, height, TextureRect::new(0, 0, width, height))
    }

    /// Bytes this upload reads from `data`, starting at `offset`
    pub fn required_len(&self) -> usize {
        if self.region.is_empty() {
            return 0;
        }
        (self.region.height as usize - 1) * self.row_pitch as usize
            + self.region.width as usize * HOST_BYTES_PER_PIXEL
    }
}

/// Indexed triangles for one draw call. Indices are relative to the start of
/// `positions`.
#[derive(Debug, Clone, Copy)]
pub struct TriangleMesh<'a> {
    pub positions: &'a [Vec2],
    pub uvs: &'a [Vec2],
    pub colors: &'a [Color32],
    pub indices: &'a [u16],
}

impl TriangleMesh<'_> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Texture creation and upload
pub trait TextureBackend {
    type Texture: GpuTexture;

    /// Allocate an RGBA8 texture; contents are undefined until uploaded
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Self::Texture>;

    /// Copy a region of pixels into `texture`
    fn update_texture(&mut self, texture: &Self::Texture, upload: TextureUpload<'_>) -> Result<()>;
}

/// Immediate-mode 2D drawing
pub trait Render2D: TextureBackend {
    /// What a batch renders into
    type Target;

    /// Open a batch against `target`
    fn begin(&mut self, target: Self::Target) -> Result<()>;

    /// Restrict subsequent draws to `rect`, in framebuffer pixels
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    fn draw_textured_triangles(&mut self, texture: &Self::Texture, mesh: TriangleMesh<'_>);

    /// Close the batch and submit everything drawn since `begin`
    fn end(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_upload_uses_full_width_pitch() {
        let data = vec![0u8; 64 * 32 * 4];
        let upload = TextureUpload::region_of(&data, 64, 32, TextureRect::new(8, 4, 16, 2));

        assert_eq!(upload.row_pitch, 256);
        assert_eq!(upload.slice_pitch, 256 * 32);
        assert_eq!(upload.offset, (4 * 64 + 8) * 4);
        assert_eq!(upload.required_len(), 256 + 16 * 4);
    }

    #[test]
    fn test_full_upload_covers_whole_image() {
        let data = vec![0u8; 4 * 4 * 4];
        let upload = TextureUpload::full(&data, 4, 4);
        assert_eq!(upload.offset, 0);
        assert_eq!(upload.offset + upload.required_len(), data.len());
    }
}
