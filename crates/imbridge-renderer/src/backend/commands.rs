use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use glam::Vec2;
use imbridge_core::{Color32, Rect, TextureRect};
use smallvec::SmallVec;

use super::{GpuTexture, Render2D, TextureBackend, TextureDesc, TextureUpload, HOST_BYTES_PER_PIXEL};

/// Everything a [`CommandRecorder`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// A batch was opened against the named target
    Begin(String),
    /// Push a clipping rectangle
    PushClip(Rect),
    /// Pop the last clipping rectangle
    PopClip,
    /// Indexed triangles sampled from a recorded texture
    DrawTriangles {
        texture: u32,
        clip: Option<Rect>,
        positions: Vec<Vec2>,
        uvs: Vec<Vec2>,
        colors: Vec<Color32>,
        indices: Vec<u16>,
    },
    /// The batch was closed
    End,
}

/// A pixel upload as the recorder received it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub texture: u32,
    pub region: TextureRect,
    pub row_pitch: u32,
    pub slice_pitch: u32,
    /// Region bytes, tightly packed row after row
    pub bytes: Vec<u8>,
}

/// Texture handed out by [`CommandRecorder`]
#[derive(Debug)]
pub struct RecordedTexture {
    serial: u32,
    width: u32,
    height: u32,
    allocated: bool,
    live: Arc<AtomicUsize>,
}

impl RecordedTexture {
    /// Creation order, starting at 1
    pub fn serial(&self) -> u32 {
        self.serial
    }
}

impl GpuTexture for RecordedTexture {
    fn is_allocated(&self) -> bool {
        self.allocated
    }

    fn release_gpu(&mut self) {
        if self.allocated {
            self.allocated = false;
            self.live.fetch_sub(1, Ordering::Relaxed);
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for RecordedTexture {
    fn drop(&mut self) {
        self.release_gpu();
    }
}

/// Backend that performs no GPU work and records every call.
///
/// Used headless and in tests. Texture creation can be made to fail on demand
/// to exercise the retry paths.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<RenderCommand>,
    uploads: Vec<RecordedUpload>,
    created: Vec<TextureDesc>,
    clip_stack: SmallVec<[Rect; 8]>,
    in_batch: bool,
    next_serial: u32,
    live: Arc<AtomicUsize>,
    fail_creates: u32,
    fail_updates: u32,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` texture creations
    pub fn fail_next_creates(&mut self, count: u32) {
        self.fail_creates = count;
    }

    /// Fail the next `count` texture uploads
    pub fn fail_next_updates(&mut self, count: u32) {
        self.fail_updates = count;
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn uploads(&self) -> &[RecordedUpload] {
        &self.uploads
    }

    pub fn created(&self) -> &[TextureDesc] {
        &self.created
    }

    /// Textures created and not yet released
    pub fn live_textures(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Number of recorded draw calls
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawTriangles { .. }))
            .count()
    }

    /// Forget recorded commands and uploads, keeping texture bookkeeping
    pub fn clear(&mut self) {
        self.commands.clear();
        self.uploads.clear();
        self.created.clear();
    }
}

impl TextureBackend for CommandRecorder {
    type Texture = RecordedTexture;

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<RecordedTexture> {
        if self.fail_creates > 0 {
            self.fail_creates -= 1;
            bail!("simulated allocation failure for '{}'", desc.label);
        }
        if desc.width == 0 || desc.height == 0 {
            bail!("texture '{}' has zero extent", desc.label);
        }

        self.next_serial += 1;
        self.live.fetch_add(1, Ordering::Relaxed);
        self.created.push(desc.clone());

        Ok(RecordedTexture {
            serial: self.next_serial,
            width: desc.width,
            height: desc.height,
            allocated: true,
            live: Arc::clone(&self.live),
        })
    }

    fn update_texture(&mut self, texture: &RecordedTexture, upload: TextureUpload<'_>) -> Result<()> {
        if self.fail_updates > 0 {
            self.fail_updates -= 1;
            bail!("simulated upload failure for texture {}", texture.serial);
        }
        if !texture.allocated {
            bail!("texture {} was released", texture.serial);
        }
        if !upload.region.fits_within(texture.width, texture.height) {
            bail!(
                "region {:?} outside {}x{} texture",
                upload.region,
                texture.width,
                texture.height
            );
        }
        let end = upload.offset + upload.required_len();
        if end > upload.data.len() {
            bail!("upload reads {} bytes from a {} byte buffer", end, upload.data.len());
        }

        let row_bytes = upload.region.width as usize * HOST_BYTES_PER_PIXEL;
        let mut bytes = Vec::with_capacity(row_bytes * upload.region.height as usize);
        for row in 0..upload.region.height as usize {
            let start = upload.offset + row * upload.row_pitch as usize;
            bytes.extend_from_slice(&upload.data[start..start + row_bytes]);
        }

        self.uploads.push(RecordedUpload {
            texture: texture.serial,
            region: upload.region,
            row_pitch: upload.row_pitch,
            slice_pitch: upload.slice_pitch,
            bytes,
        });
        Ok(())
    }
}

impl Render2D for CommandRecorder {
    type Target = String;

    fn begin(&mut self, target: String) -> Result<()> {
        if self.in_batch {
            bail!("batch already open");
        }
        self.in_batch = true;
        self.commands.push(RenderCommand::Begin(target));
        Ok(())
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
        self.commands.push(RenderCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
        self.commands.push(RenderCommand::PopClip);
    }

    fn draw_textured_triangles(&mut self, texture: &RecordedTexture, mesh: super::TriangleMesh<'_>) {
        self.commands.push(RenderCommand::DrawTriangles {
            texture: texture.serial,
            clip: self.clip_stack.last().copied(),
            positions: mesh.positions.to_vec(),
            uvs: mesh.uvs.to_vec(),
            colors: mesh.colors.to_vec(),
            indices: mesh.indices.to_vec(),
        });
    }

    fn end(&mut self) -> Result<()> {
        if !self.in_batch {
            bail!("no batch open");
        }
        if !self.clip_stack.is_empty() {
            bail!("{} clip rectangles left on the stack", self.clip_stack.len());
        }
        self.in_batch = false;
        self.commands.push(RenderCommand::End);
        Ok(())
    }
}
