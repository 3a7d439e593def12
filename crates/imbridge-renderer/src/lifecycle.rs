//! GPU side of the GUI library's texture lifecycle
//!
//! Each frame the GUI library tags its textures with a wanted state. The
//! adapter performs the GPU work for every texture that is not `Ok` and
//! acknowledges by advancing the status.

use std::borrow::Cow;
use std::collections::HashMap;

use imbridge_core::{
    bridge_debug, bridge_error, bridge_warn, BridgeError, ErrorContext, LogCategory, Result,
    TextureConfig, TextureData, TextureFormat, TextureId, TextureRect, TextureStatus,
};

use crate::backend::{GpuTexture, TextureBackend, TextureDesc, TextureUpload, HOST_BYTES_PER_PIXEL};
use crate::registry::TextureRegistry;

/// What one reconcile pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureStats {
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
    pub deferred: usize,
    pub failed: usize,
}

impl TextureStats {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of a destroy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Destroyed,
    /// Texture may still be referenced by this frame's draw commands
    Deferred,
}

/// Drives texture descriptors from their wanted state to the GPU
#[derive(Debug)]
pub struct TextureLifecycle {
    config: TextureConfig,
    /// Consecutive frames a destroy has been put off, per handle
    deferrals: HashMap<TextureId, u32>,
}

impl TextureLifecycle {
    pub fn new(config: TextureConfig) -> Self {
        Self {
            config,
            deferrals: HashMap::new(),
        }
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    /// Process every texture whose status is not `Ok`.
    ///
    /// Failures are logged and counted; the affected descriptor keeps its
    /// status so the GUI library asks again next frame.
    pub fn reconcile<B: TextureBackend>(
        &mut self,
        textures: &mut [TextureData],
        backend: &mut B,
        registry: &mut TextureRegistry<B::Texture>,
    ) -> TextureStats {
        let mut stats = TextureStats::default();
        self.forget_stale_deferrals(textures);

        for texture in textures.iter_mut() {
            let result = match texture.status {
                TextureStatus::Ok | TextureStatus::Destroyed => continue,
                TextureStatus::WantCreate => self
                    .create_texture(texture, backend, registry)
                    .map(|_| stats.created += 1),
                TextureStatus::WantUpdates => self
                    .update_texture(texture, backend, registry)
                    .map(|_| stats.updated += 1),
                TextureStatus::WantDestroy => {
                    self.destroy_texture(texture, registry).map(|outcome| match outcome {
                        DestroyOutcome::Destroyed => stats.destroyed += 1,
                        DestroyOutcome::Deferred => stats.deferred += 1,
                    })
                }
            };

            if let Err(e) = result {
                stats.failed += 1;
                bridge_error!(
                    LogCategory::Texture,
                    "texture {} ({:?}): {}",
                    texture.unique_id,
                    texture.status,
                    e.format_for_log()
                );
            }
        }

        if !stats.is_idle() {
            bridge_debug!(LogCategory::Texture, "texture reconcile: {:?}", stats);
        }
        stats
    }

    /// Allocate, fill and register a new GPU texture for `texture`
    pub fn create_texture<B: TextureBackend>(
        &mut self,
        texture: &mut TextureData,
        backend: &mut B,
        registry: &mut TextureRegistry<B::Texture>,
    ) -> Result<TextureId> {
        let context = || {
            ErrorContext::new("create_texture", "texture_lifecycle")
                .with_call_path("TextureLifecycle::create_texture")
                .with_metadata("uid", texture.unique_id)
                .with_metadata("width", texture.width)
                .with_metadata("height", texture.height)
        };

        if gpu_texture.size() != (texture.width, texture.height) {
        let (width, height) = gpu_texture.size();
        return Err(BridgeError::texture_upload_with_context(
            format!(
                "descriptor is {}x{} but the GPU texture is {}x{}",
                texture.width, texture.height, width, height
            ),
            context(None),
        ));
    }

    let pixels = host_pixels(texture)
            .map_err(|msg| BridgeError::texture_creation_with_context(msg, context()))?;

        let desc = TextureDesc {
            label: format!("gui texture {}", texture.unique_id),
            width: texture.width,
            height: texture.height,
        };
        let mut gpu_texture = backend.create_texture(&desc).map_err(|e| {
            BridgeError::texture_creation_with_context(e.to_string(), context())
        })?;

        let upload = TextureUpload::full(&pixels, texture.width, texture.height);
        if let Err(e) = backend.update_texture(&gpu_texture, upload) {
            gpu_texture.release_gpu();
            return Err(BridgeError::texture_upload_with_context(e.to_string(), context()));
        }

        let id = registry.register(gpu_texture);
        texture.set_tex_id(Some(id));
        texture.set_status(TextureStatus::Ok);
        texture.updates.clear();
        texture.update_rect = TextureRect::default();

        bridge_debug!(
            LogCategory::Texture,
            "created texture {} ({}x{}) as {}",
            texture.unique_id,
            texture.width,
            texture.height,
            id
        );
        Ok(id)
    }

    /// Upload the pending regions of an existing texture
    pub fn update_texture<B: TextureBackend>(
        &mut self,
        texture: &mut TextureData,
        backend: &mut B,
        registry: &mut TextureRegistry<B::Texture>,
    ) -> Result<()> {
        let id = texture.tex_id().ok_or(BridgeError::TextureUnassigned {
            uid: texture.unique_id,
        })?;
        let gpu_texture = registry
            .get(id)
            .ok_or_else(|| BridgeError::not_registered(Some(id)))?;

        let rects = texture.take_updates();
        match upload_regions(texture, id, gpu_texture, backend, &rects) {
            Ok(()) => {
                texture.set_status(TextureStatus::Ok);
                Ok(())
            }
            Err(e) => {
                // Keep the regions so the retry uploads them again
                texture.updates = rects;
                Err(e)
            }
        }
    }

    /// Release the GPU texture once no draw command of this frame can use it
    pub fn destroy_texture<T: GpuTexture>(
        &mut self,
        texture: &mut TextureData,
        registry: &mut TextureRegistry<T>,
    ) -> Result<DestroyOutcome> {
        let Some(id) = texture.tex_id() else {
            // Never reached the GPU
            texture.set_status(TextureStatus::Destroyed);
            return Ok(DestroyOutcome::Destroyed);
        };

        if texture.unused_frames == 0 {
            let deferred = self.deferrals.entry(id).or_insert(0);
            *deferred = deferred.saturating_add(1);
            match self.config.max_destroy_deferral {
                Some(limit) if *deferred > limit.max(1) => {
                    bridge_warn!(
                        LogCategory::Texture,
                        "texture {} still in use after {} frames, destroying anyway",
                        texture.unique_id,
                        limit
                    );
                }
                _ => return Ok(DestroyOutcome::Deferred),
            }
        }

        self.deferrals.remove(&id);
        let released = registry.release(id);
        texture.set_tex_id(None);
        texture.set_status(TextureStatus::Destroyed);
        released?;

        bridge_debug!(LogCategory::Texture, "destroyed texture {} ({})", texture.unique_id, id);
        Ok(DestroyOutcome::Destroyed)
    }

    /// Keep deferral counts only for handles still waiting on a destroy
    fn forget_stale_deferrals(&mut self, textures: &[TextureData]) {
        if self.deferrals.is_empty() {
            return;
        }
        self.deferrals.retain(|id, _| {
            textures.iter().any(|texture| {
                texture.status == TextureStatus::WantDestroy && texture.tex_id() == Some(*id)
            })
        });
    }

    /// Forget deferral bookkeeping, e.g. after the registry was cleared
    pub fn reset(&mut self) {
        self.deferrals.clear();
    }
}

fn upload_regions<B: TextureBackend>(
    texture: &TextureData,
    id: TextureId,
    gpu_texture: &B::Texture,
    backend: &mut B,
    rects: &[TextureRect],
) -> Result<()> {
    let context = |rect: Option<&TextureRect>| {
        let context = ErrorContext::new("update_texture", "texture_lifecycle")
            .with_call_path("TextureLifecycle::update_texture")
            .with_metadata("uid", texture.unique_id)
            .with_metadata("handle", id);
        match rect {
            Some(rect) => context.with_metadata("rect", format!("{:?}", rect)),
            None => context,
        }
    };

    let pixels = host_pixels(texture)
        .map_err(|msg| BridgeError::texture_upload_with_context(msg, context(None)))?;

    for rect in rects.iter().filter(|r| !r.is_empty()) {
        if !rect.fits_within(texture.width, texture.height) {
            return Err(BridgeError::texture_upload_with_context(
                format!("update region exceeds {}x{}", texture.width, texture.height),
                context(Some(rect)),
            ));
        }
        let upload = TextureUpload::region_of(&pixels, texture.width, texture.height, *rect);
        backend
            .update_texture(gpu_texture, upload)
            .map_err(|e| BridgeError::texture_upload_with_context(e.to_string(), context(Some(rect))))?;
    }
    Ok(())
}

/// The descriptor's pixels in the host RGBA8 layout
fn host_pixels(texture: &TextureData) -> std::result::Result<Cow<'_, [u8]>, String> {
    let expected = texture.width as usize * texture.height as usize * texture.format.bytes_per_pixel();
    if texture.pixels.len() < expected {
        return Err(format!(
            "pixel buffer holds {} bytes, {}x{} {:?} needs {}",
            texture.pixels.len(),
            texture.width,
            texture.height,
            texture.format,
            expected
        ));
    }

    Ok(match texture.format {
        TextureFormat::Rgba32 => Cow::Borrowed(&texture.pixels[..expected]),
        TextureFormat::Alpha8 => {
            let mut rgba = Vec::with_capacity(expected * HOST_BYTES_PER_PIXEL);
            for &alpha in &texture.pixels[..expected] {
                rgba.extend_from_slice(&[255, 255, 255, alpha]);
            }
            Cow::Owned(rgba)
        }
    })
}
