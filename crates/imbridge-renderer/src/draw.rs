//! Draw-data submission
//!
//! Walks the GUI library's finalized draw lists and turns every command into
//! a scissored, textured triangle draw on the host renderer.

use imbridge_core::{
    bridge_warn_rate_limited, BridgeError, DrawData, ErrorContext, LogCategory, Result,
};

use crate::backend::Render2D;
use crate::registry::TextureRegistry;
use crate::staging::StagingBuffers;

/// What one submission did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub lists: usize,
    pub commands: usize,
    pub draw_calls: usize,
    /// Commands handled by a user callback
    pub callbacks: usize,
    /// Commands dropped for a zero-area clip rectangle
    pub clipped: usize,
    /// Commands dropped for a bad index range or texture handle
    pub skipped: usize,
}

/// Converts draw lists through reusable staging buffers
#[derive(Debug, Default)]
pub struct DrawRenderer {
    staging: StagingBuffers,
}

impl DrawRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staging(&self) -> &StagingBuffers {
        &self.staging
    }

    /// Draw everything in `draw_data` into `target` as one batch
    pub fn render<R: Render2D>(
        &mut self,
        draw_data: &DrawData,
        backend: &mut R,
        registry: &TextureRegistry<R::Texture>,
        target: R::Target,
    ) -> Result<DrawStats> {
        let mut stats = DrawStats::default();

        backend.begin(target).map_err(|e| {
            BridgeError::renderer_with_context(
                e.to_string(),
                ErrorContext::new("begin", "draw_renderer")
                    .with_call_path("DrawRenderer::render"),
            )
        })?;

        for list in &draw_data.draw_lists {
            stats.lists += 1;
            self.staging.load(list);

            for cmd in &list.cmd_buffer {
                stats.commands += 1;

                if let Some(callback) = &cmd.user_callback {
                    callback(list, cmd);
                    stats.callbacks += 1;
                    continue;
                }

                let Some(scissor) = cmd
                    .clip_rect
                    .to_framebuffer(draw_data.display_pos, draw_data.framebuffer_scale)
                else {
                    stats.clipped += 1;
                    continue;
                };

                let Some(texture) = registry.resolve(cmd.texture_id) else {
                    bridge_warn_rate_limited!(
                        LogCategory::Renderer,
                        "draw command references unknown texture {:?}",
                        cmd.texture_id
                    );
                    stats.skipped += 1;
                    continue;
                };

                let idx_start = cmd.idx_offset as usize;
                let idx_end = idx_start + cmd.elem_count as usize;
                let Some(mesh) = self.staging.mesh(cmd.vtx_offset as usize, idx_start..idx_end)
                else {
                    bridge_warn_rate_limited!(
                        LogCategory::Renderer,
                        "draw command indices {}..{} (vertex offset {}) exceed list of {} indices / {} vertices",
                        idx_start,
                        idx_end,
                        cmd.vtx_offset,
                        list.idx_buffer.len(),
                        list.vtx_buffer.len()
                    );
                    stats.skipped += 1;
                    continue;
                };

                backend.push_clip(scissor);
                backend.draw_textured_triangles(texture, mesh);
                backend.pop_clip();
                stats.draw_calls += 1;
            }
        }

        backend.end().map_err(|e| {
            BridgeError::renderer_with_context(
                e.to_string(),
                ErrorContext::new("end", "draw_renderer")
                    .with_call_path("DrawRenderer::render")
                    .with_metadata("draw_calls", stats.draw_calls),
            )
        })?;

        tracing::trace!(target: "imbridge", "draw submission: {:?}", stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CommandRecorder, RenderCommand, TextureBackend, TextureDesc};
    use glam::Vec2;
    use imbridge_core::{ClipRect, DrawList, Rect, TextureId};
    use pretty_assertions::assert_eq;

    fn backend_with_texture() -> (CommandRecorder, TextureRegistry<crate::backend::RecordedTexture>, TextureId) {
        let mut backend = CommandRecorder::new();
        let mut registry = TextureRegistry::new();
        let texture = backend
            .create_texture(&TextureDesc {
                label: "atlas".to_string(),
                width: 1,
                height: 1,
            })
            .unwrap();
        let id = registry.register(texture);
        (backend, registry, id)
    }

    fn quad_data(id: Option<TextureId>, clip: ClipRect) -> DrawData {
        let mut list = DrawList::new();
        list.add_rect(Vec2::splat(10.0), Vec2::splat(20.0), 0xFFFF_FFFF, id, clip);
        DrawData {
            display_size: Vec2::splat(100.0),
            draw_lists: vec![list],
            ..Default::default()
        }
    }

    #[test]
    fn test_clip_rect_becomes_scissor() {
        let (mut backend, registry, id) = backend_with_texture();
        let data = quad_data(Some(id), ClipRect::new(10.0, 10.0, 50.0, 50.0));

        let stats = DrawRenderer::new()
            .render(&data, &mut backend, &registry, "frame".to_string())
            .unwrap();

        assert_eq!(stats.draw_calls, 1);
        assert_eq!(
            backend.commands()[1],
            RenderCommand::PushClip(Rect::new(10.0, 10.0, 40.0, 40.0))
        );
        assert_eq!(backend.commands().last(), Some(&RenderCommand::End));
    }

    #[test]
    fn test_degenerate_clip_draws_nothing() {
        let (mut backend, registry, id) = backend_with_texture();
        let data = quad_data(Some(id), ClipRect::new(50.0, 50.0, 10.0, 10.0));

        let stats = DrawRenderer::new()
            .render(&data, &mut backend, &registry, "frame".to_string())
            .unwrap();

        assert_eq!(stats.clipped, 1);
        assert_eq!(backend.draw_calls(), 0);
        assert_eq!(backend.commands().len(), 2);
    }

    #[test]
    fn test_framebuffer_scale_and_display_offset() {
        let (mut backend, registry, id) = backend_with_texture();
        let mut data = quad_data(Some(id), ClipRect::new(110.0, 60.0, 150.0, 100.0));
        data.display_pos = Vec2::new(100.0, 50.0);
        data.framebuffer_scale = Vec2::splat(2.0);

        DrawRenderer::new()
            .render(&data, &mut backend, &registry, "frame".to_string())
            .unwrap();

        assert_eq!(
            backend.commands()[1],
            RenderCommand::PushClip(Rect::new(20.0, 20.0, 80.0, 80.0))
        );
    }

    #[test]
    fn test_unknown_texture_is_skipped() {
        let (mut backend, registry, _) = backend_with_texture();
        let data = quad_data(TextureId::from_raw(9), ClipRect::new(0.0, 0.0, 50.0, 50.0));

        let stats = DrawRenderer::new()
            .render(&data, &mut backend, &registry, "frame".to_string())
            .unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(backend.draw_calls(), 0);
    }

    #[test]
    fn test_out_of_range_command_is_skipped() {
        let (mut backend, registry, id) = backend_with_texture();
        let mut data = quad_data(Some(id), ClipRect::new(0.0, 0.0, 50.0, 50.0));
        data.draw_lists[0].cmd_buffer[0].elem_count = 12;

        let stats = DrawRenderer::new()
            .render(&data, &mut backend, &registry, "frame".to_string())
            .unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(backend.draw_calls(), 0);
    }

    #[test]
    fn test_vertices_get_pixel_center_offset() {
        let (mut backend, registry, id) = backend_with_texture();
        let data = quad_data(Some(id), ClipRect::new(0.0, 0.0, 50.0, 50.0));

        DrawRenderer::new()
            .render(&data, &mut backend, &registry, "frame".to_string())
            .unwrap();

        match &backend.commands()[2] {
            RenderCommand::DrawTriangles {
                positions, indices, ..
            } => {
                assert_eq!(positions[0], Vec2::splat(10.5));
                assert_eq!(positions[2], Vec2::splat(20.5));
                assert_eq!(indices, &vec![0, 1, 2, 0, 2, 3]);
            }
            other => panic!("expected a draw, got {:?}", other),
        }
    }
}
