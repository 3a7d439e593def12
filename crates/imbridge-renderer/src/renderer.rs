//! Per-frame render phase: texture reconciliation followed by draw submission

use imbridge_core::{bridge_info, DrawData, LogCategory, Result, TextureConfig, TextureId};

use crate::backend::Render2D;
use crate::draw::{DrawRenderer, DrawStats};
use crate::lifecycle::{TextureLifecycle, TextureStats};
use crate::registry::TextureRegistry;

/// Combined statistics for one render phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub textures: TextureStats,
    /// `None` when drawing was skipped
    pub draw: Option<DrawStats>,
}

/// Owns the texture registry and everything needed to turn draw data into
/// host draw calls for backend `B`
pub struct GuiRenderer<B: Render2D> {
    registry: TextureRegistry<B::Texture>,
    lifecycle: TextureLifecycle,
    draw: DrawRenderer,
}

impl<B: Render2D> GuiRenderer<B> {
    pub fn new(config: TextureConfig) -> Self {
        Self {
            registry: TextureRegistry::with_capacity(config.initial_slots),
            lifecycle: TextureLifecycle::new(config),
            draw: DrawRenderer::new(),
        }
    }

    pub fn registry(&self) -> &TextureRegistry<B::Texture> {
        &self.registry
    }

    pub fn draw_renderer(&self) -> &DrawRenderer {
        &self.draw
    }

    /// Reconcile textures, then draw into `target` when one is given
    pub fn render(
        &mut self,
        draw_data: &mut DrawData,
        backend: &mut B,
        target: Option<B::Target>,
    ) -> Result<RenderStats> {
        let textures = self
            .lifecycle
            .reconcile(&mut draw_data.textures, backend, &mut self.registry);

        let draw = match target {
            Some(target) => Some(self.draw.render(draw_data, backend, &self.registry, target)?),
            None => None,
        };

        Ok(RenderStats { textures, draw })
    }

    /// Hand an externally created texture to the registry
    pub fn register_texture(&mut self, texture: B::Texture) -> TextureId {
        self.registry.register(texture)
    }

    /// Release a texture registered with [`register_texture`](Self::register_texture)
    pub fn release_texture(&mut self, id: TextureId) -> Result<()> {
        self.registry.release(id)
    }

    /// Release every GPU texture; the renderer stays usable afterwards
    pub fn shutdown(&mut self) -> usize {
        let released = self.registry.release_all();
        self.lifecycle.reset();
        if released > 0 {
            bridge_info!(LogCategory::Renderer, "released {} GUI textures", released);
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CommandRecorder, TextureBackend, TextureDesc};
    use imbridge_core::{TextureData, TextureFormat, TextureStatus};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reconcile_runs_without_target() {
        let mut renderer: GuiRenderer<CommandRecorder> = GuiRenderer::new(TextureConfig::default());
        let mut backend = CommandRecorder::new();
        let mut data = DrawData {
            textures: vec![TextureData::new(1, TextureFormat::Rgba32, 2, 2)],
            ..Default::default()
        };

        let stats = renderer.render(&mut data, &mut backend, None).unwrap();

        assert_eq!(stats.textures.created, 1);
        assert_eq!(stats.draw, None);
        assert_eq!(data.textures[0].status, TextureStatus::Ok);
        assert!(backend.commands().is_empty());
    }

    #[test]
    fn test_external_textures_share_handle_space() {
        let mut renderer: GuiRenderer<CommandRecorder> = GuiRenderer::new(TextureConfig::default());
        let mut backend = CommandRecorder::new();
        let external = backend
            .create_texture(&TextureDesc {
                label: "viewport".to_string(),
                width: 8,
                height: 8,
            })
            .unwrap();

        let id = renderer.register_texture(external);
        let mut data = DrawData {
            textures: vec![TextureData::new(1, TextureFormat::Rgba32, 2, 2)],
            ..Default::default()
        };
        renderer.render(&mut data, &mut backend, None).unwrap();

        assert_eq!(id.get(), 1);
        assert_eq!(data.textures[0].tex_id().map(TextureId::get), Some(2));

        renderer.release_texture(id).unwrap();
        assert!(renderer.release_texture(id).is_err());
        assert_eq!(renderer.shutdown(), 1);
        assert_eq!(backend.live_textures(), 0);
    }
}
