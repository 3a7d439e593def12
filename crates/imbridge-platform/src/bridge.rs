//! The bridge context and its frame lifecycle
//!
//! A host drives one [`Bridge`] through these phases every frame:
//!
//! 1. [`update`](Bridge::update) feeds input and opens a GUI frame
//! 2. application UI code runs against [`gui_mut`](Bridge::gui_mut)
//! 3. [`late_update`](Bridge::late_update) finalizes the frame
//! 4. [`post_render`](Bridge::post_render) uploads textures and draws
//!
//! [`setup`](Bridge::setup) runs once before the first update and
//! [`teardown`](Bridge::teardown) once at shutdown.

use imbridge_core::{
    bridge_debug, bridge_error, bridge_info, BridgeConfig, GuiContext, GuiStyle, LogCategory,
    Result, TextureId,
};
use imbridge_renderer::{GuiRenderer, Render2D, RenderStats, TextureRegistry};

use crate::host::{HostFrame, HostInput};
use crate::input::{InputStats, InputTranslator};

/// Plugin-lifetime state shared by every frame phase
pub struct Bridge<G: GuiContext, B: Render2D> {
    config: BridgeConfig,
    gui: G,
    renderer: GuiRenderer<B>,
    translator: InputTranslator,
    frame_active: bool,
    frame_finalized: bool,
}

impl<G: GuiContext, B: Render2D> Bridge<G, B> {
    /// Wrap a freshly created GUI context; fails on an invalid config
    pub fn new(config: BridgeConfig, gui: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            renderer: GuiRenderer::new(config.textures.clone()),
            translator: InputTranslator::new(config.input.clone()),
            config,
            gui,
            frame_active: false,
            frame_finalized: false,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn gui(&self) -> &G {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut G {
        &mut self.gui
    }

    pub fn renderer(&self) -> &GuiRenderer<B> {
        &self.renderer
    }

    pub fn registry(&self) -> &TextureRegistry<B::Texture> {
        self.renderer.registry()
    }

    /// Whether a frame is open and waiting for [`late_update`](Self::late_update)
    pub fn is_frame_active(&self) -> bool {
        self.frame_active
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Toggle the whole bridge; takes effect on the next update
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.config.enable_input = enabled;
    }

    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.config.enable_drawing = enabled;
    }

    /// Apply flags, style and DPI scaling to the GUI context
    pub fn setup(&mut self, dpi_scale: f32) {
        self.gui.configure(&self.config.context_settings());
        if self.config.style != GuiStyle::Custom {
            self.gui.apply_style(self.config.style);
        }
        self.gui.scale_all_sizes(dpi_scale);
        bridge_info!(
            LogCategory::Platform,
            "bridge set up (style {:?}, dpi scale {})",
            self.config.style,
            dpi_scale
        );
    }

    /// Pre-UI phase: translate input and open a new GUI frame
    ///
    /// Returns `None` when the bridge is disabled; no frame is opened then.
    pub fn update<H>(&mut self, host: &H) -> Option<InputStats>
    where
        H: HostInput + HostFrame + ?Sized,
    {
        if !self.config.enabled {
            self.frame_active = false;
            return None;
        }

        let stats = self.translator.translate(
            self.gui.io_mut(),
            host,
            host,
            self.config.enable_input,
        );
        self.new_frame();
        Some(stats)
    }

    /// Open a GUI frame; [`update`](Self::update) calls this after input
    pub fn new_frame(&mut self) {
        self.gui.new_frame();
        self.frame_active = true;
    }

    /// Post-UI phase: finalize the frame into draw data
    ///
    /// Does nothing when no frame is open or the frame produced no window;
    /// the frame stays open in the latter case.
    pub fn late_update(&mut self) {
        if !self.frame_active || !self.gui.has_current_window() {
            return;
        }
        self.gui.render();
        self.frame_active = false;
        self.frame_finalized = true;
    }

    /// Draw phase: reconcile textures and submit draw lists into `target`
    ///
    /// Skipped unless [`late_update`](Self::late_update) finalized a frame
    /// since the last call. With drawing disabled only textures are
    /// reconciled. Failures are logged and returned.
    pub fn post_render(&mut self, backend: &mut B, target: B::Target) -> Result<Option<RenderStats>> {
        if !std::mem::take(&mut self.frame_finalized) {
            return Ok(None);
        }
        let Some(draw_data) = self.gui.draw_data_mut() else {
            return Ok(None);
        };

        let target = self.config.enable_drawing.then_some(target);
        let result = self.renderer.render(draw_data, backend, target);
        self.gui.end_frame();

        match result {
            Ok(stats) => {
                bridge_debug!(
                    LogCategory::Renderer,
                    "frame rendered: {} textures created, {} draw calls",
                    stats.textures.created,
                    stats.draw.map_or(0, |draw| draw.draw_calls)
                );
                Ok(Some(stats))
            }
            Err(e) => {
                bridge_error!(LogCategory::Renderer, "{}", e.format_for_log());
                Err(e)
            }
        }
    }

    /// Expose an application-owned GPU texture to GUI draw commands
    pub fn register_texture(&mut self, texture: B::Texture) -> TextureId {
        self.renderer.register_texture(texture)
    }

    /// Release a texture from [`register_texture`](Self::register_texture)
    pub fn release_texture(&mut self, id: TextureId) -> Result<()> {
        self.renderer.release_texture(id).inspect_err(|e| {
            bridge_error!(LogCategory::Texture, "{}", e.format_for_log());
        })
    }

    /// Release every GPU texture and destroy the GUI context
    pub fn teardown(&mut self) -> usize {
        let released = self.renderer.shutdown();
        self.gui.shutdown();
        self.frame_active = false;
        self.frame_finalized = false;
        bridge_info!(LogCategory::Platform, "bridge torn down");
        released
    }
}
