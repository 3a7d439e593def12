use glam::Vec2;
use imbridge_core::{
    BackendFlags, BridgeConfig, ClipRect, ContextSettings, DrawData, DrawList, EventQueue,
    GamepadButton, GuiContext, GuiKey, GuiStyle, InputEvent, TextureData, TextureFormat,
    TextureStatus,
};
use imbridge_platform::{Bridge, GamepadState, InputSnapshot};
use imbridge_renderer::{CommandRecorder, RenderCommand, TextureBackend, TextureDesc};
use pretty_assertions::assert_eq;

/// Stand-in GUI context that records what the bridge asks of it
#[derive(Default)]
struct MockGui {
    io: EventQueue,
    settings: Option<ContextSettings>,
    style: Option<GuiStyle>,
    scale: f32,
    frames: usize,
    has_window: bool,
    rendered: bool,
    ended: usize,
    shut_down: bool,
    /// Events consumed by the last `new_frame`
    consumed: Vec<InputEvent>,
    draw_data: DrawData,
}

impl MockGui {
    fn with_window() -> Self {
        Self {
            has_window: true,
            ..Self::default()
        }
    }
}

impl GuiContext for MockGui {
    type Io = EventQueue;

    fn io_mut(&mut self) -> &mut EventQueue {
        &mut self.io
    }

    fn configure(&mut self, settings: &ContextSettings) {
        self.io.set_backend_flags(settings.backend_flags);
        self.settings = Some(settings.clone());
    }

    fn apply_style(&mut self, style: GuiStyle) {
        self.style = Some(style);
    }

    fn scale_all_sizes(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn new_frame(&mut self) {
        self.frames += 1;
        self.consumed = self.io.drain().collect();
    }

    fn has_current_window(&self) -> bool {
        self.has_window
    }

    fn render(&mut self) {
        self.rendered = true;
    }

    fn draw_data_mut(&mut self) -> Option<&mut DrawData> {
        self.rendered.then_some(&mut self.draw_data)
    }

    fn end_frame(&mut self) {
        self.ended += 1;
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

fn bridge(config: BridgeConfig, gui: MockGui) -> Bridge<MockGui, CommandRecorder> {
    let mut bridge = Bridge::new(config, gui).unwrap();
    bridge.setup(1.0);
    bridge
}

fn run_frame(
    bridge: &mut Bridge<MockGui, CommandRecorder>,
    backend: &mut CommandRecorder,
    host: &InputSnapshot,
) {
    bridge.update(host);
    bridge.late_update();
    bridge.post_render(backend, "frame".to_string()).unwrap();
}

#[test]
fn test_setup_applies_flags_style_and_dpi() {
    let mut config = BridgeConfig::default();
    config.save_settings = false;
    let mut bridge = Bridge::<_, CommandRecorder>::new(config, MockGui::default()).unwrap();
    bridge.setup(1.5);

    let gui = bridge.gui();
    let settings = gui.settings.as_ref().unwrap();
    assert!(!settings.save_settings);
    assert_eq!(settings.backend_flags, BackendFlags::DEFAULT);
    assert_eq!(gui.style, Some(GuiStyle::Dark));
    assert_eq!(gui.scale, 1.5);
}

#[test]
fn test_custom_style_is_left_alone() {
    let config = BridgeConfig {
        style: GuiStyle::Custom,
        ..BridgeConfig::default()
    };
    let bridge = bridge(config, MockGui::default());
    assert_eq!(bridge.gui().style, None);
}

#[test]
fn test_disabled_bridge_produces_no_events() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::with_window());
    let mut backend = CommandRecorder::new();
    bridge.set_enabled(false);

    assert_eq!(bridge.update(&InputSnapshot::default()), None);
    assert!(!bridge.is_frame_active());
    bridge.late_update();
    let stats = bridge.post_render(&mut backend, "frame".to_string()).unwrap();

    let gui = bridge.gui();
    assert!(gui.io.is_empty());
    assert_eq!(gui.frames, 0);
    assert!(!gui.rendered);
    assert_eq!(stats, None);
    assert!(backend.commands().is_empty());
}

#[test]
fn test_no_gamepad_events_without_a_connected_pad() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::with_window());
    let stats = bridge.update(&InputSnapshot::default()).unwrap();
    assert!(!stats.gamepad);

    let has_gamepad_key = bridge.gui().consumed.iter().any(|event| {
        matches!(
            event,
            InputEvent::Key { key: GuiKey::GamepadStart, .. }
                | InputEvent::KeyAnalog { key: GuiKey::GamepadL2, .. }
        )
    });
    assert!(!has_gamepad_key);

    let mut pad = GamepadState::default();
    pad.buttons.insert(GamepadButton::Start);
    let host = InputSnapshot {
        gamepads: vec![pad],
        ..InputSnapshot::default()
    };
    bridge.late_update();
    let stats = bridge.update(&host).unwrap();
    assert!(stats.gamepad);
    assert!(bridge
        .gui()
        .consumed
        .contains(&InputEvent::Key { key: GuiKey::GamepadStart, down: true }));
}

#[test]
fn test_frame_draws_through_the_recorder() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::with_window());
    let mut backend = CommandRecorder::new();
    let host = InputSnapshot::default();

    {
        let data = &mut bridge.gui_mut().draw_data;
        data.display_size = Vec2::new(320.0, 240.0);
        data.textures.push(TextureData::new(1, TextureFormat::Alpha8, 4, 4));
    }
    run_frame(&mut bridge, &mut backend, &host);
    let atlas = bridge.gui().draw_data.textures[0].tex_id();
    assert!(atlas.is_some());
    assert_eq!(bridge.gui().draw_data.textures[0].status, TextureStatus::Ok);

    let mut list = DrawList::new();
    list.add_rect(
        Vec2::new(10.0, 10.0),
        Vec2::new(20.0, 20.0),
        0xFFFF_FFFF,
        atlas,
        ClipRect::new(0.0, 0.0, 320.0, 240.0),
    );
    bridge.gui_mut().draw_data.draw_lists.push(list);
    backend.clear();

    bridge.update(&host);
    bridge.late_update();
    let stats = bridge
        .post_render(&mut backend, "frame".to_string())
        .unwrap()
        .unwrap();

    assert_eq!(stats.draw.map(|d| d.draw_calls), Some(1));
    assert_eq!(backend.draw_calls(), 1);
    assert_eq!(backend.commands().first(), Some(&RenderCommand::Begin("frame".to_string())));
    assert_eq!(bridge.gui().ended, 2);
}

#[test]
fn test_post_render_waits_for_a_finalized_frame() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::default());
    let mut backend = CommandRecorder::new();

    bridge.update(&InputSnapshot::default());
    bridge.late_update();
    // No window was built, so the frame stays open and nothing is drawn
    assert!(bridge.is_frame_active());
    assert!(!bridge.gui().rendered);
    assert_eq!(bridge.post_render(&mut backend, "frame".to_string()).unwrap(), None);
    assert_eq!(bridge.gui().ended, 0);
}

#[test]
fn test_drawing_disabled_still_reconciles_textures() {
    let config = BridgeConfig {
        enable_drawing: false,
        ..BridgeConfig::default()
    };
    let mut bridge = bridge(config, MockGui::with_window());
    let mut backend = CommandRecorder::new();
    bridge
        .gui_mut()
        .draw_data
        .textures
        .push(TextureData::new(1, TextureFormat::Rgba32, 2, 2));

    bridge.update(&InputSnapshot::default());
    bridge.late_update();
    let stats = bridge
        .post_render(&mut backend, "frame".to_string())
        .unwrap()
        .unwrap();

    assert_eq!(stats.textures.created, 1);
    assert_eq!(stats.draw, None);
    assert!(backend.commands().is_empty());
    assert_eq!(backend.live_textures(), 1);
}

#[test]
fn test_released_external_handle_is_reused() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::with_window());
    let mut backend = CommandRecorder::new();
    let mut make = |label: &str| {
        backend
            .create_texture(&TextureDesc {
                label: label.to_string(),
                width: 16,
                height: 16,
            })
            .unwrap()
    };

    let ids = [
        bridge.register_texture(make("a")),
        bridge.register_texture(make("b")),
        bridge.register_texture(make("c")),
    ];
    bridge.release_texture(ids[1]).unwrap();
    assert!(bridge.release_texture(ids[1]).is_err());

    let fourth = bridge.register_texture(make("d"));
    assert_eq!(fourth, ids[1]);
    assert_eq!(fourth.get(), 2);
}

#[test]
fn test_want_destroy_waits_for_an_unused_frame() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::with_window());
    let mut backend = CommandRecorder::new();
    let host = InputSnapshot::default();
    bridge
        .gui_mut()
        .draw_data
        .textures
        .push(TextureData::new(7, TextureFormat::Rgba32, 8, 8));
    run_frame(&mut bridge, &mut backend, &host);
    assert_eq!(bridge.registry().len(), 1);

    bridge.gui_mut().draw_data.textures[0].set_status(TextureStatus::WantDestroy);
    run_frame(&mut bridge, &mut backend, &host);
    assert_eq!(bridge.registry().len(), 1);
    assert_eq!(
        bridge.gui().draw_data.textures[0].status,
        TextureStatus::WantDestroy
    );

    bridge.gui_mut().draw_data.textures[0].unused_frames = 1;
    run_frame(&mut bridge, &mut backend, &host);
    assert_eq!(bridge.registry().len(), 0);
    assert_eq!(bridge.gui().draw_data.textures[0].status, TextureStatus::Destroyed);
    assert_eq!(backend.live_textures(), 0);
}

#[test]
fn test_teardown_releases_everything() {
    let mut bridge = bridge(BridgeConfig::default(), MockGui::with_window());
    let mut backend = CommandRecorder::new();
    bridge
        .gui_mut()
        .draw_data
        .textures
        .push(TextureData::new(1, TextureFormat::Rgba32, 2, 2));
    run_frame(&mut bridge, &mut backend, &InputSnapshot::default());
    let external = backend
        .create_texture(&TextureDesc {
            label: "viewport".to_string(),
            width: 2,
            height: 2,
        })
        .unwrap();
    bridge.register_texture(external);

    assert_eq!(bridge.teardown(), 2);
    assert!(bridge.gui().shut_down);
    assert_eq!(backend.live_textures(), 0);
}

#[test]
fn test_destroy_deferral_restarts_after_texture_is_used_again() {
    let mut config = BridgeConfig::default();
    config.textures.max_destroy_deferral = Some(2);
    let mut bridge = bridge(config, MockGui::with_window());
    let mut backend = CommandRecorder::new();
    let host = InputSnapshot::default();
    bridge
        .gui_mut()
        .draw_data
        .textures
        .push(TextureData::new(3, TextureFormat::Rgba32, 4, 4));
    run_frame(&mut bridge, &mut backend, &host);

    bridge.gui_mut().draw_data.textures[0].set_status(TextureStatus::WantDestroy);
    run_frame(&mut bridge, &mut backend, &host);
    run_frame(&mut bridge, &mut backend, &host);
    assert_eq!(bridge.registry().len(), 1);

    bridge.gui_mut().draw_data.textures[0].set_status(TextureStatus::Ok);
    run_frame(&mut bridge, &mut backend, &host);

    // A fresh request gets the full deferral budget again
    bridge.gui_mut().draw_data.textures[0].set_status(TextureStatus::WantDestroy);
    run_frame(&mut bridge, &mut backend, &host);
    assert_eq!(bridge.registry().len(), 1);
    assert_eq!(
        bridge.gui().draw_data.textures[0].status,
        TextureStatus::WantDestroy
    );
    assert_eq!(backend.live_textures(), 1);
}
