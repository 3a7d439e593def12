use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::Vec2;
use imbridge_core::{
    ClipRect, Color32, DrawCmd, DrawData, DrawList, DrawVert, TextureConfig, TextureData, TextureFormat,
};
use imbridge_renderer::{CommandRecorder, GuiRenderer, RenderCommand};
use pretty_assertions::assert_eq;

fn frame_with_atlas() -> (GuiRenderer<CommandRecorder>, CommandRecorder, DrawData) {
    let mut renderer = GuiRenderer::new(TextureConfig::default());
    let mut backend = CommandRecorder::new();
    let mut data = DrawData {
        display_size: Vec2::new(200.0, 100.0),
        textures: vec![TextureData::new(1, TextureFormat::Alpha8, 8, 8)],
        ..Default::default()
    };
    renderer.render(&mut data, &mut backend, None).unwrap();
    backend.clear();
    (renderer, backend, data)
}

#[test]
fn test_commands_share_vertex_buffer_through_offsets() {
    let (mut renderer, mut backend, mut data) = frame_with_atlas();
    let atlas = data.textures[0].tex_id();
    let clip = ClipRect::new(0.0, 0.0, 200.0, 100.0);

    let mut list = DrawList::new();
    list.add_rect(Vec2::ZERO, Vec2::splat(10.0), 0xFFFF_FFFF, atlas, clip);
    list.add_rect(Vec2::splat(50.0), Vec2::splat(60.0), 0x8000_00FF, atlas, clip);
    data.draw_lists.push(list);

    let stats = renderer
        .render(&mut data, &mut backend, Some("frame".to_string()))
        .unwrap()
        .draw
        .unwrap();
    assert_eq!(stats.draw_calls, 2);

    let draws: Vec<_> = backend
        .commands()
        .iter()
        .filter_map(|c| match c {
            RenderCommand::DrawTriangles {
                positions, colors, ..
            } => Some((positions.clone(), colors.clone())),
            _ => None,
        })
        .collect();

    // The second command starts at vertex 4 and sees only the tail
    assert_eq!(draws[0].0.len(), 8);
    assert_eq!(draws[1].0.len(), 4);
    assert_eq!(draws[1].0[0], Vec2::splat(50.5));
    assert_eq!(draws[1].1[0], Color32::rgba(0xFF, 0, 0, 0x80));
}

#[test]
fn test_callbacks_replace_geometry() {
    let (mut renderer, mut backend, mut data) = frame_with_atlas();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut list = DrawList::new();
    list.vtx_buffer.push(DrawVert::default());
    list.add_callback(Arc::new(move |list: &DrawList, cmd: &DrawCmd| {
        assert_eq!(list.vtx_buffer.len(), 1);
        assert_eq!(cmd.vtx_offset, 1);
        seen.fetch_add(1, Ordering::SeqCst);
    }));
    data.draw_lists.push(list);

    let stats = renderer
        .render(&mut data, &mut backend, Some("frame".to_string()))
        .unwrap()
        .draw
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(stats.callbacks, 1);
    assert_eq!(backend.draw_calls(), 0);
    assert_eq!(
        backend.commands(),
        &[RenderCommand::Begin("frame".to_string()), RenderCommand::End]
    );
}

#[test]
fn test_staging_capacity_persists_across_frames() {
    let (mut renderer, mut backend, mut data) = frame_with_atlas();
    let atlas = data.textures[0].tex_id();
    let clip = ClipRect::new(0.0, 0.0, 200.0, 100.0);

    let mut big = DrawList::new();
    for i in 0..75 {
        let min = Vec2::splat(i as f32);
        big.add_rect(min, min + Vec2::ONE, 0xFFFF_FFFF, atlas, clip);
    }
    data.draw_lists.push(big);
    renderer
        .render(&mut data, &mut backend, Some("frame".to_string()))
        .unwrap();
    // 300 vertices
    assert_eq!(renderer.draw_renderer().staging().vertex_capacity(), 512);

    data.draw_lists.clear();
    let mut small = DrawList::new();
    small.add_rect(Vec2::ZERO, Vec2::ONE, 0xFFFF_FFFF, atlas, clip);
    data.draw_lists.push(small);
    renderer
        .render(&mut data, &mut backend, Some("frame".to_string()))
        .unwrap();
    assert_eq!(renderer.draw_renderer().staging().vertex_capacity(), 512);
}

#[test]
fn test_every_draw_is_bracketed_by_its_clip() {
    let (mut renderer, mut backend, mut data) = frame_with_atlas();
    let atlas = data.textures[0].tex_id();

    let mut list = DrawList::new();
    list.add_rect(Vec2::ZERO, Vec2::ONE, 0xFFFF_FFFF, atlas, ClipRect::new(0.0, 0.0, 10.0, 10.0));
    list.add_rect(Vec2::ZERO, Vec2::ONE, 0xFFFF_FFFF, atlas, ClipRect::new(5.0, 5.0, 5.0, 20.0));
    list.add_rect(Vec2::ZERO, Vec2::ONE, 0xFFFF_FFFF, atlas, ClipRect::new(20.0, 0.0, 40.0, 10.0));
    data.draw_lists.push(list);

    let stats = renderer
        .render(&mut data, &mut backend, Some("frame".to_string()))
        .unwrap()
        .draw
        .unwrap();
    assert_eq!(stats.clipped, 1);

    let kinds: Vec<&str> = backend
        .commands()
        .iter()
        .map(|c| match c {
            RenderCommand::Begin(_) => "begin",
            RenderCommand::PushClip(_) => "push",
            RenderCommand::PopClip => "pop",
            RenderCommand::DrawTriangles { .. } => "draw",
            RenderCommand::End => "end",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["begin", "push", "draw", "pop", "push", "draw", "pop", "end"]
    );
}
