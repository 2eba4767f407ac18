mod common;

use common::{call_log, solid_sprite, Call, RecordingFx};
use emberfall_core::{
    FxError, HandFxLayer, HandLayout, SoftwareFx, SpriteLoad, Viewport, HAND_NARROW, HAND_WIDE,
};
use glam::Vec2;

fn overlay_alpha(layer: &HandFxLayer<SoftwareFx>, x: u32, y: u32) -> u8 {
    layer
        .backend()
        .overlay()
        .and_then(|p| p.pixel(x, y))
        .map(|px| px.alpha())
        .unwrap_or(0)
}

fn overlay_is_blank(layer: &HandFxLayer<SoftwareFx>) -> bool {
    layer
        .backend()
        .overlay()
        .map(|p| p.data().iter().all(|b| *b == 0))
        .unwrap_or(true)
}

#[test]
fn layout_switches_at_breakpoint() {
    let narrow = HandLayout::for_viewport(&Viewport::new(759.0, 900.0, 1.0));
    let wide = HandLayout::for_viewport(&Viewport::new(760.0, 900.0, 1.0));

    for i in 0..3 {
        assert_eq!(narrow.regions[i].center, Vec2::from(HAND_NARROW.centers[i]));
        assert_eq!(wide.regions[i].center, Vec2::from(HAND_WIDE.centers[i]));
    }
}

#[test]
fn region_size_grows_then_holds_at_cap() {
    let mut previous = 0.0;
    for width in (800..4000).step_by(50) {
        let vp = Viewport::new(width as f32, 1000.0, 1.0);
        let size = HandLayout::region_size(&vp);
        assert!(size >= previous);
        assert!(size <= HAND_WIDE.size_cap);

        let layout = HandLayout::for_viewport(&vp);
        let scale_y = layout.regions[0].scale.y;
        assert!((scale_y * vp.height - size).abs() < 1e-3);
        previous = size;
    }
    assert_eq!(previous, HAND_WIDE.size_cap);

    let mut previous = 0.0;
    for width in (100..760).step_by(20) {
        let vp = Viewport::new(width as f32, 1000.0, 1.0);
        let size = HandLayout::region_size(&vp);
        assert!(size >= previous);
        assert!(size <= HAND_NARROW.size_cap);
        let curve = (width as f32 * HAND_NARROW.width_fraction).min(HAND_NARROW.size_cap);
        assert!((size - curve).abs() < 1e-3);
        previous = size;
    }
    assert_eq!(previous, HAND_NARROW.size_cap);

    let phone = HandLayout::region_size(&Viewport::new(400.0, 800.0, 1.0));
    assert!((phone - 256.0).abs() < 1e-3);
}

#[test]
fn uniforms_flip_centres_into_shader_space() {
    let layout = HandLayout::for_viewport(&Viewport::new(1280.0, 800.0, 1.0));
    let uniforms = layout.uniforms(1.5, 1.0);

    assert_eq!(uniforms.time, 1.5);
    assert!((uniforms.center_c[1] - (1.0 - HAND_WIDE.centers[2][1])).abs() < 1e-6);
    assert_eq!(uniforms.center_a[0], HAND_WIDE.centers[0][0]);
}

#[test]
fn render_is_noop_until_sprite_arrives() {
    let (tx, load) = SpriteLoad::pending();
    let mut layer = HandFxLayer::new(SoftwareFx::new().expect("software backend"), load);
    layer.resize(64.0, 48.0, 1.0);
    assert_eq!(layer.layout().regions[2].center, Vec2::from(HAND_NARROW.centers[2]));

    assert!(!layer.render(0.5));
    assert!(!layer.is_active());
    assert!(overlay_is_blank(&layer));

    tx.send(Ok(solid_sprite(8))).expect("layer still listening");
    assert!(layer.render(0.5));
    assert!(layer.is_active());

    // Upper-middle region in the narrow arrangement
    let x = (HAND_NARROW.centers[2][0] * 64.0) as u32;
    let y = (HAND_NARROW.centers[2][1] * 48.0) as u32;
    assert!(overlay_alpha(&layer, x, y) > 100);
    assert_eq!(overlay_alpha(&layer, 0, 0), 0);
}

#[test]
fn each_frame_clears_before_drawing() {
    let log = call_log();
    let mut layer = HandFxLayer::new(RecordingFx::new(&log), SpriteLoad::ready(solid_sprite(2)));
    layer.resize(1024.0, 768.0, 2.0);
    layer.render(0.0);
    layer.render(0.016);

    assert_eq!(
        *log.borrow(),
        vec![
            Call::FxResize([2048, 1536]),
            Call::FxUpload,
            Call::FxClear,
            Call::FxDraw,
            Call::FxClear,
            Call::FxDraw,
        ]
    );
}

#[test]
fn degenerate_viewport_skips_frames() {
    let log = call_log();
    let mut layer = HandFxLayer::new(RecordingFx::new(&log), SpriteLoad::ready(solid_sprite(2)));
    layer.resize(0.0, 0.0, 1.0);

    assert!(!layer.render(1.0));
    assert!(layer.is_active());
    assert!(!log.borrow().contains(&Call::FxDraw));
}

#[test]
fn failed_backend_means_no_layer() {
    let failed: Result<SoftwareFx, FxError> = Err(FxError::Program("link failed".into()));
    let layer = HandFxLayer::create(failed, SpriteLoad::ready(solid_sprite(2)));
    assert!(layer.is_none());
}

#[test]
fn failed_load_stays_inactive() {
    let (tx, load) = SpriteLoad::pending();
    let mut layer = HandFxLayer::new(SoftwareFx::new().expect("software backend"), load);
    layer.resize(32.0, 32.0, 1.0);

    tx.send(Err(FxError::Context("decode failed".into())))
        .expect("layer still listening");
    for frame in 0..5 {
        assert!(!layer.render(frame as f32));
    }
    assert!(!layer.is_active());
    assert!(overlay_is_blank(&layer));
}

#[test]
fn dropped_loader_stays_inactive() {
    let (tx, load) = SpriteLoad::pending();
    drop(tx);
    let mut layer = HandFxLayer::new(SoftwareFx::new().expect("software backend"), load);
    layer.resize(32.0, 32.0, 1.0);

    assert!(!layer.render(0.0));
    assert!(!layer.is_active());
}
