mod common;

use common::{call_log, solid_sprite, Call, RecordingFx, RecordingSurface};
use emberfall_core::{
    Background, HandFxLayer, Rgba, SpriteLoad, FADE_ALPHA, FADE_RGB, MAX_FRAME_DELTA_MS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type TestBackground = Background<RecordingSurface, RecordingFx>;

fn background(log: &common::CallLog, with_fx: bool) -> TestBackground {
    let fx = with_fx.then(|| HandFxLayer::new(RecordingFx::new(log), SpriteLoad::ready(solid_sprite(4))));
    let mut bg = Background::attach(
        Some(RecordingSurface::new(log)),
        fx,
        ChaCha8Rng::seed_from_u64(42),
    )
    .expect("surface present");
    bg.resize(800.0, 600.0, 1.0);
    bg.start();
    log.borrow_mut().clear();
    bg
}

#[test]
fn missing_surface_disables_background() {
    let bg = TestBackground::attach(None, None, ChaCha8Rng::seed_from_u64(0));
    assert!(bg.is_none());
}

#[test]
fn frame_runs_fade_then_diamonds_then_embers_then_overlay() {
    let log = call_log();
    let mut bg = background(&log, true);

    let report = bg.tick(1000.0).expect("running");
    assert_eq!((report.diamonds, report.embers), (14, 6));
    assert!(report.fx_rendered);
    assert!(report.fx_active);

    let calls = log.borrow();
    assert_eq!(calls[0], Call::FillRect(Rgba::from_rgb8(FADE_RGB, FADE_ALPHA)));

    let mut expected = vec!["fill_rect"];
    expected.extend(std::iter::repeat("polygon").take(14));
    for _ in 0..6 {
        expected.push("glow");
        expected.push("circle");
    }
    expected.extend(["fx_upload", "fx_clear", "fx_draw"]);

    let names: Vec<&str> = calls.iter().map(Call::name).collect();
    assert_eq!(names, expected);
}

#[test]
fn overlay_receives_seconds() {
    let log = call_log();
    let mut bg = background(&log, true);
    bg.tick(2500.0);

    let uniforms = bg
        .fx()
        .and_then(|fx| fx.backend().last_uniforms)
        .expect("overlay drew");
    assert!((uniforms.time - 2.5).abs() < 1e-6);
}

#[test]
fn delta_is_latched_then_clamped() {
    let log = call_log();
    let mut bg = background(&log, false);

    assert_eq!(bg.tick(100.0).map(|r| r.delta_ms), Some(0.0));
    assert_eq!(bg.tick(116.0).map(|r| r.delta_ms), Some(16.0));
    assert_eq!(bg.tick(10_000.0).map(|r| r.delta_ms), Some(MAX_FRAME_DELTA_MS));
}

#[test]
fn stopped_background_ignores_ticks() {
    let log = call_log();
    let mut bg = background(&log, false);
    assert!(bg.is_running());
    bg.tick(0.0);
    bg.stop();
    assert!(!bg.is_running());
    log.borrow_mut().clear();

    assert!(bg.tick(16.0).is_none());
    assert!(log.borrow().is_empty());

    bg.start();
    assert!(bg.is_running());
    assert_eq!(bg.tick(5_000.0).map(|r| r.delta_ms), Some(0.0));
}

#[test]
fn resize_scales_backing_and_forwards_to_overlay() {
    let log = call_log();
    let mut bg = background(&log, true);

    bg.resize(1920.0, 1080.0, 3.0);
    let calls = log.borrow();
    assert_eq!(calls[0], Call::Resize(3840, 2160));
    assert_eq!(calls[1], Call::Transform(2.0));
    assert!(calls.contains(&Call::FxResize([3840, 2160])));
    drop(calls);

    assert_eq!(bg.state().counts(), (35, 16));
}

#[test]
fn particle_layer_runs_without_overlay() {
    let log = call_log();
    let mut bg = background(&log, false);
    let report = bg.tick(0.0).expect("running");

    assert!(!report.fx_rendered);
    assert!(!report.fx_active);
    assert!(!log.borrow().iter().any(|c| matches!(c, Call::FxClear | Call::FxDraw)));
}
