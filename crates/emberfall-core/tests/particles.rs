mod common;

use common::{call_log, Call, RecordingSurface};
use emberfall_core::{Particle, ParticleKind, Viewport, DIAMOND_PROFILE, EMBER_PROFILE};
use glam::vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn viewport() -> Viewport {
    Viewport::new(1024.0, 768.0, 1.0)
}

#[test]
fn zero_delta_is_idempotent() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let vp = viewport();

    for kind in ParticleKind::ALL {
        for _ in 0..50 {
            let mut particle = Particle::spawn(kind, &vp, &mut rng);
            let before = particle;
            for _ in 0..10 {
                particle.update(&vp, 0.0, &mut rng);
            }
            assert_eq!(particle.pos, before.pos);
            assert_eq!(particle.phase, before.phase);
        }
    }
}

#[test]
fn diamonds_wrap_by_their_size() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let vp = viewport();
    let mut diamond = Particle::spawn(ParticleKind::Diamond, &vp, &mut rng);
    diamond.pos = vec2(-diamond.size - 0.01, 300.0);

    diamond.update(&vp, 0.0, &mut rng);
    assert_eq!(diamond.pos.x, vp.width + diamond.size);

    diamond.pos.x = vp.width + diamond.size + 0.01;
    diamond.update(&vp, 0.0, &mut rng);
    assert_eq!(diamond.pos.x, -diamond.size);
}

#[test]
fn embers_wrap_by_fixed_margin() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let vp = viewport();
    let mut ember = Particle::spawn(ParticleKind::Ember, &vp, &mut rng);
    ember.pos = vec2(-6.5, 300.0);

    ember.update(&vp, 0.0, &mut rng);
    assert_eq!(ember.pos.x, vp.width + 6.0);

    ember.pos.x = vp.width + 6.5;
    ember.update(&vp, 0.0, &mut rng);
    assert_eq!(ember.pos.x, -6.0);
}

#[test]
fn drift_carries_across_the_edge() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let vp = viewport();
    let mut ember = Particle::spawn(ParticleKind::Ember, &vp, &mut rng);
    ember.drift = -0.04;
    ember.pos = vec2(-5.99, 400.0);

    // A full 32ms frame moves it past the margin
    ember.update(&vp, 32.0, &mut rng);
    assert_eq!(ember.pos.x, vp.width + 6.0);
}

#[test]
fn respawn_enters_from_below() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let vp = viewport();

    for kind in ParticleKind::ALL {
        for _ in 0..200 {
            let mut particle = Particle::spawn(kind, &vp, &mut rng);
            particle.pos.y = -1000.0;
            particle.update(&vp, 16.67, &mut rng);
            assert!(particle.pos.y > vp.height, "{} respawned at {}", kind.label(), particle.pos.y);
            assert!((0.0..=vp.width).contains(&particle.pos.x));
        }
    }
}

#[test]
fn particles_rise_over_time() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let vp = viewport();
    let mut diamond = Particle::spawn(ParticleKind::Diamond, &vp, &mut rng);
    diamond.pos.y = 500.0;
    let speed = diamond.speed;

    diamond.update(&vp, 16.67, &mut rng);
    assert!((diamond.pos.y - (500.0 - speed * 10.0)).abs() < 1e-3);
}

#[test]
fn reset_draws_within_profile_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let vp = viewport();

    for _ in 0..500 {
        let d = Particle::spawn(ParticleKind::Diamond, &vp, &mut rng);
        assert!(d.size >= DIAMOND_PROFILE.size.min && d.size <= DIAMOND_PROFILE.size.max());
        assert!(d.speed >= DIAMOND_PROFILE.speed.min && d.speed <= DIAMOND_PROFILE.speed.max());
        assert!(d.drift.abs() <= DIAMOND_PROFILE.drift_span / 2.0);

        let e = Particle::spawn(ParticleKind::Ember, &vp, &mut rng);
        assert!(e.size >= EMBER_PROFILE.size.min && e.size <= EMBER_PROFILE.size.max());
        assert!(e.alpha >= EMBER_PROFILE.alpha.min && e.alpha <= EMBER_PROFILE.alpha.max());
    }
}

#[test]
fn display_sway_leaves_position_alone() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let vp = viewport();
    let ember = Particle::spawn(ParticleKind::Ember, &vp, &mut rng);

    let pose = ember.pose();
    assert!((pose.pos - ember.pos).length() <= ember.sway_amp * 1.2);
}

fn flickered(alpha: f32, phase: f32, base: f32, amp: f32, rate: f32) -> f32 {
    alpha * (base + (phase * rate).sin() * amp)
}

#[test]
fn diamond_outline_surrounds_display_position() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let vp = viewport();
    let log = call_log();
    let mut surface = RecordingSurface::new(&log);

    for step in 0..20 {
        let mut diamond = Particle::spawn(ParticleKind::Diamond, &vp, &mut rng);
        diamond.phase = step as f32 * 0.61;
        let pose = diamond.pose();
        let p = &DIAMOND_PROFILE;
        let expected_alpha = flickered(diamond.alpha, diamond.phase, p.flicker_base, p.flicker_amp, p.flicker_rate);
        assert!((pose.alpha - expected_alpha).abs() < 1e-5);

        log.borrow_mut().clear();
        diamond.draw(&mut surface);

        let calls = log.borrow();
        assert_eq!(calls.len(), 1);
        let Call::Polygon {
            points,
            color,
            line_width,
        } = &calls[0]
        else {
            panic!("expected an outline, got {:?}", calls[0]);
        };

        let s = diamond.size;
        let c = pose.pos;
        let corners = [vec2(0.0, -s), vec2(s, 0.0), vec2(0.0, s), vec2(-s, 0.0)];
        assert_eq!(points.len(), 4);
        for (point, corner) in points.iter().zip(corners) {
            assert!((*point - (c + corner)).length() < 1e-4);
            assert!(((*point - c).length() - s).abs() < 1e-4);
        }
        assert!((color.a - pose.alpha).abs() < 1e-5);
        assert_eq!(*line_width, diamond.line_width);
    }
}

#[test]
fn ember_glow_spans_its_halo_radius() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let vp = viewport();
    let log = call_log();
    let mut surface = RecordingSurface::new(&log);

    for step in 0..20 {
        let mut ember = Particle::spawn(ParticleKind::Ember, &vp, &mut rng);
        ember.phase = step as f32 * 0.47;
        let pose = ember.pose();
        let p = &EMBER_PROFILE;
        let expected_alpha = flickered(ember.alpha, ember.phase, p.flicker_base, p.flicker_amp, p.flicker_rate);
        assert!((pose.alpha - expected_alpha).abs() < 1e-5);

        log.borrow_mut().clear();
        ember.draw(&mut surface);

        let calls = log.borrow();
        assert_eq!(calls.len(), 2);
        let Call::Glow {
            center,
            radius,
            inner,
            outer,
        } = &calls[0]
        else {
            panic!("expected the halo first, got {:?}", calls[0]);
        };
        assert_eq!(*center, pose.pos);
        assert!((*radius - ember.size * 4.8).abs() < 1e-4);
        assert!((inner.a - pose.alpha * 0.5).abs() < 1e-5);
        assert_eq!(outer.a, 0.0);
        assert_eq!((outer.r, outer.g, outer.b), (inner.r, inner.g, inner.b));

        let Call::Circle {
            center,
            radius,
            color,
        } = &calls[1]
        else {
            panic!("expected the core second, got {:?}", calls[1]);
        };
        assert_eq!(*center, pose.pos);
        assert_eq!(*radius, ember.size);
        assert!((color.a - pose.alpha).abs() < 1e-5);
    }
}
