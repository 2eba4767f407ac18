//! CPU evaluation of the hand warp fragment program.
//!
//! Mirrors `shaders/hand_fx.wgsl` line for line so the software backend and
//! the GPU backend produce the same picture.

use emberfall_params::{warp, HandFxUniforms, HAND_PHASES};
use glam::{vec2, Vec2, Vec2Swizzles, Vec3, Vec4, Vec4Swizzles};

use crate::fx::SpriteTexture;

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn fract2(p: Vec2) -> Vec2 {
    p - p.floor()
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in `[0, 1)` per lattice point
pub fn hash(p: Vec2) -> f32 {
    fract((p.dot(vec2(127.1, 311.7))).sin() * 43758.547)
}

/// Smoothly interpolated lattice noise in `[0, 1]`
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = fract2(p);

    let a = hash(i);
    let b = hash(i + vec2(1.0, 0.0));
    let c = hash(i + vec2(0.0, 1.0));
    let d = hash(i + vec2(1.0, 1.0));

    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Four octaves, each at double frequency and half amplitude
pub fn fbm(mut p: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amp = 0.5;
    for _ in 0..warp::FBM_OCTAVES {
        value += amp * value_noise(p);
        p *= 2.0;
        amp *= 0.5;
    }
    value
}

/// Same convention as GLSL `mat2(c, -s, s, c) * p`
pub fn rotate2d(p: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    vec2(c * p.x + s * p.y, -s * p.x + c * p.y)
}

/// Accumulate `layer` beneath whatever coverage `base` already has
pub fn composite(base: Vec4, layer: Vec4) -> Vec4 {
    let remaining = 1.0 - base.w;
    let rgb = base.xyz() + layer.xyz() * layer.w * remaining;
    let a = base.w + layer.w * remaining;
    rgb.extend(a)
}

/// Map an output coordinate into a region's local unit square
pub fn region_local(uv: Vec2, center: Vec2, scale: Vec2, rotation: f32) -> Option<Vec2> {
    let p = (uv - center) / scale + Vec2::splat(0.5);
    let p = rotate2d(p - Vec2::splat(0.5), rotation) + Vec2::splat(0.5);
    let inside = p.x >= 0.0 && p.x <= 1.0 && p.y >= 0.0 && p.y <= 1.0;
    inside.then_some(p)
}

/// Noise-driven offset added to the sample coordinate at local point `p`
pub fn warp_offset(p: Vec2, time: f32, intensity: f32, phase: f32) -> Vec2 {
    let from_center = p - Vec2::splat(0.5);
    let radius = from_center.length();
    let dir = if radius > 0.0001 {
        from_center / radius
    } else {
        vec2(0.0, 1.0)
    };

    let [ra_freq, ra_rate, ra_phase] = warp::RIPPLE_A;
    let [rb_freq, rb_rate, rb_phase] = warp::RIPPLE_B;
    let ripple_a = (radius * ra_freq - time * ra_rate + phase * ra_phase).sin();
    let ripple_b = (radius * rb_freq - time * rb_rate + phase * rb_phase).sin();
    let ripple = ripple_a * warp::RIPPLE_WEIGHTS[0] + ripple_b * warp::RIPPLE_WEIGHTS[1];

    let envelope = smoothstep(warp::ENVELOPE_OUTER, warp::ENVELOPE_INNER, radius);

    let ta = warp::CRAWL_A_TIME;
    let crawl_a = vec2(
        value_noise(p * warp::CRAWL_A_SCALE + vec2(time * ta[0], time * ta[1]) + phase),
        value_noise(p.yx() * warp::CRAWL_A_SCALE + vec2(time * ta[2], time * ta[3]) + phase),
    ) - Vec2::splat(0.5);

    let tb = warp::CRAWL_B_TIME;
    let pb = phase * warp::CRAWL_B_PHASE;
    let crawl_b = vec2(
        value_noise(p * warp::CRAWL_B_SCALE + vec2(time * tb[0], time * tb[1]) + pb),
        value_noise(p.yx() * warp::CRAWL_B_SCALE + vec2(time * tb[2], time * tb[3]) + pb),
    ) - Vec2::splat(0.5);

    let crawl = crawl_a * warp::CRAWL_WEIGHTS[0] + crawl_b * warp::CRAWL_WEIGHTS[1];

    dir * ripple * (warp::RIPPLE_STRENGTH * intensity * envelope)
        + crawl * (warp::CRAWL_STRENGTH * intensity)
}

/// One region as the program sees it, in bottom-up shader space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionParams {
    pub center: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub phase: f32,
}

impl RegionParams {
    /// Region `index` (0..3) of the packed uniforms
    pub fn from_uniforms(uniforms: &HandFxUniforms, index: usize) -> Self {
        Self {
            center: Vec2::from(uniforms.centers()[index]),
            scale: Vec2::from(uniforms.scales()[index]),
            rotation: uniforms.rotations()[index],
            phase: HAND_PHASES[index],
        }
    }
}

/// Slow opacity breathing, offset per region by its phase
pub fn pulse(time: f32, phase: f32, noise: f32) -> f32 {
    let angle = time * warp::PULSE_RATE + phase * warp::PULSE_PHASE + noise * warp::PULSE_NOISE;
    warp::PULSE_BASE + warp::PULSE_AMP * angle.sin()
}

/// Premultiplied colour of one region at output coordinate `uv`
pub fn sample_region(
    sprite: &SpriteTexture,
    region: &RegionParams,
    uv: Vec2,
    time: f32,
    intensity: f32,
) -> Vec4 {
    let phase = region.phase;
    let Some(p) = region_local(uv, region.center, region.scale, region.rotation) else {
        return Vec4::ZERO;
    };

    let n = fbm(
        p * warp::FBM_SCALE
            + vec2(phase * warp::FBM_PHASE[0], phase * warp::FBM_PHASE[1])
            + Vec2::splat(time * warp::FBM_TIME),
    );

    let offset = warp_offset(p, time, intensity, phase);
    let sample_uv = (p + offset).clamp(Vec2::ZERO, Vec2::ONE);
    let texel = sprite.sample(sample_uv);

    if texel.w < warp::ALPHA_THRESHOLD {
        return Vec4::ZERO;
    }

    let color: Vec3 = texel.xyz() * (warp::TINT_BASE + warp::TINT_NOISE * n);

    color.extend(texel.w * pulse(time, phase, n) * warp::REGION_ALPHA)
}

/// Final output colour at `uv` (bottom-up, `[0, 1]²`)
pub fn shade(sprite: &SpriteTexture, uniforms: &HandFxUniforms, uv: Vec2) -> Vec4 {
    let mut color = Vec4::ZERO;
    for i in 0..3 {
        let region = RegionParams::from_uniforms(uniforms, i);
        let layer = sample_region(sprite, &region, uv, uniforms.time, uniforms.intensity);
        color = composite(color, layer);
    }

    color.w *= warp::OUTPUT_ALPHA;
    color
}
