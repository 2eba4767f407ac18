//! Shared tunables for the emberfall ambient background
//!
//! Every empirically tuned constant lives here so the interactive viewer and the
//! headless runner draw exactly the same scene.

use bytemuck::{Pod, Zeroable};

/// Viewport width (logical px) below which the narrow/mobile rules apply
pub const NARROW_BREAKPOINT: f32 = 760.0;

/// Device pixel ratio ceiling; bounds fill-rate on dense displays
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

/// One normalized simulation step (60fps frame)
pub const FRAME_MS: f32 = 16.67;

/// Largest frame delta the simulation will integrate
pub const MAX_FRAME_DELTA_MS: f64 = 32.0;

/// Background colour painted each frame over the previous one
pub const FADE_RGB: [u8; 3] = [8, 10, 14];

/// Opacity of the per-frame fade; higher means shorter trails
pub const FADE_ALPHA: f32 = 0.34;

/// Where the hand sprite is loaded from, relative to the working directory
pub const SPRITE_PATH: &str = "assets/logo/logo_transparent.webp";

/// Uniform draw over `[min, min + span)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub min: f32,
    pub span: f32,
}

impl Span {
    pub const fn new(min: f32, span: f32) -> Self {
        Self { min, span }
    }

    /// Map a unit sample in `[0, 1)` onto the span
    pub fn at(&self, unit: f32) -> f32 {
        self.min + unit * self.span
    }

    pub fn max(&self) -> f32 {
        self.min + self.span
    }
}

/// Distance of the form `fixed + per_size * size`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margin {
    pub fixed: f32,
    pub per_size: f32,
}

impl Margin {
    pub const fn new(fixed: f32, per_size: f32) -> Self {
        Self { fixed, per_size }
    }

    pub fn of(&self, size: f32) -> f32 {
        self.fixed + self.per_size * size
    }
}

/// How a particle kind is painted
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticleStyle {
    /// Stroked rhombus
    Outline { saturation: f32, lightness: f32 },
    /// Filled core with a soft radial halo
    Glow {
        core_saturation: f32,
        core_lightness: f32,
        halo_saturation: f32,
        halo_lightness: f32,
        halo_alpha: f32,
        halo_radius: f32,
    },
}

/// Parameter ranges and motion constants for one particle kind
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleProfile {
    pub size: Span,
    pub speed: Span,
    pub alpha: Span,
    pub line_width: Span,
    pub hue: Span,
    /// Total width of the drift range, centred on zero
    pub drift_span: f32,
    pub sway_amp: Span,

    pub phase_rate: f32,
    pub sway_y_freq: f32,
    pub sway_y_amp: f32,
    pub flicker_base: f32,
    pub flicker_amp: f32,
    pub flicker_rate: f32,

    /// Horizontal overshoot before wrapping to the other edge
    pub wrap_margin: Margin,
    /// How far above the top edge a particle may rise before respawning
    pub exit_margin: Margin,
    /// Minimum distance below the bottom edge on respawn
    pub respawn_margin: Margin,
    /// Extra random respawn depth as a fraction of viewport height
    pub respawn_spread: f32,

    pub style: ParticleStyle,
}

/// Large, slow, faint outlined rhombi
pub const DIAMOND_PROFILE: ParticleProfile = ParticleProfile {
    size: Span::new(16.0, 44.0),
    speed: Span::new(0.012, 0.045),
    alpha: Span::new(0.011, 0.027),
    line_width: Span::new(0.6, 0.6),
    hue: Span::new(34.0, 11.0),
    drift_span: 0.03,
    sway_amp: Span::new(4.0, 12.0),
    phase_rate: 0.008,
    sway_y_freq: 0.85,
    sway_y_amp: 0.45,
    flicker_base: 0.9,
    flicker_amp: 0.07,
    flicker_rate: 0.7,
    wrap_margin: Margin::new(0.0, 1.0),
    exit_margin: Margin::new(0.0, 1.5),
    respawn_margin: Margin::new(0.0, 1.0),
    respawn_spread: 0.2,
    style: ParticleStyle::Outline {
        saturation: 70.0,
        lightness: 67.0,
    },
};

/// Small, fast, bright glowing sparks
pub const EMBER_PROFILE: ParticleProfile = ParticleProfile {
    size: Span::new(0.75, 2.05),
    speed: Span::new(0.02, 0.085),
    alpha: Span::new(0.11, 0.22),
    line_width: Span::new(0.0, 0.0),
    hue: Span::new(28.0, 22.0),
    drift_span: 0.08,
    sway_amp: Span::new(1.5, 4.0),
    phase_rate: 0.018,
    sway_y_freq: 0.9,
    sway_y_amp: 0.35,
    flicker_base: 0.84,
    flicker_amp: 0.16,
    flicker_rate: 1.9,
    wrap_margin: Margin::new(6.0, 0.0),
    exit_margin: Margin::new(12.0, 0.0),
    respawn_margin: Margin::new(10.0, 0.0),
    respawn_spread: 0.25,
    style: ParticleStyle::Glow {
        core_saturation: 100.0,
        core_lightness: 74.0,
        halo_saturation: 96.0,
        halo_lightness: 66.0,
        halo_alpha: 0.5,
        halo_radius: 4.8,
    },
};

/// Area-proportional entity count with a floor and a breakpoint-dependent cap
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationRule {
    /// Logical px² per entity
    pub area_divisor: f64,
    pub min: usize,
    pub cap_narrow: usize,
    pub cap_wide: usize,
}

pub const DIAMOND_POPULATION: PopulationRule = PopulationRule {
    area_divisor: 60_000.0,
    min: 14,
    cap_narrow: 27,
    cap_wide: 38,
};

pub const EMBER_POPULATION: PopulationRule = PopulationRule {
    area_divisor: 130_000.0,
    min: 6,
    cap_narrow: 16,
    cap_wide: 24,
};

/// Placement of the three hand regions for one device class
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandArrangement {
    /// Region size as a fraction of viewport width
    pub width_fraction: f32,
    /// Absolute region size cap in logical px
    pub size_cap: f32,
    /// Region centres in top-down normalized screen space
    pub centers: [[f32; 2]; 3],
}

pub const HAND_NARROW: HandArrangement = HandArrangement {
    width_fraction: 0.64,
    size_cap: 360.0,
    centers: [[0.27, 0.87], [0.73, 0.87], [0.5, 0.41]],
};

pub const HAND_WIDE: HandArrangement = HandArrangement {
    width_fraction: 0.35,
    size_cap: 515.0,
    centers: [[0.31, 0.86], [0.69, 0.86], [0.5, 0.38]],
};

/// Horizontal stretch applied to every region
pub const HAND_ASPECT_STRETCH: f32 = 1.14;

/// Fixed per-region rotation (radians)
pub const HAND_ROTATIONS: [f32; 3] = [-0.06, 0.06, 0.0];

/// Per-region phase offsets so the regions breathe out of step
pub const HAND_PHASES: [f32; 3] = [0.11, 0.53, 0.89];

/// Global warp intensity
pub const HAND_INTENSITY: f32 = 1.0;

/// Coefficients of the hand warp fragment program
///
/// `hand_fx.wgsl` carries the same literals; keep both in step.
pub mod warp {
    pub const FBM_OCTAVES: usize = 4;
    pub const FBM_SCALE: f32 = 5.4;
    pub const FBM_PHASE: [f32; 2] = [3.6, 2.2];
    pub const FBM_TIME: f32 = 0.24;

    pub const RIPPLE_A: [f32; 3] = [34.0, 1.1, 7.0];
    pub const RIPPLE_B: [f32; 3] = [56.0, 1.6, 4.0];
    pub const RIPPLE_WEIGHTS: [f32; 2] = [0.6, 0.4];
    /// Envelope is 1 inside the inner radius and 0 past the outer one
    pub const ENVELOPE_INNER: f32 = 0.02;
    pub const ENVELOPE_OUTER: f32 = 0.58;

    pub const CRAWL_A_SCALE: f32 = 12.5;
    pub const CRAWL_A_TIME: [f32; 4] = [0.34, -0.3, -0.29, 0.33];
    pub const CRAWL_B_SCALE: f32 = 20.0;
    pub const CRAWL_B_TIME: [f32; 4] = [0.46, 0.41, -0.39, -0.43];
    pub const CRAWL_B_PHASE: f32 = 1.3;
    pub const CRAWL_WEIGHTS: [f32; 2] = [0.7, 0.3];

    pub const RIPPLE_STRENGTH: f32 = 0.0023;
    pub const CRAWL_STRENGTH: f32 = 0.0058;

    /// Sprite texels below this alpha count as absent
    pub const ALPHA_THRESHOLD: f32 = 0.01;

    pub const PULSE_BASE: f32 = 0.965;
    pub const PULSE_AMP: f32 = 0.035;
    pub const PULSE_RATE: f32 = 0.95;
    pub const PULSE_PHASE: f32 = 6.283;
    pub const PULSE_NOISE: f32 = 1.8;

    pub const TINT_BASE: f32 = 0.94;
    pub const TINT_NOISE: f32 = 0.01;

    pub const REGION_ALPHA: f32 = 0.66;
    pub const OUTPUT_ALPHA: f32 = 0.88;
}

/// Every tunable in one record, for dumping next to experiment output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tunables {
    pub narrow_breakpoint: f32,
    pub max_device_pixel_ratio: f32,
    pub frame_ms: f32,
    pub max_frame_delta_ms: f64,
    pub fade_rgb: [u8; 3],
    pub fade_alpha: f32,
    pub sprite_path: String,
    pub diamond: ParticleProfile,
    pub ember: ParticleProfile,
    pub diamond_population: PopulationRule,
    pub ember_population: PopulationRule,
    pub hand_narrow: HandArrangement,
    pub hand_wide: HandArrangement,
    pub hand_aspect_stretch: f32,
    pub hand_rotations: [f32; 3],
    pub hand_phases: [f32; 3],
    pub hand_intensity: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            narrow_breakpoint: NARROW_BREAKPOINT,
            max_device_pixel_ratio: MAX_DEVICE_PIXEL_RATIO,
            frame_ms: FRAME_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            fade_rgb: FADE_RGB,
            fade_alpha: FADE_ALPHA,
            sprite_path: SPRITE_PATH.to_string(),
            diamond: DIAMOND_PROFILE,
            ember: EMBER_PROFILE,
            diamond_population: DIAMOND_POPULATION,
            ember_population: EMBER_POPULATION,
            hand_narrow: HAND_NARROW,
            hand_wide: HAND_WIDE,
            hand_aspect_stretch: HAND_ASPECT_STRETCH,
            hand_rotations: HAND_ROTATIONS,
            hand_phases: HAND_PHASES,
            hand_intensity: HAND_INTENSITY,
        }
    }
}

/// GPU-compatible uniforms for the hand warp fragment program
///
/// Centres are in bottom-up shader space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct HandFxUniforms {
    pub time: f32,
    pub intensity: f32,
    pub center_a: [f32; 2],
    pub center_b: [f32; 2],
    pub center_c: [f32; 2],
    pub scale_a: [f32; 2],
    pub scale_b: [f32; 2],
    pub scale_c: [f32; 2],
    pub rot_a: f32,
    pub rot_b: f32,
    pub rot_c: f32,
    pub _pad0: f32,
    pub _pad1: [f32; 2],
}

impl HandFxUniforms {
    pub fn centers(&self) -> [[f32; 2]; 3] {
        [self.center_a, self.center_b, self.center_c]
    }

    pub fn scales(&self) -> [[f32; 2]; 3] {
        [self.scale_a, self.scale_b, self.scale_c]
    }

    pub fn rotations(&self) -> [f32; 3] {
        [self.rot_a, self.rot_b, self.rot_c]
    }
}

/// WGSL binding layout for the hand warp program
///
/// ```wgsl
/// @group(0) @binding(0) var sprite_tex: texture_2d<f32>;
/// @group(0) @binding(1) var sprite_sampler: sampler;
/// @group(0) @binding(2) var<uniform> fx: HandFxUniforms;
/// ```
pub mod bindings {
    use super::*;

    pub const HAND_FX_BINDINGS: &str =
        "HandFx Group 0: sprite_tex(texture_2d), sprite_sampler(filtering), HandFxUniforms(uniform)";

    /// Byte size of `HandFxUniforms`; must match the WGSL struct
    pub const HAND_FX_UNIFORM_SIZE: usize = 80;

    /// Reject uniforms that would make the region mapping divide by zero
    pub fn validate_uniforms(uniforms: &HandFxUniforms) -> Result<(), String> {
        for (i, scale) in uniforms.scales().iter().enumerate() {
            if !(scale[0].is_finite() && scale[1].is_finite() && scale[0] > 0.0 && scale[1] > 0.0) {
                return Err(format!("region {} has degenerate scale {:?}", i, scale));
            }
        }
        if !uniforms.time.is_finite() {
            return Err(format!("non-finite time {}", uniforms.time));
        }
        Ok(())
    }

    pub fn log_binding_layouts() {
        log::info!("{}", HAND_FX_BINDINGS);
        log::info!("HandFxUniforms: {} bytes", HAND_FX_UNIFORM_SIZE);
    }
}
