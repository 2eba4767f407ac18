use emberfall_params::{
    HandFxUniforms, HAND_ASPECT_STRETCH, HAND_NARROW, HAND_ROTATIONS, HAND_WIDE,
};
use glam::{vec2, Vec2};

use crate::sim::Viewport;

/// Placement of one composited copy of the sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Normalized screen position, top-down
    pub center: Vec2,
    /// Region extent as a fraction of the viewport on each axis
    pub scale: Vec2,
    pub rotation: f32,
}

/// The three hand regions, recomputed on every resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLayout {
    pub regions: [Region; 3],
}

impl HandLayout {
    /// Region edge length in logical px for this viewport
    pub fn region_size(viewport: &Viewport) -> f32 {
        let arrangement = if viewport.is_narrow() { &HAND_NARROW } else { &HAND_WIDE };
        (viewport.width * arrangement.width_fraction).min(arrangement.size_cap)
    }

    pub fn for_viewport(viewport: &Viewport) -> Self {
        let arrangement = if viewport.is_narrow() { &HAND_NARROW } else { &HAND_WIDE };
        let size = Self::region_size(viewport);

        let scale = if viewport.width > 0.0 && viewport.height > 0.0 {
            vec2(
                size / viewport.width * HAND_ASPECT_STRETCH,
                size / viewport.height,
            )
        } else {
            Vec2::ZERO
        };

        let mut regions = [Region {
            center: Vec2::ZERO,
            scale,
            rotation: 0.0,
        }; 3];
        for (i, region) in regions.iter_mut().enumerate() {
            region.center = Vec2::from(arrangement.centers[i]);
            region.rotation = HAND_ROTATIONS[i];
        }

        Self { regions }
    }

    /// Pack into shader uniforms, flipping centres into bottom-up space
    pub fn uniforms(&self, time: f32, intensity: f32) -> HandFxUniforms {
        let center = |r: &Region| [r.center.x, 1.0 - r.center.y];
        let [a, b, c] = &self.regions;

        HandFxUniforms {
            time,
            intensity,
            center_a: center(a),
            center_b: center(b),
            center_c: center(c),
            scale_a: a.scale.to_array(),
            scale_b: b.scale.to_array(),
            scale_c: c.scale.to_array(),
            rot_a: a.rotation,
            rot_b: b.rotation,
            rot_c: c.rotation,
            _pad0: 0.0,
            _pad1: [0.0; 2],
        }
    }
}

impl Default for HandLayout {
    /// Wide arrangement with a fixed scale, used until the first resize
    fn default() -> Self {
        let mut regions = [Region {
            center: Vec2::ZERO,
            scale: Vec2::splat(0.46),
            rotation: 0.0,
        }; 3];
        for (i, region) in regions.iter_mut().enumerate() {
            region.center = Vec2::from(HAND_WIDE.centers[i]);
            region.rotation = HAND_ROTATIONS[i];
        }
        Self { regions }
    }
}
