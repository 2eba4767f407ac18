use emberfall_params::{
    ParticleProfile, ParticleStyle, PopulationRule, DIAMOND_POPULATION, DIAMOND_PROFILE,
    EMBER_POPULATION, EMBER_PROFILE, FRAME_MS,
};
use glam::{vec2, Vec2};
use rand::Rng;
use std::f32::consts::TAU;

use crate::raster::{Hsla, Surface2d};
use crate::sim::Viewport;

/// The two particle families; same state, different ranges and looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Diamond,
    Ember,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 2] = [ParticleKind::Diamond, ParticleKind::Ember];

    pub fn profile(&self) -> &'static ParticleProfile {
        match self {
            ParticleKind::Diamond => &DIAMOND_PROFILE,
            ParticleKind::Ember => &EMBER_PROFILE,
        }
    }

    pub fn population(&self) -> &'static PopulationRule {
        match self {
            ParticleKind::Diamond => &DIAMOND_POPULATION,
            ParticleKind::Ember => &EMBER_POPULATION,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParticleKind::Diamond => "diamond",
            ParticleKind::Ember => "ember",
        }
    }
}

/// Where and how strongly a particle shows this frame
///
/// Differs from the simulated position by the sway offset; wrap and respawn
/// only ever look at the simulated one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pos: Vec2,
    pub alpha: f32,
}

/// One drifting particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub size: f32,
    /// Upward drift per normalized step
    pub speed: f32,
    pub alpha: f32,
    pub line_width: f32,
    pub hue: f32,
    /// Horizontal velocity bias, may be negative
    pub drift: f32,
    pub phase: f32,
    pub sway_amp: f32,
}

impl Particle {
    /// Create a particle somewhere inside the viewport
    pub fn spawn<R: Rng + ?Sized>(kind: ParticleKind, viewport: &Viewport, rng: &mut R) -> Self {
        let mut particle = Self {
            kind,
            pos: Vec2::ZERO,
            size: 1.0,
            speed: 0.0,
            alpha: 0.0,
            line_width: 0.0,
            hue: 0.0,
            drift: 0.0,
            phase: 0.0,
            sway_amp: 0.0,
        };
        particle.reset(viewport, false, rng);
        particle
    }

    /// Redraw every stochastic parameter
    ///
    /// With `spawn_from_bottom` the particle is placed below the bottom edge at
    /// a random depth so re-entries are staggered; otherwise anywhere on screen.
    pub fn reset<R: Rng + ?Sized>(&mut self, viewport: &Viewport, spawn_from_bottom: bool, rng: &mut R) {
        let p = self.kind.profile();

        self.size = p.size.at(rng.gen::<f32>());
        self.speed = p.speed.at(rng.gen::<f32>());
        self.alpha = p.alpha.at(rng.gen::<f32>());
        self.line_width = p.line_width.at(rng.gen::<f32>());
        self.hue = p.hue.at(rng.gen::<f32>());
        self.drift = (rng.gen::<f32>() - 0.5) * p.drift_span;
        self.phase = rng.gen::<f32>() * TAU;
        self.sway_amp = p.sway_amp.at(rng.gen::<f32>());

        let x = rng.gen::<f32>() * viewport.width;
        let y = if spawn_from_bottom {
            viewport.height
                + p.respawn_margin.of(self.size)
                + rng.gen::<f32>() * (viewport.height * p.respawn_spread)
        } else {
            rng.gen::<f32>() * viewport.height
        };
        self.pos = vec2(x, y);
    }

    /// Advance by `delta_ms` of wall time, normalized to 60fps steps
    pub fn update<R: Rng + ?Sized>(&mut self, viewport: &Viewport, delta_ms: f32, rng: &mut R) {
        let p = self.kind.profile();
        let delta = delta_ms / FRAME_MS;

        self.pos.y -= self.speed * delta * 10.0;
        self.phase += p.phase_rate * delta;
        self.pos.x += self.drift * delta;

        let wrap = p.wrap_margin.of(self.size);
        if self.pos.x < -wrap {
            self.pos.x = viewport.width + wrap;
        }
        if self.pos.x > viewport.width + wrap {
            self.pos.x = -wrap;
        }

        if self.pos.y < -p.exit_margin.of(self.size) {
            self.reset(viewport, true, rng);
        }
    }

    /// Swayed display position and flickering opacity
    pub fn pose(&self) -> Pose {
        let p = self.kind.profile();
        let sway = vec2(
            self.phase.sin() * self.sway_amp,
            (self.phase * p.sway_y_freq).cos() * (self.sway_amp * p.sway_y_amp),
        );
        let flicker = p.flicker_base + (self.phase * p.flicker_rate).sin() * p.flicker_amp;

        Pose {
            pos: self.pos + sway,
            alpha: self.alpha * flicker,
        }
    }

    pub fn draw<S: Surface2d + ?Sized>(&self, surface: &mut S) {
        let pose = self.pose();
        let c = pose.pos;

        match self.kind.profile().style {
            ParticleStyle::Outline {
                saturation,
                lightness,
            } => {
                let s = self.size;
                let outline = [
                    vec2(c.x, c.y - s),
                    vec2(c.x + s, c.y),
                    vec2(c.x, c.y + s),
                    vec2(c.x - s, c.y),
                ];
                let color = Hsla::new(self.hue, saturation, lightness, pose.alpha);
                surface.stroke_polygon(&outline, color.to_rgba(), self.line_width);
            }
            ParticleStyle::Glow {
                core_saturation,
                core_lightness,
                halo_saturation,
                halo_lightness,
                halo_alpha,
                halo_radius,
            } => {
                let halo = Hsla::new(self.hue, halo_saturation, halo_lightness, pose.alpha * halo_alpha);
                surface.fill_radial_glow(
                    c,
                    self.size * halo_radius,
                    halo.to_rgba(),
                    halo.with_alpha(0.0).to_rgba(),
                );

                let core = Hsla::new(self.hue, core_saturation, core_lightness, pose.alpha);
                surface.fill_circle(c, self.size, core.to_rgba());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawn_stays_inside_viewport() {
        let vp = Viewport::new(640.0, 480.0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for kind in ParticleKind::ALL {
            for _ in 0..200 {
                let p = Particle::spawn(kind, &vp, &mut rng);
                assert!(p.pos.x >= 0.0 && p.pos.x <= vp.width);
                assert!(p.pos.y >= 0.0 && p.pos.y <= vp.height);
            }
        }
    }

    #[test]
    fn flicker_keeps_alpha_below_one() {
        let vp = Viewport::new(640.0, 480.0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for kind in ParticleKind::ALL {
            let mut p = Particle::spawn(kind, &vp, &mut rng);
            for step in 0..100 {
                p.phase = step as f32 * 0.37;
                let pose = p.pose();
                assert!(pose.alpha > 0.0 && pose.alpha < 1.0);
            }
        }
    }
}
