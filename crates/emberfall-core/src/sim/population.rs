use rand::Rng;

use crate::sim::{Particle, ParticleKind, Viewport};

/// Entity count for `kind` at this viewport
///
/// Proportional to area, never below the floor, capped lower on narrow
/// viewports.
pub fn target_count(kind: ParticleKind, viewport: &Viewport) -> usize {
    let rule = kind.population();
    let area_count = (viewport.area() / rule.area_divisor).round() as usize;
    let cap = if viewport.is_narrow() {
        rule.cap_narrow
    } else {
        rule.cap_wide
    };
    area_count.min(cap).max(rule.min)
}

/// Live particles of one kind
#[derive(Debug, Clone)]
pub struct Population {
    pub kind: ParticleKind,
    pub particles: Vec<Particle>,
}

impl Population {
    pub fn new(kind: ParticleKind) -> Self {
        Self {
            kind,
            particles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Grow or shrink to the target count for `viewport`
    ///
    /// Shrinking drops the most recently created particles; growing appends
    /// fresh ones spread over the viewport. Returns the new length.
    pub fn sync<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) -> usize {
        let target = target_count(self.kind, viewport);

        if self.particles.len() > target {
            self.particles.truncate(target);
        } else {
            self.particles.reserve(target - self.particles.len());
            while self.particles.len() < target {
                self.particles.push(Particle::spawn(self.kind, viewport, rng));
            }
        }

        log::debug!("{} population synced to {}", self.kind.label(), target);
        target
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}
