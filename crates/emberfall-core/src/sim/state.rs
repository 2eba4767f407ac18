use rand_chacha::ChaCha8Rng;

use crate::raster::Surface2d;
use crate::sim::{ParticleKind, Population, Viewport};

/// Simulation state owned by the frame loop
pub struct SimState {
    pub viewport: Viewport,
    pub diamonds: Population,
    pub embers: Population,
    rng: ChaCha8Rng,
}

impl SimState {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            viewport: Viewport::default(),
            diamonds: Population::new(ParticleKind::Diamond),
            embers: Population::new(ParticleKind::Ember),
            rng,
        }
    }

    /// Adopt a new viewport and resync both populations
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.diamonds.sync(&self.viewport, &mut self.rng);
        self.embers.sync(&self.viewport, &mut self.rng);
    }

    /// Update then draw every diamond, then every ember, in creation order
    pub fn advance<S: Surface2d + ?Sized>(&mut self, delta_ms: f32, surface: &mut S) {
        let viewport = self.viewport;
        for population in [&mut self.diamonds, &mut self.embers] {
            for particle in population.particles.iter_mut() {
                particle.update(&viewport, delta_ms, &mut self.rng);
                particle.draw(surface);
            }
        }
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.diamonds.len(), self.embers.len())
    }
}
