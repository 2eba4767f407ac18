//! Frame scheduler: owns the simulation and drives one frame per host tick.

use emberfall_params::{FADE_ALPHA, FADE_RGB, MAX_FRAME_DELTA_MS};
use glam::Vec2;
use rand_chacha::ChaCha8Rng;

use crate::fx::{FxBackend, HandFxLayer};
use crate::raster::{Rgba, Surface2d};
use crate::sim::{SimState, Viewport};

/// Turns host timestamps into clamped frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call, within `[0, MAX_FRAME_DELTA_MS]`
    ///
    /// The first call latches `now` and returns zero.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let last = self.last_time.replace(now_ms).unwrap_or(now_ms);
        let delta = now_ms - last;
        if delta.is_finite() {
            delta.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        }
    }

    /// Forget the latched time; the next delta is zero
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

/// What one tick did, for host metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub delta_ms: f64,
    pub diamonds: usize,
    pub embers: usize,
    pub fx_active: bool,
    pub fx_rendered: bool,
}

/// The ambient background: particle layer plus optional hand overlay
pub struct Background<S: Surface2d, B: FxBackend> {
    surface: S,
    state: SimState,
    fx: Option<HandFxLayer<B>>,
    clock: FrameClock,
    running: bool,
}

impl<S: Surface2d, B: FxBackend> Background<S, B> {
    /// Bind to the host's drawing surface
    ///
    /// Without a surface there is nothing to draw on and no background.
    pub fn attach(surface: Option<S>, fx: Option<HandFxLayer<B>>, rng: ChaCha8Rng) -> Option<Self> {
        let surface = surface?;
        Some(Self {
            surface,
            state: SimState::new(rng),
            fx,
            clock: FrameClock::new(),
            running: false,
        })
    }

    /// Apply new window metrics: backing store, transform, populations, overlay
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        let viewport = Viewport::new(width, height, device_pixel_ratio);
        let [backing_w, backing_h] = viewport.backing_size();

        self.surface.resize(backing_w, backing_h);
        self.surface.set_transform(viewport.device_pixel_ratio);
        self.state.set_viewport(viewport);

        if let Some(fx) = self.fx.as_mut() {
            fx.resize(viewport.width, viewport.height, viewport.device_pixel_ratio);
        }

        let (diamonds, embers) = self.state.counts();
        log::info!(
            "Resized to {}x{} @{} ({}x{} backing): {} diamonds, {} embers",
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio,
            backing_w,
            backing_h,
            diamonds,
            embers
        );
    }

    pub fn start(&mut self) {
        self.running = true;
        self.clock.reset();
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame at host time `timestamp_ms`; `None` while stopped
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<FrameReport> {
        if !self.running {
            return None;
        }

        let delta_ms = self.clock.delta(timestamp_ms);
        let viewport = self.state.viewport;

        // Partial clear: earlier frames show through as trails
        self.surface.fill_rect(
            Vec2::ZERO,
            Vec2::new(viewport.width, viewport.height),
            Rgba::from_rgb8(FADE_RGB, FADE_ALPHA),
        );

        self.state.advance(delta_ms as f32, &mut self.surface);

        let fx_rendered = self
            .fx
            .as_mut()
            .map(|fx| fx.render((timestamp_ms * 0.001) as f32))
            .unwrap_or(false);

        let (diamonds, embers) = self.state.counts();
        log::trace!("Frame at {:.1}ms: delta {:.2}ms", timestamp_ms, delta_ms);

        Some(FrameReport {
            delta_ms,
            diamonds,
            embers,
            fx_active: self.fx_active(),
            fx_rendered,
        })
    }

    pub fn fx_active(&self) -> bool {
        self.fx.as_ref().map(|fx| fx.is_active()).unwrap_or(false)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn fx(&self) -> Option<&HandFxLayer<B>> {
        self.fx.as_ref()
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }
}
