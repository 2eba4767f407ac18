use emberfall_params::{bindings, HandFxUniforms, HAND_INTENSITY};

use crate::error::FxResult;
use crate::fx::{HandLayout, SpriteImage, SpriteLoad, SpritePoll};
use crate::sim::Viewport;

/// Rendering surface owned by the hand overlay
pub trait FxBackend {
    /// Reallocate the overlay in device pixels
    fn resize(&mut self, backing: [u32; 2]);

    /// Install the sprite texture; called at most once
    fn upload_sprite(&mut self, sprite: &SpriteImage) -> FxResult<()>;

    /// Clear the overlay to fully transparent
    fn clear(&mut self);

    /// Run the warp program over the whole overlay
    fn draw(&mut self, uniforms: &HandFxUniforms);
}

/// Shader compositing layer: three warped copies of the hand sprite
///
/// Renders nothing until the sprite has loaded. A failed load leaves the layer
/// inactive for good.
pub struct HandFxLayer<B: FxBackend> {
    backend: B,
    layout: HandLayout,
    viewport: Viewport,
    sprite: Option<SpriteLoad>,
    texture_ready: bool,
    intensity: f32,
}

impl<B: FxBackend> HandFxLayer<B> {
    pub fn new(backend: B, sprite: SpriteLoad) -> Self {
        Self {
            backend,
            layout: HandLayout::default(),
            viewport: Viewport::default(),
            sprite: Some(sprite),
            texture_ready: false,
            intensity: HAND_INTENSITY,
        }
    }

    /// Wrap a backend that may have failed to initialise
    ///
    /// A failed backend means there is no layer at all; the caller carries on
    /// without it.
    pub fn create(backend: FxResult<B>, sprite: SpriteLoad) -> Option<Self> {
        match backend {
            Ok(backend) => Some(Self::new(backend, sprite)),
            Err(e) => {
                log::warn!("Hand overlay disabled: {}", e);
                None
            }
        }
    }

    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport = Viewport::new(width, height, device_pixel_ratio);
        self.backend.resize(self.viewport.backing_size());
        self.layout = HandLayout::for_viewport(&self.viewport);
    }

    /// Draw one frame at `time` seconds; returns whether anything was drawn
    pub fn render(&mut self, time: f32) -> bool {
        self.poll_sprite();
        if !self.texture_ready {
            return false;
        }

        let uniforms = self.layout.uniforms(time, self.intensity);
        if let Err(e) = bindings::validate_uniforms(&uniforms) {
            log::trace!("Skipping hand overlay frame: {}", e);
            return false;
        }

        self.backend.clear();
        self.backend.draw(&uniforms);
        true
    }

    fn poll_sprite(&mut self) {
        let Some(load) = self.sprite.as_ref() else {
            return;
        };

        match load.poll() {
            SpritePoll::Pending => {}
            SpritePoll::Loaded(image) => {
                self.sprite = None;
                match self.backend.upload_sprite(&image) {
                    Ok(()) => {
                        self.texture_ready = true;
                        log::info!("Hand overlay active ({}x{} sprite)", image.width, image.height);
                    }
                    Err(e) => log::warn!("Hand sprite upload failed: {}", e),
                }
            }
            SpritePoll::Failed(e) => {
                self.sprite = None;
                log::warn!("Hand sprite unavailable: {}", e);
            }
        }
    }

    /// Whether the sprite has loaded and frames are being drawn
    pub fn is_active(&self) -> bool {
        self.texture_ready
    }

    pub fn layout(&self) -> &HandLayout {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
