use emberfall_params::HandFxUniforms;
use glam::vec2;
use tiny_skia::{Color, Pixmap};

use crate::error::{FxError, FxResult};
use crate::fx::program;
use crate::fx::{FxBackend, SpriteImage, SpriteTexture};

/// CPU backend for the hand overlay
///
/// Evaluates the warp program per pixel into its own premultiplied pixmap.
pub struct SoftwareFx {
    overlay: Option<Pixmap>,
    sprite: Option<SpriteTexture>,
}

impl SoftwareFx {
    pub fn new() -> FxResult<Self> {
        Ok(Self {
            overlay: None,
            sprite: None,
        })
    }

    /// The overlay as last rendered; `None` while unsized
    pub fn overlay(&self) -> Option<&Pixmap> {
        self.overlay.as_ref()
    }
}

impl FxBackend for SoftwareFx {
    fn resize(&mut self, backing: [u32; 2]) {
        self.overlay = Pixmap::new(backing[0], backing[1]);
    }

    fn upload_sprite(&mut self, sprite: &SpriteImage) -> FxResult<()> {
        if sprite.width == 0 || sprite.height == 0 {
            return Err(FxError::Context("sprite has no pixels".into()));
        }
        self.sprite = Some(SpriteTexture::new(sprite));
        Ok(())
    }

    fn clear(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.fill(Color::TRANSPARENT);
        }
    }

    fn draw(&mut self, uniforms: &HandFxUniforms) {
        let (Some(overlay), Some(sprite)) = (self.overlay.as_mut(), self.sprite.as_ref()) else {
            return;
        };

        let width = overlay.width();
        let height = overlay.height();
        let data = overlay.data_mut();

        for y in 0..height {
            // Pixmap rows run top-down, shader space runs bottom-up
            let v = 1.0 - (y as f32 + 0.5) / height as f32;
            for x in 0..width {
                let u = (x as f32 + 0.5) / width as f32;
                let color = program::shade(sprite, uniforms, vec2(u, v));
                if color.w <= 0.0 {
                    continue;
                }

                let a = color.w.clamp(0.0, 1.0);
                let idx = (y * width + x) as usize * 4;
                data[idx] = to_channel(color.x.min(a));
                data[idx + 1] = to_channel(color.y.min(a));
                data[idx + 2] = to_channel(color.z.min(a));
                data[idx + 3] = to_channel(a);
            }
        }
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
