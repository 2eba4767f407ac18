use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use emberfall_core::{unpremultiply_rgba_in_place, Tunables, FADE_RGB};
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

/// Writes composed frames and the tunables dump
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Page background, then particles, then the overlay, saved as PNG
    pub fn write_frame(&self, frame: u32, particles: &Pixmap, overlay: Option<&Pixmap>) -> Result<PathBuf> {
        let filepath = self.output_dir.join(format!("frame_{:04}.png", frame));
        let rgba = compose(particles, overlay)?;

        let image = image::RgbaImage::from_raw(particles.width(), particles.height(), rgba)
            .context("frame buffer does not match its dimensions")?;
        image.save(&filepath)?;

        Ok(filepath)
    }

    pub fn write_tunables(&self, tunables: &Tunables) -> Result<()> {
        let yaml = serde_yaml::to_string(tunables)?;
        std::fs::write(self.output_dir.join("tunables.yaml"), yaml)?;
        Ok(())
    }
}

/// Flatten the layers into straight RGBA8
pub fn compose(particles: &Pixmap, overlay: Option<&Pixmap>) -> Result<Vec<u8>> {
    let mut frame = Pixmap::new(particles.width(), particles.height()).context("empty frame")?;
    let [r, g, b] = FADE_RGB;
    frame.fill(Color::from_rgba8(r, g, b, 255));

    let paint = PixmapPaint::default();
    frame.draw_pixmap(0, 0, particles.as_ref(), &paint, Transform::identity(), None);
    if let Some(overlay) = overlay {
        frame.draw_pixmap(0, 0, overlay.as_ref(), &paint, Transform::identity(), None);
    }

    let mut rgba = frame.take();
    unpremultiply_rgba_in_place(&mut rgba);
    Ok(rgba)
}
