use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use glam::{Vec2, Vec4};

use crate::error::{FxError, FxResult};
use crate::raster::premultiply_rgba_in_place;

/// Decoded sprite ready for upload
///
/// Premultiplied RGBA8 with the bottom row first, so `v = 0` samples the
/// bottom of the image like the shader's y-up coordinates expect.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    pub fn from_rgba8(image: image::RgbaImage) -> Self {
        let flipped = image::imageops::flip_vertical(&image);
        let (width, height) = flipped.dimensions();
        let mut rgba = flipped.into_raw();
        premultiply_rgba_in_place(&mut rgba);
        Self { width, height, rgba }
    }

    pub fn decode(bytes: &[u8]) -> FxResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_rgba8(image))
    }

    pub fn open(path: &Path) -> FxResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| FxError::SpriteLoad {
            path: path.display().to_string(),
            source,
        })?;
        Self::decode(&bytes)
    }
}

/// Outcome of polling a sprite load
#[derive(Debug)]
pub enum SpritePoll {
    Pending,
    Loaded(SpriteImage),
    Failed(FxError),
}

/// One-shot asynchronous sprite load
///
/// Decoding runs off the frame loop; the layer polls once per frame.
pub struct SpriteLoad {
    rx: Receiver<FxResult<SpriteImage>>,
}

impl SpriteLoad {
    /// Load and decode `path` on a background thread
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, load) = Self::pending();

        let spawned = std::thread::Builder::new()
            .name("sprite-load".into())
            .spawn(move || {
                // The layer may be gone by the time decoding finishes
                let _ = tx.send(SpriteImage::open(&path));
            });
        if let Err(e) = spawned {
            log::warn!("Could not start sprite loader: {}", e);
        }

        load
    }

    /// A load that completes when the returned sender delivers
    pub fn pending() -> (Sender<FxResult<SpriteImage>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// A load that has already completed
    pub fn ready(image: SpriteImage) -> Self {
        let (tx, load) = Self::pending();
        let _ = tx.send(Ok(image));
        load
    }

    pub fn poll(&self) -> SpritePoll {
        match self.rx.try_recv() {
            Ok(Ok(image)) => SpritePoll::Loaded(image),
            Ok(Err(e)) => SpritePoll::Failed(e),
            Err(TryRecvError::Empty) => SpritePoll::Pending,
            Err(TryRecvError::Disconnected) => SpritePoll::Failed(FxError::Context(
                "sprite loader exited without a result".into(),
            )),
        }
    }
}

/// CPU-side sprite texture with clamp-to-edge bilinear filtering
pub struct SpriteTexture {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl SpriteTexture {
    pub fn new(sprite: &SpriteImage) -> Self {
        let texels = sprite
            .rgba
            .chunks_exact(4)
            .map(|px| Vec4::new(px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32) / 255.0)
            .collect();
        Self {
            width: sprite.width,
            height: sprite.height,
            texels,
        }
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Sample premultiplied RGBA at normalized `uv`
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        if self.width == 0 || self.height == 0 {
            return Vec4::ZERO;
        }

        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy)
    }
}
