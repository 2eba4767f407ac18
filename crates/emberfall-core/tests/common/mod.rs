#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use emberfall_core::{FxBackend, FxResult, HandFxUniforms, Rgba, SpriteImage, Surface2d};
use glam::Vec2;

/// One observed draw or overlay call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Resize(u32, u32),
    Transform(f32),
    FillRect(Rgba),
    Polygon {
        points: Vec<Vec2>,
        color: Rgba,
        line_width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Glow {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
    FxResize([u32; 2]),
    FxUpload,
    FxClear,
    FxDraw,
}

impl Call {
    /// Variant name without its arguments
    pub fn name(&self) -> &'static str {
        match self {
            Call::Resize(..) => "resize",
            Call::Transform(..) => "transform",
            Call::FillRect(..) => "fill_rect",
            Call::Polygon { .. } => "polygon",
            Call::Circle { .. } => "circle",
            Call::Glow { .. } => "glow",
            Call::FxResize(..) => "fx_resize",
            Call::FxUpload => "fx_upload",
            Call::FxClear => "fx_clear",
            Call::FxDraw => "fx_draw",
        }
    }
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Surface that records calls instead of drawing
pub struct RecordingSurface {
    pub log: CallLog,
}

impl RecordingSurface {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Surface2d for RecordingSurface {
    fn resize(&mut self, backing_width: u32, backing_height: u32) {
        self.log.borrow_mut().push(Call::Resize(backing_width, backing_height));
    }

    fn set_transform(&mut self, scale: f32) {
        self.log.borrow_mut().push(Call::Transform(scale));
    }

    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, color: Rgba) {
        self.log.borrow_mut().push(Call::FillRect(color));
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba, line_width: f32) {
        self.log.borrow_mut().push(Call::Polygon {
            points: points.to_vec(),
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.log.borrow_mut().push(Call::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.log.borrow_mut().push(Call::Glow {
            center,
            radius,
            inner,
            outer,
        });
    }
}

/// Overlay backend that records calls
pub struct RecordingFx {
    pub log: CallLog,
    pub last_uniforms: Option<HandFxUniforms>,
}

impl RecordingFx {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            last_uniforms: None,
        }
    }
}

impl FxBackend for RecordingFx {
    fn resize(&mut self, backing: [u32; 2]) {
        self.log.borrow_mut().push(Call::FxResize(backing));
    }

    fn upload_sprite(&mut self, _sprite: &SpriteImage) -> FxResult<()> {
        self.log.borrow_mut().push(Call::FxUpload);
        Ok(())
    }

    fn clear(&mut self) {
        self.log.borrow_mut().push(Call::FxClear);
    }

    fn draw(&mut self, uniforms: &HandFxUniforms) {
        self.last_uniforms = Some(*uniforms);
        self.log.borrow_mut().push(Call::FxDraw);
    }
}

/// Opaque white square sprite
pub fn solid_sprite(size: u32) -> SpriteImage {
    let image = image::RgbaImage::from_pixel(size, size, image::Rgba([255, 255, 255, 255]));
    SpriteImage::from_rgba8(image)
}
