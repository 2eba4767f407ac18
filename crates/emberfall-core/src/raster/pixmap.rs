use glam::Vec2;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::raster::{Rgba, Surface2d};

/// CPU raster surface backed by a premultiplied `tiny-skia` pixmap
///
/// A zero-sized backing store turns every draw into a no-op.
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    transform: Transform,
}

impl PixmapSurface {
    pub fn new() -> Self {
        Self {
            pixmap: None,
            transform: Transform::identity(),
        }
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn size(&self) -> [u32; 2] {
        self.pixmap
            .as_ref()
            .map(|p| [p.width(), p.height()])
            .unwrap_or([0, 0])
    }

    /// Premultiplied RGBA8 bytes, row-major, top row first
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map(|p| p.data()).unwrap_or(&[])
    }

    fn solid(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = true;
        paint
    }
}

impl Default for PixmapSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface2d for PixmapSurface {
    fn resize(&mut self, backing_width: u32, backing_height: u32) {
        // Reallocating clears the surface, like resizing a canvas element
        self.pixmap = Pixmap::new(backing_width, backing_height);
        self.transform = Transform::identity();
    }

    fn set_transform(&mut self, scale: f32) {
        self.transform = Transform::from_scale(scale, scale);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(rect) = Rect::from_xywh(origin.x, origin.y, size.x, size.y) else {
            return;
        };
        let mut paint = Self::solid(color);
        paint.anti_alias = false;
        pixmap.fill_rect(rect, &paint, self.transform, None);
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba, line_width: f32) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: line_width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &Self::solid(color), &stroke, self.transform, None);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        pixmap.fill_path(&path, &Self::solid(color), FillRule::Winding, self.transform, None);
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        let c = Point::from_xy(center.x, center.y);
        let Some(shader) = RadialGradient::new(
            c,
            c,
            radius,
            vec![
                GradientStop::new(0.0, to_skia(inner)),
                GradientStop::new(1.0, to_skia(outer)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, self.transform, None);
    }
}

fn to_skia(color: Rgba) -> Color {
    let c = color.clamped();
    Color::from_rgba(c.r, c.g, c.b, c.a).unwrap_or(Color::TRANSPARENT)
}

/// Straight RGBA8 to premultiplied, in place
pub fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

/// Premultiplied RGBA8 back to straight, in place
pub fn unpremultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3];
        if alpha == 0 {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
            continue;
        }

        let alpha_u16 = alpha as u16;
        pixel[0] = ((pixel[0] as u16 * 255 + (alpha_u16 / 2)) / alpha_u16).min(255) as u8;
        pixel[1] = ((pixel[1] as u16 * 255 + (alpha_u16 / 2)) / alpha_u16).min(255) as u8;
        pixel[2] = ((pixel[2] as u16 * 255 + (alpha_u16 / 2)) / alpha_u16).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn unsized_surface_ignores_draws() {
        let mut surface = PixmapSurface::new();
        surface.fill_rect(Vec2::ZERO, vec2(10.0, 10.0), Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert!(surface.data().is_empty());

        surface.resize(0, 20);
        surface.fill_circle(vec2(5.0, 5.0), 3.0, Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(surface.size(), [0, 0]);
    }

    #[test]
    fn transform_scales_logical_coordinates() {
        let mut surface = PixmapSurface::new();
        surface.resize(20, 20);
        surface.set_transform(2.0);
        surface.fill_rect(Vec2::ZERO, vec2(5.0, 5.0), Rgba::new(1.0, 1.0, 1.0, 1.0));

        let pixmap = surface.pixmap().expect("allocated");
        let inside = pixmap.pixel(9, 9).expect("in bounds");
        let outside = pixmap.pixel(11, 11).expect("in bounds");
        assert_eq!(inside.alpha(), 255);
        assert_eq!(outside.alpha(), 0);
    }

    #[test]
    fn partial_fill_leaves_trails() {
        let mut surface = PixmapSurface::new();
        surface.resize(4, 4);
        surface.fill_rect(Vec2::ZERO, vec2(4.0, 4.0), Rgba::new(1.0, 1.0, 1.0, 1.0));
        surface.fill_rect(Vec2::ZERO, vec2(4.0, 4.0), Rgba::new(0.0, 0.0, 0.0, 0.34));

        let px = surface.pixmap().expect("allocated").pixel(1, 1).expect("in bounds");
        assert!(px.red() > 150 && px.red() < 200);
    }

    #[test]
    fn premultiply_round_trip_is_stable_for_opaque() {
        let mut bytes = vec![200, 100, 50, 255, 10, 20, 30, 0];
        premultiply_rgba_in_place(&mut bytes);
        assert_eq!(&bytes[..4], &[200, 100, 50, 255]);
        assert_eq!(&bytes[4..], &[0, 0, 0, 0]);
        unpremultiply_rgba_in_place(&mut bytes);
        assert_eq!(&bytes[..4], &[200, 100, 50, 255]);
    }
}
