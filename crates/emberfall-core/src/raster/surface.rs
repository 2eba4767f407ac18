use glam::Vec2;

use crate::raster::Rgba;

/// 2D raster drawing capability handed to the engine by its host
///
/// Draw calls take logical-pixel coordinates; the surface applies the
/// uniform device-pixel-ratio scale set by [`Surface2d::set_transform`].
pub trait Surface2d {
    /// Reallocate the backing store in device pixels
    fn resize(&mut self, backing_width: u32, backing_height: u32);

    /// Replace the current transform with a uniform scale
    fn set_transform(&mut self, scale: f32);

    /// Blend a solid rectangle over the surface
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    /// Stroke a closed polygon
    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba, line_width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fill a disc whose colour fades from `inner` at the centre to `outer` at the rim
    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);
}
