use emberfall_params::{MAX_DEVICE_PIXEL_RATIO, NARROW_BREAKPOINT};

/// Logical viewport size and pixel density
///
/// Written only by the resize path; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Build a viewport, capping the pixel ratio at 2 and treating an
    /// unreported (non-positive) ratio as 1
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            device_pixel_ratio: dpr.min(MAX_DEVICE_PIXEL_RATIO),
        }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Mobile/desktop breakpoint shared by population and hand layout
    pub fn is_narrow(&self) -> bool {
        self.width < NARROW_BREAKPOINT
    }

    /// Size of the backing raster in device pixels
    pub fn backing_size(&self) -> [u32; 2] {
        [
            (self.width * self.device_pixel_ratio).floor() as u32,
            (self.height * self.device_pixel_ratio).floor() as u32,
        ]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let vp = Viewport::new(1000.0, 500.0, 3.0);
        assert_eq!(vp.device_pixel_ratio, 2.0);
        assert_eq!(vp.backing_size(), [2000, 1000]);
    }

    #[test]
    fn missing_pixel_ratio_defaults_to_one() {
        assert_eq!(Viewport::new(10.0, 10.0, 0.0).device_pixel_ratio, 1.0);
        assert_eq!(Viewport::new(10.0, 10.0, f32::NAN).device_pixel_ratio, 1.0);
    }

    #[test]
    fn backing_size_floors() {
        let vp = Viewport::new(333.0, 101.0, 1.5);
        assert_eq!(vp.backing_size(), [499, 151]);
    }

    #[test]
    fn breakpoint_is_exclusive() {
        assert!(Viewport::new(759.9, 100.0, 1.0).is_narrow());
        assert!(!Viewport::new(760.0, 100.0, 1.0).is_narrow());
    }
}
