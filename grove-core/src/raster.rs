//! Alpha rasterization of stroked paths.
//!
//! The kerner only needs to know *where* ink is, so rasters are plain 8-bit
//! coverage buffers without anti-aliasing.

use crate::geometry::{Path, Rect};
use glam::Vec2;

/// Alpha value written for covered pixels.
pub const INK: u8 = u8::MAX;

/// A row-major 8-bit alpha buffer.
#[derive(Clone, Debug)]
pub struct Raster {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl Raster {
    /// Creates a fully transparent raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Alpha at pixel `(x, y)`.
    ///
    /// ### Panics
    /// Panics if the pixel lies outside the raster.
    #[inline]
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, alpha: u8) {
        self.alpha[y * self.width + x] = alpha;
    }

    /// Marks every pixel in `[x0, x1) x [y0, y1)` as ink, clipped to the raster.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.set(x, y, INK);
            }
        }
    }

    /// Inks every pixel whose centre lies within `half_width` of segment `a`–`b`.
    ///
    /// Coordinates are in pixels.
    pub fn stroke_segment(&mut self, a: Vec2, b: Vec2, half_width: f32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let lo = a.min(b) - Vec2::splat(half_width);
        let hi = a.max(b) + Vec2::splat(half_width);

        let x0 = lo.x.floor().max(0.0) as usize;
        let y0 = lo.y.floor().max(0.0) as usize;
        let x1 = (hi.x.ceil().max(0.0) as usize).min(self.width - 1);
        let y1 = (hi.y.ceil().max(0.0) as usize).min(self.height - 1);

        let hw2 = half_width * half_width;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_squared_to_segment(centre, a, b) <= hw2 {
                    self.set(x, y, INK);
                }
            }
        }
    }
}

fn distance_squared_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// Maps world coordinates onto a raster's pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterFrame {
    /// World position of the raster's top-left corner.
    pub origin: Vec2,
    /// Pixels per world unit.
    pub resolution: f32,
    pub width: usize,
    pub height: usize,
}

impl RasterFrame {
    /// A frame covering `bounds` plus `margin` world units on every side.
    pub fn covering(bounds: Rect, resolution: f32, margin: f32) -> Self {
        let origin = bounds.min - Vec2::splat(margin);
        let size = (bounds.max + Vec2::splat(margin) - origin) * resolution;
        Self {
            origin,
            resolution,
            width: size.x.ceil().max(1.0) as usize,
            height: size.y.ceil().max(1.0) as usize,
        }
    }

    #[inline]
    pub fn to_pixel(&self, world: Vec2) -> Vec2 {
        (world - self.origin) * self.resolution
    }

    /// World x coordinate of the left edge of pixel column `col`.
    #[inline]
    pub fn column_x(&self, col: usize) -> f32 {
        self.origin.x + col as f32 / self.resolution
    }
}

/// Rasterizes `paths` stroked with `stroke_width` world units.
///
/// The stroke is never thinner than one pixel, so hairline geometry still
/// leaves ink at coarse resolutions.
pub fn rasterize(paths: &[Path], frame: &RasterFrame, stroke_width: f32) -> Raster {
    let mut raster = Raster::new(frame.width, frame.height);
    let half_width = (stroke_width * frame.resolution).max(1.0) * 0.5;

    for path in paths {
        match path.points() {
            [] => {}
            [single] => {
                let p = frame.to_pixel(*single);
                raster.stroke_segment(p, p, half_width);
            }
            _ => {
                for (a, b) in path.segments() {
                    raster.stroke_segment(frame.to_pixel(a), frame.to_pixel(b), half_width);
                }
            }
        }
    }

    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn new_raster_is_transparent() {
        let r = Raster::new(4, 3);
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(r.alpha(x, y), 0);
            }
        }
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(2, 2, 10, 10);
        assert_eq!(r.alpha(1, 1), 0);
        assert_eq!(r.alpha(2, 2), INK);
        assert_eq!(r.alpha(3, 3), INK);
    }

    #[test]
    fn vertical_stroke_lands_in_expected_column() {
        let bounds = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let frame = RasterFrame::covering(bounds, 1.0, 0.0);
        let path = Path::segment(Vec2::new(5.5, 0.0), Vec2::new(5.5, 10.0));
        let raster = rasterize(&[path], &frame, 1.0);

        for y in 0..frame.height {
            assert_eq!(raster.alpha(5, y), INK, "row {y}");
            assert_eq!(raster.alpha(3, y), 0);
            assert_eq!(raster.alpha(7, y), 0);
        }
    }

    #[test]
    fn frame_covering_adds_margin() {
        let bounds = Rect::new(Vec2::new(2.0, 4.0), Vec2::new(6.0, 6.0));
        let frame = RasterFrame::covering(bounds, 2.0, 1.0);
        assert_eq!(frame.origin, Vec2::new(1.0, 3.0));
        assert_eq!(frame.width, 12);
        assert_eq!(frame.height, 8);
        assert_eq!(frame.column_x(4), 3.0);
    }
}
