//! CPU raster implementing [`DrawSurface`].
//!
//! Shapes are point-sampled at pixel centres (no anti-aliasing) and
//! composited source-over in straight alpha, which is close enough to a
//! canvas 2D context for snapshots and tests.

use backdrop_core::color::Rgba;
use backdrop_core::error::EngineError;
use backdrop_core::geometry::Extent;
use backdrop_core::surface::{DrawSurface, Paint};
use glam::DVec2;

/// Hairlines thinner than this still cover one pixel.
const MIN_HALF_WIDTH: f64 = 0.5;

/// An RGBA pixel buffer, one [`Rgba`] per pixel, row-major.
#[derive(Debug, Clone)]
pub struct Raster {
    extent: Extent,
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    frames: usize,
}

impl Raster {
    /// A transparent raster covering `extent`.
    ///
    /// Fails with `EngineError::InvalidDimensions` when the extent is too
    /// large to rasterize.
    pub fn new(extent: Extent) -> Result<Self, EngineError> {
        let (width, height) = extent.pixels()?;
        Ok(Self {
            extent,
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            frames: 0,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`, if inside.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Number of presented frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Whether any pixel has non-zero alpha.
    pub fn has_ink(&self) -> bool {
        self.pixels.iter().any(|p| p.a > 0.0)
    }

    /// Composites `paint` onto every pixel whose centre lies in the clipped
    /// box `[min, max]` and satisfies `inside`.
    fn fill_where(&mut self, min: DVec2, max: DVec2, paint: &Paint, inside: impl Fn(DVec2) -> bool) {
        let Some((x0, x1)) = pixel_span(min.x, max.x, self.width) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(min.y, max.y, self.height) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if !inside(centre) {
                    continue;
                }
                let src = paint.color_at(centre);
                if src.a <= 0.0 {
                    continue;
                }
                let idx = y * self.width + x;
                self.pixels[idx] = src.over(self.pixels[idx]);
            }
        }
    }
}

/// Pixel index range whose centres may fall in `[lo, hi]`, clipped to `len`.
fn pixel_span(lo: f64, hi: f64, len: usize) -> Option<(usize, usize)> {
    if !(lo.is_finite() && hi.is_finite()) || hi < 0.0 || lo >= len as f64 {
        return None;
    }
    let start = (lo - 0.5).ceil().max(0.0) as usize;
    let end = ((hi - 0.5).floor() + 1.0).min(len as f64).max(0.0) as usize;
    (start < end).then_some((start, end))
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl DrawSurface for Raster {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        match Self::new(extent) {
            Ok(resized) => {
                *self = Self {
                    frames: self.frames,
                    ..resized
                }
            }
            Err(err) => {
                tracing::warn!(%err, width = extent.width(), height = extent.height(), "raster resize refused");
            }
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, paint: &Paint) {
        let (min, max) = (origin.min(origin + size), origin.max(origin + size));
        self.fill_where(min, max, paint, |p| {
            p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint) {
        if !(radius > 0.0) {
            return;
        }
        let r = DVec2::splat(radius);
        let r_sq = radius * radius;
        self.fill_where(center - r, center + r, paint, |p| {
            p.distance_squared(center) <= r_sq
        });
    }

    fn fill_polygon(&mut self, points: &[DVec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().copied().fold(DVec2::INFINITY, DVec2::min);
        let max = points.iter().copied().fold(DVec2::NEG_INFINITY, DVec2::max);
        self.fill_where(min, max, paint, |p| polygon_contains(points, p));
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        let half = (width * 0.5).max(MIN_HALF_WIDTH);
        let pad = DVec2::splat(half);
        let paint = Paint::Solid(color);
        self.fill_where(from.min(to) - pad, from.max(to) + pad, &paint, |p| {
            segment_distance(p, from, to) <= half
        });
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
