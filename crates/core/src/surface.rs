//! The drawing-surface seam.
//!
//! [`DrawSurface`] is the small subset of a 2D canvas context the renderer
//! needs: clears, rect/circle/polygon fills with solid or gradient paint, and
//! stroked lines. A browser canvas, a CPU raster and [`RecordingSurface`]
//! (which only logs calls) all implement it.

use glam::DVec2;

use crate::color::Rgba;
use crate::geometry::Extent;

/// A color stop at `offset` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

impl GradientStop {
    pub fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Gradient along the segment `start → end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: DVec2,
    pub end: DVec2,
    pub stops: Vec<GradientStop>,
}

/// Concentric gradient from `inner_radius` to `outer_radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: DVec2,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub stops: Vec<GradientStop>,
}

/// Fill style for shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    /// Color at point `p`, resolved the way a canvas 2D context would.
    pub fn color_at(&self, p: DVec2) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => {
                let axis = g.end - g.start;
                let len_sq = axis.length_squared();
                let t = if len_sq <= f64::EPSILON {
                    0.0
                } else {
                    (p - g.start).dot(axis) / len_sq
                };
                sample_stops(&g.stops, t)
            }
            Paint::Radial(g) => {
                let span = g.outer_radius - g.inner_radius;
                let t = if span <= f64::EPSILON {
                    1.0
                } else {
                    (p.distance(g.center) - g.inner_radius) / span
                };
                sample_stops(&g.stops, t)
            }
        }
    }
}

/// Interpolates sorted stops at `t`, holding the end colors outside them.
fn sample_stops(stops: &[GradientStop], t: f64) -> Rgba {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    stops
        .windows(2)
        .find(|w| t <= w[1].offset)
        .map(|w| {
            let span = w[1].offset - w[0].offset;
            let local = if span <= f64::EPSILON {
                1.0
            } else {
                (t - w[0].offset) / span
            };
            w[0].color.lerp(w[1].color, local)
        })
        .unwrap_or(last.color)
}

/// A 2D raster target the renderer paints into.
pub trait DrawSurface {
    /// Current logical size.
    fn extent(&self) -> Extent;

    /// Matches the surface to a new viewport size. Contents may be discarded.
    fn resize(&mut self, extent: Extent);

    /// Resets every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, paint: &Paint);

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint);

    /// Fills a closed polygon (even-odd rule).
    fn fill_polygon(&mut self, points: &[DVec2], paint: &Paint);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);

    /// Marks the end of one rendered frame.
    fn present(&mut self) {}
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        origin: DVec2,
        size: DVec2,
        paint: Paint,
    },
    FillCircle {
        center: DVec2,
        radius: f64,
        paint: Paint,
    },
    FillPolygon {
        points: Vec<DVec2>,
        paint: Paint,
    },
    StrokeLine {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
}

/// A surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    extent: Extent,
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingSurface {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            commands: Vec::new(),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `present` calls so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Every stroked line as `(length, alpha)`.
    pub fn lines(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeLine {
                    from, to, color, ..
                } => Some((from.distance(*to), color.a)),
                _ => None,
            })
            .collect()
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[DVec2], paint: &Paint) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
