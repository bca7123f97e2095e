//! [`DrawSurface`] over a `<canvas>` 2D context.
//!
//! Coordinates are CSS pixels; the backing store is scaled by the device
//! pixel ratio so lines stay crisp on high-density screens.

use std::f64::consts::TAU;

use backdrop_core::color::Rgba;
use backdrop_core::geometry::Extent;
use backdrop_core::surface::{DrawSurface, GradientStop, Paint};
use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    extent: Extent,
    dpr: f64,
}

impl CanvasSurface {
    /// Wraps `canvas`, or `None` if it has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, extent: Extent, dpr: f64) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let mut surface = Self {
            canvas,
            ctx,
            extent,
            dpr: if dpr > 0.0 { dpr } else { 1.0 },
        };
        surface.resize(extent);
        Some(surface)
    }

    fn gradient_with(&self, gradient: CanvasGradient, stops: &[GradientStop]) -> CanvasGradient {
        for stop in stops {
            // Out-of-range offsets throw; the stops we build are always in [0, 1].
            if let Err(err) = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0) as f32, &stop.color.to_css()) {
                tracing::debug!(?err, offset = stop.offset, "gradient stop rejected");
            }
        }
        gradient
    }

    /// Sets the fill style. Returns false if the gradient could not be built.
    fn apply(&self, paint: &Paint) -> bool {
        match paint {
            Paint::Solid(color) => {
                self.ctx.set_fill_style_str(&color.to_css());
                true
            }
            Paint::Linear(g) => {
                let gradient = self
                    .ctx
                    .create_linear_gradient(g.start.x, g.start.y, g.end.x, g.end.y);
                let gradient = self.gradient_with(gradient, &g.stops);
                self.ctx.set_fill_style_canvas_gradient(&gradient);
                true
            }
            Paint::Radial(g) => {
                let Ok(gradient) = self.ctx.create_radial_gradient(
                    g.center.x,
                    g.center.y,
                    g.inner_radius.max(0.0),
                    g.center.x,
                    g.center.y,
                    g.outer_radius.max(0.0),
                ) else {
                    return false;
                };
                let gradient = self.gradient_with(gradient, &g.stops);
                self.ctx.set_fill_style_canvas_gradient(&gradient);
                true
            }
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        self.canvas
            .set_width((extent.width() * self.dpr).round().max(1.0) as u32);
        self.canvas
            .set_height((extent.height() * self.dpr).round().max(1.0) as u32);
        // Resizing the backing store resets the transform.
        if let Err(err) = self
            .ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
        {
            tracing::debug!(?err, dpr = self.dpr, "device pixel ratio transform rejected");
        }
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.extent.width(), self.extent.height());
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, paint: &Paint) {
        if self.apply(paint) {
            self.ctx.fill_rect(origin.x, origin.y, size.x, size.y);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint) {
        if !(radius > 0.0) || !self.apply(paint) {
            return;
        }
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn fill_polygon(&mut self, points: &[DVec2], paint: &Paint) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.len() < 2 || !self.apply(paint) {
            return;
        }
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }
}
