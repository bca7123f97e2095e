//! Per-frame painting of an entity set.
//!
//! The renderer reads entities and never mutates them. Frame order is fixed:
//! backdrop (clear, trail fade, or animated gradient), proximity graph, then
//! entities, then `present`.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::color::{Rgba, Srgb};
use crate::entity::Entity;
use crate::palette::Palette;
use crate::surface::{DrawSurface, GradientStop, LinearGradient, Paint, RadialGradient};

/// How an entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Small filled circle.
    Dot,
    /// Large soft radial blob.
    Orb,
    /// Square-based pyramid seen from above, apex displaced by `tilt`.
    Pyramid,
}

/// What is painted before the entities.
#[derive(Debug, Clone)]
pub enum Backdrop {
    /// Fully transparent; the page shows through.
    Clear,
    /// Low-alpha fill over the previous frame, leaving motion trails.
    Trail(Rgba),
    /// Diagonal gradient whose two ends drift through the palette.
    Gradient { palette: Palette, speed: f64 },
}

/// Proximity-graph settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connections {
    pub max_distance: f64,
    pub max_alpha: f64,
    pub width: f64,
}

impl Default for Connections {
    fn default() -> Self {
        Self {
            max_distance: 110.0,
            max_alpha: 0.22,
            width: 0.6,
        }
    }
}

/// Everything the renderer needs beyond the entities themselves.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub backdrop: Backdrop,
    pub shape: Shape,
    pub connections: Option<Connections>,
    /// Glow radius as a multiple of entity size.
    pub glow: Option<f64>,
}

/// Accent entities glow even when the style has no glow.
const ACCENT_GLOW: f64 = 2.5;

/// Line opacity for two entities `distance` apart.
///
/// Falls off linearly from `max_alpha` at zero distance to nothing at
/// `max_distance`; at or beyond it no line is drawn.
pub fn connection_alpha(distance: f64, connections: &Connections) -> f64 {
    if connections.max_distance <= 0.0 || !(distance < connections.max_distance) {
        return 0.0;
    }
    connections.max_alpha * (1.0 - distance.max(0.0) / connections.max_distance)
}

/// Paints one frame.
pub fn render(surface: &mut dyn DrawSurface, entities: &[Entity], style: &RenderStyle, time: f64) {
    paint_backdrop(surface, &style.backdrop, time);

    if let Some(connections) = &style.connections {
        paint_connections(surface, entities, connections);
    }

    for entity in entities {
        match style.shape {
            Shape::Dot => paint_dot(surface, entity, style.glow),
            Shape::Orb => paint_orb(surface, entity),
            Shape::Pyramid => paint_pyramid(surface, entity),
        }
    }

    surface.present();
}

fn paint_backdrop(surface: &mut dyn DrawSurface, backdrop: &Backdrop, time: f64) {
    let size = surface.extent().size();
    match backdrop {
        Backdrop::Clear => surface.clear(),
        Backdrop::Trail(fade) => surface.fill_rect(DVec2::ZERO, size, &Paint::Solid(*fade)),
        Backdrop::Gradient { palette, speed } => {
            let phase = time * speed * TAU;
            let from = palette.sample(0.5 + 0.5 * phase.sin());
            let to = palette.sample(0.5 + 0.5 * (phase * 0.7 + 1.3).cos());
            surface.clear();
            surface.fill_rect(
                DVec2::ZERO,
                size,
                &Paint::Linear(LinearGradient {
                    start: DVec2::ZERO,
                    end: size,
                    stops: vec![
                        GradientStop::new(0.0, from.with_alpha(1.0)),
                        GradientStop::new(1.0, to.with_alpha(1.0)),
                    ],
                }),
            );
        }
    }
}

/// O(n²) pair scan; entity counts are capped at a few hundred.
fn paint_connections(surface: &mut dyn DrawSurface, entities: &[Entity], connections: &Connections) {
    let max_sq = connections.max_distance * connections.max_distance;
    for (i, a) in entities.iter().enumerate() {
        for b in &entities[i + 1..] {
            let dist_sq = a.position.distance_squared(b.position);
            if dist_sq >= max_sq {
                continue;
            }
            let alpha = connection_alpha(dist_sq.sqrt(), connections);
            if alpha > 0.0 {
                surface.stroke_line(
                    a.position,
                    b.position,
                    connections.width,
                    a.color.with_alpha(alpha),
                );
            }
        }
    }
}

fn glow_paint(center: DVec2, radius: f64, color: Srgb, alpha: f64) -> Paint {
    Paint::Radial(RadialGradient {
        center,
        inner_radius: 0.0,
        outer_radius: radius,
        stops: vec![
            GradientStop::new(0.0, color.with_alpha(alpha)),
            GradientStop::new(1.0, color.with_alpha(0.0)),
        ],
    })
}

fn paint_dot(surface: &mut dyn DrawSurface, entity: &Entity, glow: Option<f64>) {
    let glow = glow.or(entity.accent.then_some(ACCENT_GLOW));
    if let Some(factor) = glow {
        let radius = entity.size * factor;
        surface.fill_circle(
            entity.position,
            radius,
            &glow_paint(entity.position, radius, entity.color, entity.opacity * 0.5),
        );
    }
    surface.fill_circle(entity.position, entity.size, &Paint::Solid(entity.rgba()));
}

fn paint_orb(surface: &mut dyn DrawSurface, entity: &Entity) {
    let paint = Paint::Radial(RadialGradient {
        center: entity.position,
        inner_radius: 0.0,
        outer_radius: entity.size,
        stops: vec![
            GradientStop::new(0.0, entity.rgba()),
            GradientStop::new(0.5, entity.rgba().fade(0.4)),
            GradientStop::new(1.0, entity.color.with_alpha(0.0)),
        ],
    });
    surface.fill_circle(entity.position, entity.size, &paint);
}

/// Per-face brightness: top, right, bottom, left.
const FACE_SHADES: [f64; 4] = [1.0, 0.78, 0.55, 0.68];

fn paint_pyramid(surface: &mut dyn DrawSurface, entity: &Entity) {
    let c = entity.position;
    let h = entity.size;
    let corners = [
        c + DVec2::new(-h, -h),
        c + DVec2::new(h, -h),
        c + DVec2::new(h, h),
        c + DVec2::new(-h, h),
    ];
    let apex = c + entity.tilt * h;

    for (i, shade) in FACE_SHADES.iter().enumerate() {
        let face = [corners[i], corners[(i + 1) % 4], apex];
        let color = entity.color.shade(*shade).with_alpha(entity.opacity);
        surface.fill_polygon(&face, &Paint::Solid(color));
    }
    let edge = entity.color.with_alpha(entity.opacity * 0.5);
    for corner in corners {
        surface.stroke_line(corner, apex, 0.5, edge);
    }
}
