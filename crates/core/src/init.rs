//! Entity-set seeding.
//!
//! A fresh set is built on mount and on every resize; nothing is carried
//! over from the previous sizing. All randomness comes from the caller's
//! [`Xorshift64`], so a seed plus a resize history reproduces the same set.

use glam::DVec2;

use crate::color::Srgb;
use crate::entity::{Entity, Motion};
use crate::geometry::{BoundaryPolicy, Extent};
use crate::palette::Palette;
use crate::prng::Xorshift64;

/// Viewports narrower than this use the mobile count.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Two-tier entity count keyed on viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountPolicy {
    pub mobile: usize,
    pub desktop: usize,
}

impl CountPolicy {
    pub fn for_width(&self, width: f64) -> usize {
        if width < MOBILE_BREAKPOINT {
            self.mobile
        } else {
            self.desktop
        }
    }
}

/// Inclusive-exclusive range a per-entity attribute is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut Xorshift64) -> f64 {
        rng.next_range(self.min, self.max)
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Where entities start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Uniformly random over the surface.
    Uniform,
    /// One entity per cell of an N×N grid (N = ⌈√count⌉), random within the cell.
    JitteredGrid,
    /// One entity per grid cell, at the cell centre.
    Grid,
}

/// Which entities get the accent color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accent {
    None,
    /// Each entity independently with probability `p`.
    Chance(f64),
    /// Grid cells whose row and column are both multiples of `k`.
    GridEvery(usize),
}

/// The motion family a variant seeds its entities with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionModel {
    /// Random velocity up to `max_speed` per axis, steered by `nudge` times
    /// the field direction each frame.
    Drift { max_speed: f64, nudge: f64 },
    /// Field-following at `speed / size`.
    Flow { speed: f64 },
    /// Vertical oscillation about the seeded position, random phase up to `phase`.
    Wave { phase: f64 },
    /// Fixed in place.
    Anchored,
}

/// Everything the initializer reads from a variant.
#[derive(Debug, Clone)]
pub struct Seeding<'a> {
    pub placement: Placement,
    pub motion: MotionModel,
    pub palette: &'a Palette,
    pub accent: Accent,
    pub accent_color: Srgb,
    pub size: Span,
    pub opacity: Span,
    pub boundary: BoundaryPolicy,
}

/// Grid side length for `count` entities.
pub fn grid_side(count: usize) -> usize {
    (count as f64).sqrt().ceil().max(1.0) as usize
}

/// Seeds exactly `count` entities inside `extent`.
pub fn initialize(
    seeding: &Seeding<'_>,
    count: usize,
    extent: Extent,
    rng: &mut Xorshift64,
) -> Vec<Entity> {
    let side = grid_side(count);
    let cell = extent.size() / side as f64;

    (0..count)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            let position = match seeding.placement {
                Placement::Uniform => DVec2::new(
                    rng.next_f64() * extent.width(),
                    rng.next_f64() * extent.height(),
                ),
                Placement::JitteredGrid => {
                    let jitter = DVec2::new(rng.next_f64(), rng.next_f64());
                    (DVec2::new(col as f64, row as f64) + jitter) * cell
                }
                Placement::Grid => (DVec2::new(col as f64, row as f64) + 0.5) * cell,
            };
            let position = seeding.boundary.apply(position, extent);

            let size = seeding.size.sample(rng);
            let opacity = seeding.opacity.sample(rng);
            let accent = match seeding.accent {
                Accent::None => false,
                Accent::Chance(p) => rng.chance(p),
                Accent::GridEvery(k) => k > 0 && row % k == 0 && col % k == 0,
            };
            let color = if accent {
                seeding.accent_color
            } else {
                seeding.palette.pick(rng)
            };
            let motion = match seeding.motion {
                MotionModel::Drift { max_speed, .. } => Motion::Drift {
                    velocity: DVec2::new(rng.next_signed(max_speed), rng.next_signed(max_speed)),
                },
                MotionModel::Flow { speed } => Motion::Flow {
                    speed: speed / size.max(0.1),
                },
                MotionModel::Wave { phase } => Motion::Wave {
                    anchor: position,
                    phase: rng.next_range(0.0, phase),
                },
                MotionModel::Anchored => Motion::Anchored { anchor: position },
            };

            Entity {
                position,
                motion,
                base_size: size,
                size,
                base_opacity: opacity,
                opacity,
                color,
                accent,
                tilt: DVec2::ZERO,
            }
        })
        .collect()
}
