//! Field functions: deterministic scalar fields over position and time.
//!
//! A [`FieldFn`] maps `(x, y, t)` to a bounded, continuous scalar. The
//! stepper reads it either as a flow angle ([`FieldFn::angle`]) or directly
//! as a vertical displacement. Time is always an argument, never read from a
//! clock, so the same inputs give the same output on every call.

use std::f64::consts::{PI, TAU};
use std::fmt;

use noise::{NoiseFn, Perlin};

use crate::geometry::wrap;

/// A pure scalar field.
pub trait FieldFn {
    /// Field value at `(x, y)` and time `t`. Total on ℝ³.
    fn evaluate(&self, x: f64, y: f64, t: f64) -> f64;

    /// Upper bound on `|evaluate(..)|`.
    fn bound(&self) -> f64;

    /// The value mapped onto a direction in `[0, 2π)`.
    ///
    /// `[-bound, bound]` covers one full turn, so neighbouring points with
    /// close values get close angles.
    fn angle(&self, x: f64, y: f64, t: f64) -> f64 {
        let bound = self.bound();
        if bound <= 0.0 {
            return 0.0;
        }
        wrap(self.evaluate(x, y, t) / bound * PI, TAU)
    }
}

/// One `amplitude · sin(kx·x + ky·y + ω·t + phase)` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineTerm {
    /// Peak contribution of this term.
    pub amplitude: f64,
    /// Spatial frequency along x, in radians per pixel.
    pub kx: f64,
    /// Spatial frequency along y, in radians per pixel.
    pub ky: f64,
    /// Temporal frequency, in radians per unit of time.
    pub omega: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl SineTerm {
    /// Creates a term from its amplitude, frequencies and phase.
    pub const fn new(amplitude: f64, kx: f64, ky: f64, omega: f64, phase: f64) -> Self {
        Self {
            amplitude,
            kx,
            ky,
            omega,
            phase,
        }
    }

    fn evaluate(&self, x: f64, y: f64, t: f64) -> f64 {
        self.amplitude * (self.kx * x + self.ky * y + self.omega * t + self.phase).sin()
    }
}

/// Sum of sine terms. Stands in for gradient noise at a fraction of the cost.
#[derive(Debug, Clone, PartialEq)]
pub struct SineField {
    terms: Vec<SineTerm>,
}

impl SineField {
    /// A field summing `terms`. An empty list is the zero field.
    pub fn new(terms: Vec<SineTerm>) -> Self {
        Self { terms }
    }

    /// Three terms summing to a bound of 4.5; drives the flow and drift variants.
    pub fn flow() -> Self {
        Self::new(vec![
            SineTerm::new(2.0, 0.005, 0.003, 0.5, 0.0),
            SineTerm::new(1.5, -0.002, 0.006, 0.3, 1.3),
            SineTerm::new(1.0, 0.011, -0.009, 0.8, 2.1),
        ])
    }

    /// Mostly horizontal swell, in pixels of vertical displacement.
    pub fn swell() -> Self {
        Self::new(vec![
            SineTerm::new(18.0, 0.012, 0.0, 1.2, 0.0),
            SineTerm::new(9.0, 0.025, 0.004, 1.9, 0.7),
            SineTerm::new(4.0, 0.003, 0.02, 0.6, 1.9),
        ])
    }

    /// Slow, low-amplitude wobble for anchored shapes.
    pub fn breathe() -> Self {
        Self::new(vec![
            SineTerm::new(0.12, 0.010, 0.007, 0.8, 0.0),
            SineTerm::new(0.06, -0.004, 0.013, 1.3, 0.9),
        ])
    }
}

impl FieldFn for SineField {
    fn evaluate(&self, x: f64, y: f64, t: f64) -> f64 {
        self.terms.iter().map(|term| term.evaluate(x, y, t)).sum()
    }

    fn bound(&self) -> f64 {
        self.terms.iter().map(|term| term.amplitude.abs()).sum()
    }
}

/// Perlin noise sampled at `(x·scale, y·scale, t·time_scale)`.
pub struct NoiseField {
    noise: Perlin,
    seed: u32,
    scale: f64,
    time_scale: f64,
    amplitude: f64,
}

impl NoiseField {
    /// Perlin noise from `seed`, scaled in space and time, clamped to
    /// `±amplitude`.
    pub fn new(seed: u32, scale: f64, time_scale: f64, amplitude: f64) -> Self {
        Self {
            noise: Perlin::new(seed),
            seed,
            scale,
            time_scale,
            amplitude: amplitude.abs(),
        }
    }

    /// Defaults tuned to match the visual scale of [`SineField::flow`].
    pub fn flow(seed: u32) -> Self {
        Self::new(seed, 0.004, 0.25, 4.5)
    }
}

impl Clone for NoiseField {
    fn clone(&self) -> Self {
        Self::new(self.seed, self.scale, self.time_scale, self.amplitude)
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("scale", &self.scale)
            .field("time_scale", &self.time_scale)
            .field("amplitude", &self.amplitude)
            .finish()
    }
}

impl FieldFn for NoiseField {
    fn evaluate(&self, x: f64, y: f64, t: f64) -> f64 {
        let n = self
            .noise
            .get([x * self.scale, y * self.scale, t * self.time_scale]);
        (n * self.amplitude).clamp(-self.amplitude, self.amplitude)
    }

    fn bound(&self) -> f64 {
        self.amplitude
    }
}

/// The field a backdrop variant is configured with.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Constant zero.
    Still,
    /// Sum of sine terms.
    Sine(SineField),
    /// Clamped Perlin noise.
    Perlin(NoiseField),
}

impl FieldKind {
    /// The tuning name (`"still"`, `"sine"` or `"perlin"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Still => "still",
            Self::Sine(_) => "sine",
            Self::Perlin(_) => "perlin",
        }
    }

    /// Whether this field never perturbs anything.
    pub fn is_still(&self) -> bool {
        matches!(self, Self::Still)
    }
}

impl FieldFn for FieldKind {
    fn evaluate(&self, x: f64, y: f64, t: f64) -> f64 {
        match self {
            Self::Still => 0.0,
            Self::Sine(f) => f.evaluate(x, y, t),
            Self::Perlin(f) => f.evaluate(x, y, t),
        }
    }

    fn bound(&self) -> f64 {
        match self {
            Self::Still => 0.0,
            Self::Sine(f) => f.bound(),
            Self::Perlin(f) => f.bound(),
        }
    }
}
