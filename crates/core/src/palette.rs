//! Fixed color palettes for backdrop entities.
//!
//! Entities draw a discrete color from the palette when they are seeded
//! ([`Palette::pick`]); the gradient backdrop instead samples continuously
//! ([`Palette::sample`]), interpolating in OKLCh with shortest-arc hue so the
//! sweep between stops stays perceptually even.

use crate::color::{oklch_to_srgb, srgb_to_oklch, OkLch, Srgb};
use crate::error::EngineError;
use crate::prng::Xorshift64;

/// Names accepted by [`Palette::from_name`].
const PALETTE_NAMES: &[&str] = &["portfolio", "aurora", "ember", "ocean", "mono"];

/// An ordered set of color stops.
#[derive(Debug, Clone)]
pub struct Palette {
    name: String,
    stops: Vec<Srgb>,
    lch: Vec<OkLch>,
}

impl Palette {
    /// Builds a palette from sRGB stops. Requires at least one color.
    pub fn new(name: impl Into<String>, stops: Vec<Srgb>) -> Result<Self, EngineError> {
        if stops.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        let lch = stops.iter().copied().map(srgb_to_oklch).collect();
        Ok(Self {
            name: name.into(),
            stops,
            lch,
        })
    }

    /// Builds a palette from `"#rrggbb"` strings.
    pub fn from_hex(name: impl Into<String>, hexes: &[&str]) -> Result<Self, EngineError> {
        let stops = hexes
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, stops)
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "portfolio" => Ok(Self::portfolio()),
            "aurora" => Ok(Self::aurora()),
            "ember" => Ok(Self::ember()),
            "ocean" => Ok(Self::ocean()),
            "mono" => Ok(Self::mono()),
            other => Err(EngineError::InvalidPalette(format!(
                "unknown palette '{other}' (expected one of: {})",
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    /// Names of all built-in palettes.
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The exact stop at `index`, wrapping past the end.
    pub fn color(&self, index: usize) -> Srgb {
        self.stops[index % self.stops.len()]
    }

    /// A uniformly chosen stop.
    pub fn pick(&self, rng: &mut Xorshift64) -> Srgb {
        self.stops[rng.next_usize(self.stops.len())]
    }

    /// Continuous sample at `t` in [0, 1] (clamped; NaN reads as 0).
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.lch.len();
        if n == 1 {
            return self.stops[0];
        }

        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;
        let (a, b) = (self.lch[idx], self.lch[idx + 1]);

        oklch_to_srgb(OkLch {
            l: a.l + frac * (b.l - a.l),
            c: a.c + frac * (b.c - a.c),
            h: interpolate_hue(a.h, b.h, frac),
        })
    }

    /// Indigo, violet, cyan and pink on a dark page.
    pub fn portfolio() -> Self {
        Self::from_hex("portfolio", &["#6366f1", "#8b5cf6", "#06b6d4", "#ec4899"])
            .expect("portfolio palette hex values are valid")
    }

    /// Cool greens and purples.
    pub fn aurora() -> Self {
        Self::from_hex("aurora", &["#22d3ee", "#a78bfa", "#34d399", "#f472b6"])
            .expect("aurora palette hex values are valid")
    }

    /// Oranges, ambers and reds.
    pub fn ember() -> Self {
        Self::from_hex("ember", &["#f97316", "#f59e0b", "#ef4444", "#fde047"])
            .expect("ember palette hex values are valid")
    }

    /// Deep blues to teal.
    pub fn ocean() -> Self {
        Self::from_hex("ocean", &["#1e3a8a", "#2563eb", "#0891b2", "#5eead4"])
            .expect("ocean palette hex values are valid")
    }

    /// Slate grays.
    pub fn mono() -> Self {
        Self::from_hex("mono", &["#f8fafc", "#e2e8f0", "#94a3b8", "#64748b"])
            .expect("mono palette hex values are valid")
    }
}

/// Shortest-arc hue interpolation in degrees.
fn interpolate_hue(h0: f64, h1: f64, t: f64) -> f64 {
    let delta = match h1 - h0 {
        d if d > 180.0 => d - 360.0,
        d if d < -180.0 => d + 360.0,
        d => d,
    };
    (h0 + t * delta).rem_euclid(360.0)
}
