//! Surface extent and boundary policies.
//!
//! Every division by a surface dimension happens downstream of an [`Extent`],
//! which cannot be built from a zero, negative or non-finite size.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Largest raster side, matching the canvas size limit common to browsers.
pub const MAX_PIXEL_SIDE: usize = 16_384;

/// Validated, strictly positive surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    width: f64,
    height: f64,
}

impl Extent {
    /// Creates an extent, rejecting zero, negative and non-finite sizes.
    ///
    /// Any finite size is accepted; rasterizing it is checked separately by
    /// [`Extent::pixels`].
    pub fn new(width: f64, height: f64) -> Result<Self, EngineError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    /// Width in CSS pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in CSS pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width and height as a vector.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Whether `p` lies in `[0, width) × [0, height)`.
    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..self.width).contains(&p.x) && (0.0..self.height).contains(&p.y)
    }

    /// Pixel dimensions for raster-backed surfaces, at least 1×1.
    ///
    /// Returns `EngineError::InvalidDimensions` if either side exceeds
    /// [`MAX_PIXEL_SIDE`] or `width * height` would overflow `usize`.
    pub fn pixels(&self) -> Result<(usize, usize), EngineError> {
        let side = |v: f64| {
            let px = v.round().max(1.0);
            if px > MAX_PIXEL_SIDE as f64 {
                return Err(EngineError::InvalidDimensions);
            }
            Ok(px as usize)
        };
        let (width, height) = (side(self.width)?, side(self.height)?);
        width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok((width, height))
    }
}

/// What happens to an entity that leaves the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Re-enter from the opposite edge.
    #[default]
    Wrap,
    /// Stop at the edge.
    Clamp,
}

impl BoundaryPolicy {
    /// Parses `"wrap"` or `"clamp"`.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "wrap" => Ok(Self::Wrap),
            "clamp" => Ok(Self::Clamp),
            other => Err(EngineError::UnknownOption {
                name: "boundary".into(),
                value: other.into(),
            }),
        }
    }

    /// The tuning name of this policy.
    pub fn name(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Clamp => "clamp",
        }
    }

    /// Brings `p` back into `[0, width) × [0, height)`.
    pub fn apply(self, p: DVec2, extent: Extent) -> DVec2 {
        match self {
            Self::Wrap => DVec2::new(wrap(p.x, extent.width), wrap(p.y, extent.height)),
            Self::Clamp => DVec2::new(clamp(p.x, extent.width), clamp(p.y, extent.height)),
        }
    }
}

/// Wraps `v` into `[0, extent)`, preserving any overshoot.
pub fn wrap(v: f64, extent: f64) -> f64 {
    if (0.0..extent).contains(&v) {
        return v;
    }
    let r = v.rem_euclid(extent);
    // rem_euclid of a tiny negative value rounds up to `extent` itself.
    if r >= extent {
        0.0
    } else {
        r
    }
}

/// Clamps `v` into `[0, extent)`.
pub fn clamp(v: f64, extent: f64) -> f64 {
    v.clamp(0.0, extent * (1.0 - f64::EPSILON))
}
