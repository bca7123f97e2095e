//! The simulated point every backdrop variant animates.

use glam::DVec2;

use crate::color::{Rgba, Srgb};

/// How an entity's position is recomputed each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Constant velocity, nudged by the field.
    Drift { velocity: DVec2 },
    /// Follows the field angle at a fixed speed (faster for smaller entities).
    Flow { speed: f64 },
    /// Oscillates vertically around a fixed anchor. The anchor is never moved.
    Wave { anchor: DVec2, phase: f64 },
    /// Pinned to its anchor; only `tilt` responds to the field and pointer.
    Anchored { anchor: DVec2 },
}

impl Motion {
    /// The fixed anchor, for motions that have one.
    pub fn anchor(&self) -> Option<DVec2> {
        match self {
            Motion::Wave { anchor, .. } | Motion::Anchored { anchor } => Some(*anchor),
            Motion::Drift { .. } | Motion::Flow { .. } => None,
        }
    }
}

/// One particle, dot, orb or pyramid.
///
/// `base_size` and `base_opacity` are assigned at seeding; `size` and
/// `opacity` are the per-frame values after wave and pointer modulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: DVec2,
    pub motion: Motion,
    pub base_size: f64,
    pub size: f64,
    pub base_opacity: f64,
    pub opacity: f64,
    pub color: Srgb,
    pub accent: bool,
    /// Apex displacement for pyramids, length at most 1.
    pub tilt: DVec2,
}

impl Entity {
    pub fn rgba(&self) -> Rgba {
        self.color.with_alpha(self.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_only_for_pinned_motions() {
        let a = DVec2::new(3.0, 4.0);
        assert_eq!(Motion::Wave { anchor: a, phase: 0.1 }.anchor(), Some(a));
        assert_eq!(Motion::Anchored { anchor: a }.anchor(), Some(a));
        assert_eq!(Motion::Flow { speed: 1.0 }.anchor(), None);
        assert_eq!(
            Motion::Drift {
                velocity: DVec2::X
            }
            .anchor(),
            None
        );
    }

    #[test]
    fn rgba_carries_current_opacity() {
        let e = Entity {
            position: DVec2::ZERO,
            motion: Motion::Flow { speed: 1.0 },
            base_size: 1.0,
            size: 1.0,
            base_opacity: 0.5,
            opacity: 0.25,
            color: Srgb::BLACK,
            accent: false,
            tilt: DVec2::ZERO,
        };
        assert_eq!(e.rgba().a, 0.25);
    }
}
