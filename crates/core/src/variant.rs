//! The five backdrop variants as configurations of one engine.
//!
//! A [`Descriptor`] bundles everything that distinguishes one variant from
//! another: field function, motion model, entity count, placement, palette,
//! pointer interaction, boundary policy and render style. Tuning JSON can
//! override a documented subset of it with [`Descriptor::tuned`].

use serde_json::{json, Value};

use crate::color::Srgb;
use crate::error::EngineError;
use crate::field::{FieldFn, FieldKind, NoiseField, SineField};
use crate::geometry::BoundaryPolicy;
use crate::init::{Accent, CountPolicy, MotionModel, Placement, Seeding, Span};
use crate::palette::Palette;
use crate::params::{param_bool, param_choice, param_f64_within, param_str, param_usize};
use crate::render::{Backdrop, Connections, RenderStyle, Shape};
use crate::step::{Interaction, InteractionMode};

/// Upper limit on entities per surface; the proximity graph is O(n²).
pub const MAX_COUNT: usize = 600;

/// Seconds of field time per step at 60 frames per second.
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;

const VARIANT_NAMES: &[&str] = &["particles", "flow", "waves", "gradient", "pyramids"];
const FIELD_NAMES: &[&str] = &["still", "sine", "perlin"];
const BOUNDARY_NAMES: &[&str] = &["wrap", "clamp"];

/// Registered backdrop variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Drifting dots joined by a proximity graph.
    Particles,
    /// Dots following a flow field, leaving trails.
    Flow,
    /// Jittered dot mesh rippling on a swell field.
    Waves,
    /// A few large orbs over a slowly shifting gradient.
    Gradient,
    /// Grid of pyramids leaning toward the pointer.
    Pyramids,
}

impl VariantKind {
    /// Looks up a variant by its tuning name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "particles" => Ok(Self::Particles),
            "flow" => Ok(Self::Flow),
            "waves" => Ok(Self::Waves),
            "gradient" => Ok(Self::Gradient),
            "pyramids" => Ok(Self::Pyramids),
            other => Err(EngineError::UnknownVariant(other.to_string())),
        }
    }

    /// The name accepted by [`VariantKind::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::Flow => "flow",
            Self::Waves => "waves",
            Self::Gradient => "gradient",
            Self::Pyramids => "pyramids",
        }
    }

    /// Every variant, in registry order.
    pub fn list() -> &'static [VariantKind] {
        &[
            Self::Particles,
            Self::Flow,
            Self::Waves,
            Self::Gradient,
            Self::Pyramids,
        ]
    }

    /// Names of every variant, in registry order.
    pub fn list_names() -> &'static [&'static str] {
        VARIANT_NAMES
    }

    /// Untuned preset for this variant.
    pub fn descriptor(self) -> Descriptor {
        match self {
            Self::Particles => particles(),
            Self::Flow => flow(),
            Self::Waves => waves(),
            Self::Gradient => gradient(),
            Self::Pyramids => pyramids(),
        }
    }
}

/// Full configuration of one backdrop.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Which preset this descriptor started from.
    pub kind: VariantKind,
    /// Field perturbing entities each step.
    pub field: FieldKind,
    /// How entities move between frames.
    pub motion: MotionModel,
    /// Entity count on mobile and desktop viewports.
    pub count: CountPolicy,
    /// Where entities are seeded.
    pub placement: Placement,
    /// Colors sampled for ordinary entities.
    pub palette: Palette,
    /// Which entities are accented.
    pub accent: Accent,
    /// Color of accented entities.
    pub accent_color: Srgb,
    /// Base radius range in CSS pixels.
    pub size: Span,
    /// Base opacity range.
    pub opacity: Span,
    /// Pointer response.
    pub interaction: Interaction,
    /// What happens at the surface edges.
    pub boundary: BoundaryPolicy,
    /// Backdrop, shape, proximity graph and glow.
    pub style: RenderStyle,
    /// Multiplier on every motion.
    pub speed: f64,
    /// Field time advanced per step.
    pub time_step: f64,
}

fn hex(s: &str) -> Srgb {
    Srgb::from_hex(s).unwrap_or(Srgb::BLACK)
}

fn particles() -> Descriptor {
    Descriptor {
        kind: VariantKind::Particles,
        field: FieldKind::Still,
        motion: MotionModel::Drift {
            max_speed: 0.5,
            nudge: 0.0,
        },
        count: CountPolicy {
            mobile: 40,
            desktop: 80,
        },
        placement: Placement::Uniform,
        palette: Palette::portfolio(),
        accent: Accent::Chance(0.1),
        accent_color: hex("#f8fafc"),
        size: Span::new(1.0, 3.0),
        opacity: Span::new(0.3, 0.8),
        interaction: Interaction {
            mode: InteractionMode::Repel,
            radius: 100.0,
            strength: 3.0,
            highlight: 0.0,
        },
        boundary: BoundaryPolicy::Wrap,
        style: RenderStyle {
            backdrop: Backdrop::Clear,
            shape: Shape::Dot,
            connections: Some(Connections {
                max_distance: 120.0,
                max_alpha: 0.25,
                width: 0.6,
            }),
            glow: None,
        },
        speed: 1.0,
        time_step: DEFAULT_TIME_STEP,
    }
}

fn flow() -> Descriptor {
    Descriptor {
        kind: VariantKind::Flow,
        field: FieldKind::Sine(SineField::flow()),
        motion: MotionModel::Flow { speed: 1.2 },
        count: CountPolicy {
            mobile: 150,
            desktop: 300,
        },
        placement: Placement::Uniform,
        palette: Palette::portfolio(),
        accent: Accent::Chance(0.05),
        accent_color: hex("#f8fafc"),
        size: Span::new(0.5, 2.5),
        opacity: Span::new(0.2, 0.7),
        interaction: Interaction {
            mode: InteractionMode::Repel,
            radius: 120.0,
            strength: 4.0,
            highlight: 0.0,
        },
        boundary: BoundaryPolicy::Wrap,
        style: RenderStyle {
            backdrop: Backdrop::Trail(hex("#0b1020").with_alpha(0.08)),
            shape: Shape::Dot,
            connections: None,
            glow: Some(2.5),
        },
        speed: 1.0,
        time_step: DEFAULT_TIME_STEP,
    }
}

fn waves() -> Descriptor {
    Descriptor {
        kind: VariantKind::Waves,
        field: FieldKind::Sine(SineField::swell()),
        motion: MotionModel::Wave { phase: 0.6 },
        count: CountPolicy {
            mobile: 200,
            desktop: 400,
        },
        placement: Placement::JitteredGrid,
        palette: Palette::portfolio(),
        accent: Accent::GridEvery(5),
        accent_color: hex("#ec4899"),
        size: Span::new(1.0, 2.0),
        opacity: Span::new(0.25, 0.6),
        interaction: Interaction {
            mode: InteractionMode::Repel,
            radius: 110.0,
            strength: 12.0,
            highlight: 0.5,
        },
        boundary: BoundaryPolicy::Wrap,
        style: RenderStyle {
            backdrop: Backdrop::Clear,
            shape: Shape::Dot,
            connections: Some(Connections {
                max_distance: 70.0,
                max_alpha: 0.18,
                width: 0.5,
            }),
            glow: None,
        },
        speed: 1.0,
        time_step: DEFAULT_TIME_STEP,
    }
}

fn gradient() -> Descriptor {
    let palette = Palette::aurora();
    Descriptor {
        kind: VariantKind::Gradient,
        field: FieldKind::Sine(SineField::flow()),
        motion: MotionModel::Drift {
            max_speed: 0.3,
            nudge: 0.15,
        },
        count: CountPolicy {
            mobile: 3,
            desktop: 5,
        },
        placement: Placement::Uniform,
        palette: palette.clone(),
        accent: Accent::None,
        accent_color: Srgb::BLACK,
        size: Span::new(120.0, 260.0),
        opacity: Span::new(0.12, 0.3),
        interaction: Interaction {
            mode: InteractionMode::Attract,
            radius: 120.0,
            strength: 0.8,
            highlight: 0.0,
        },
        boundary: BoundaryPolicy::Wrap,
        style: RenderStyle {
            backdrop: Backdrop::Gradient {
                palette,
                speed: 0.05,
            },
            shape: Shape::Orb,
            connections: None,
            glow: None,
        },
        speed: 1.0,
        time_step: DEFAULT_TIME_STEP,
    }
}

fn pyramids() -> Descriptor {
    Descriptor {
        kind: VariantKind::Pyramids,
        field: FieldKind::Sine(SineField::breathe()),
        motion: MotionModel::Anchored,
        count: CountPolicy {
            mobile: 12,
            desktop: 24,
        },
        placement: Placement::Grid,
        palette: Palette::ocean(),
        accent: Accent::GridEvery(3),
        accent_color: hex("#5eead4"),
        size: Span::new(18.0, 30.0),
        opacity: Span::new(0.35, 0.6),
        interaction: Interaction {
            mode: InteractionMode::Tilt,
            radius: 120.0,
            strength: 0.6,
            highlight: 0.0,
        },
        boundary: BoundaryPolicy::Wrap,
        style: RenderStyle {
            backdrop: Backdrop::Clear,
            shape: Shape::Pyramid,
            connections: None,
            glow: None,
        },
        speed: 1.0,
        time_step: DEFAULT_TIME_STEP,
    }
}

impl Descriptor {
    /// The slice of this descriptor the initializer reads.
    pub fn seeding(&self) -> Seeding<'_> {
        Seeding {
            placement: self.placement,
            motion: self.motion,
            palette: &self.palette,
            accent: self.accent,
            accent_color: self.accent_color,
            size: self.size,
            opacity: self.opacity,
            boundary: self.boundary,
        }
    }

    /// Applies tuning overrides. Missing or mistyped numeric keys keep the
    /// preset; an unknown palette, boundary or field name is an error.
    pub fn tuned(mut self, params: &Value, seed: u64) -> Result<Self, EngineError> {
        self.count.desktop = param_usize(params, "count", self.count.desktop).min(MAX_COUNT);
        self.count.mobile = param_usize(params, "mobile_count", self.count.mobile).min(MAX_COUNT);

        if let Some(name) = param_str(params, "palette") {
            self.palette = Palette::from_name(name)?;
            if let Backdrop::Gradient { palette, .. } = &mut self.style.backdrop {
                *palette = self.palette.clone();
            }
        }

        self.speed = param_f64_within(params, "speed", self.speed, 0.0, 10.0);
        self.time_step = param_f64_within(params, "time_step", self.time_step, 0.0, 1.0);
        self.interaction.radius =
            param_f64_within(params, "interaction_radius", self.interaction.radius, 0.0, 400.0);

        let connected = param_bool(params, "connections", self.style.connections.is_some());
        self.style.connections = match (connected, self.style.connections) {
            (false, _) => None,
            (true, Some(c)) => Some(c),
            (true, None) => Some(Connections::default()),
        };

        let boundary = param_choice(params, "boundary", BOUNDARY_NAMES, self.boundary.name())?;
        self.boundary = BoundaryPolicy::from_name(boundary)?;

        let field = param_choice(params, "field", FIELD_NAMES, self.field.name())?;
        if field != self.field.name() {
            self.field = self.field_named(field, seed);
        }

        Ok(self)
    }

    /// Swaps the field while keeping the preset's amplitude, so displacement
    /// variants keep their wave height.
    fn field_named(&self, name: &str, seed: u64) -> FieldKind {
        let amplitude = match self.field.bound() {
            b if b > 0.0 => b,
            _ => SineField::flow().bound(),
        };
        match name {
            "perlin" => FieldKind::Perlin(NoiseField::new(seed as u32, 0.004, 0.25, amplitude)),
            "sine" => FieldKind::Sine(SineField::flow()),
            _ => FieldKind::Still,
        }
    }

    /// Effective tuning values.
    pub fn params(&self) -> Value {
        json!({
            "variant": self.kind.name(),
            "count": self.count.desktop,
            "mobile_count": self.count.mobile,
            "palette": self.palette.name(),
            "speed": self.speed,
            "connections": self.style.connections.is_some(),
            "boundary": self.boundary.name(),
            "field": self.field.name(),
            "interaction_radius": self.interaction.radius,
            "time_step": self.time_step,
        })
    }

    /// Schema of the tuning keys, with this variant's defaults.
    pub fn param_schema(&self) -> Value {
        let preset = self.kind.descriptor();
        json!({
            "count": {
                "type": "integer",
                "default": preset.count.desktop,
                "min": 0,
                "max": MAX_COUNT,
                "description": "Entity count at or above the 768px breakpoint"
            },
            "mobile_count": {
                "type": "integer",
                "default": preset.count.mobile,
                "min": 0,
                "max": MAX_COUNT,
                "description": "Entity count below the 768px breakpoint"
            },
            "palette": {
                "type": "string",
                "default": preset.palette.name(),
                "enum": Palette::list_names(),
                "description": "Built-in palette entities draw their colors from"
            },
            "speed": {
                "type": "number",
                "default": preset.speed,
                "min": 0.0,
                "max": 10.0,
                "description": "Multiplier on every motion"
            },
            "connections": {
                "type": "boolean",
                "default": preset.style.connections.is_some(),
                "description": "Draw lines between nearby entities"
            },
            "boundary": {
                "type": "string",
                "default": preset.boundary.name(),
                "enum": BOUNDARY_NAMES,
                "description": "Wrap to the opposite edge or clamp at the edge"
            },
            "field": {
                "type": "string",
                "default": preset.field.name(),
                "enum": FIELD_NAMES,
                "description": "Field function perturbing motion"
            },
            "interaction_radius": {
                "type": "number",
                "default": preset.interaction.radius,
                "min": 0.0,
                "max": 400.0,
                "description": "Pointer influence radius in pixels"
            },
            "time_step": {
                "type": "number",
                "default": preset.time_step,
                "min": 0.0,
                "max": 1.0,
                "description": "Field time advanced per frame"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in VariantKind::list() {
            assert_eq!(VariantKind::from_name(kind.name()).unwrap(), *kind);
        }
        assert_eq!(VariantKind::list_names().len(), VariantKind::list().len());
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(matches!(
            VariantKind::from_name("confetti"),
            Err(EngineError::UnknownVariant(name)) if name == "confetti"
        ));
    }

    #[test]
    fn interaction_radii_are_in_the_100_to_120_band() {
        for kind in VariantKind::list() {
            let r = kind.descriptor().interaction.radius;
            assert!((100.0..=120.0).contains(&r), "{}: {r}", kind.name());
        }
    }

    #[test]
    fn only_gradient_attracts() {
        for kind in VariantKind::list() {
            let attract = kind.descriptor().interaction.mode == InteractionMode::Attract;
            assert_eq!(attract, *kind == VariantKind::Gradient);
        }
    }

    #[test]
    fn empty_tuning_keeps_the_preset() {
        let d = VariantKind::Waves.descriptor().tuned(&json!({}), 1).unwrap();
        assert_eq!(d.count.desktop, 400);
        assert_eq!(d.field.name(), "sine");
        assert!(d.style.connections.is_some());
    }

    #[test]
    fn tuning_overrides_and_caps() {
        let d = VariantKind::Particles
            .descriptor()
            .tuned(
                &json!({
                    "count": 5000,
                    "mobile_count": 12,
                    "palette": "ember",
                    "speed": 2.5,
                    "connections": false,
                    "boundary": "clamp",
                    "interaction_radius": 80,
                }),
                1,
            )
            .unwrap();
        assert_eq!(d.count.desktop, MAX_COUNT);
        assert_eq!(d.count.mobile, 12);
        assert_eq!(d.palette.name(), "ember");
        assert_eq!(d.speed, 2.5);
        assert!(d.style.connections.is_none());
        assert_eq!(d.boundary, BoundaryPolicy::Clamp);
        assert_eq!(d.interaction.radius, 80.0);
    }

    #[test]
    fn enabling_connections_on_a_variant_without_them() {
        let d = VariantKind::Flow
            .descriptor()
            .tuned(&json!({"connections": true}), 1)
            .unwrap();
        assert_eq!(d.style.connections, Some(Connections::default()));
    }

    #[test]
    fn palette_tuning_reaches_the_gradient_backdrop() {
        let d = VariantKind::Gradient
            .descriptor()
            .tuned(&json!({"palette": "ember"}), 1)
            .unwrap();
        match &d.style.backdrop {
            Backdrop::Gradient { palette, .. } => assert_eq!(palette.name(), "ember"),
            other => panic!("unexpected backdrop {other:?}"),
        }
    }

    #[test]
    fn perlin_field_keeps_wave_amplitude() {
        let d = VariantKind::Waves
            .descriptor()
            .tuned(&json!({"field": "perlin"}), 9)
            .unwrap();
        assert_eq!(d.field.name(), "perlin");
        assert!((d.field.bound() - SineField::swell().bound()).abs() < 1e-12);
    }

    #[test]
    fn bad_names_are_errors() {
        let d = || VariantKind::Particles.descriptor();
        assert!(matches!(
            d().tuned(&json!({"palette": "neon"}), 1),
            Err(EngineError::InvalidPalette(_))
        ));
        assert!(matches!(
            d().tuned(&json!({"boundary": "bounce"}), 1),
            Err(EngineError::UnknownOption { .. })
        ));
        assert!(matches!(
            d().tuned(&json!({"field": "simplex"}), 1),
            Err(EngineError::UnknownOption { .. })
        ));
    }

    #[test]
    fn mistyped_numbers_fall_back() {
        let d = VariantKind::Flow
            .descriptor()
            .tuned(&json!({"speed": "fast", "count": -4}), 1)
            .unwrap();
        assert_eq!(d.speed, 1.0);
        assert_eq!(d.count.desktop, 300);
    }

    #[test]
    fn schema_covers_every_reported_param() {
        let d = VariantKind::Pyramids.descriptor();
        let schema = d.param_schema();
        for key in d.params().as_object().unwrap().keys() {
            if key == "variant" {
                continue;
            }
            assert!(schema.get(key).is_some(), "schema missing {key}");
            assert!(schema[key].get("description").is_some());
        }
    }
}
