//! Per-frame entity update.
//!
//! Order per entity: field-driven motion, pointer influence, then the
//! boundary policy. Size and opacity are re-derived from their base values
//! every frame and clamped, so no adjustment accumulates across frames.

use glam::DVec2;

use crate::entity::{Entity, Motion};
use crate::field::FieldFn;
use crate::geometry::Extent;
use crate::init::MotionModel;
use crate::variant::Descriptor;

/// How the pointer acts on entities within `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Pushed away from the pointer.
    Repel,
    /// Pulled toward the pointer, never past it.
    Attract,
    /// Position untouched; the apex leans toward the pointer.
    Tilt,
}

/// Pointer influence parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub mode: InteractionMode,
    pub radius: f64,
    /// Peak displacement per frame in pixels (tilt: peak lean).
    pub strength: f64,
    /// Extra opacity and relative size at the pointer, fading to none at `radius`.
    pub highlight: f64,
}

impl Interaction {
    /// `1 - d/R` inside the radius, zero outside.
    pub fn falloff(&self, distance: f64) -> f64 {
        if self.radius <= 0.0 || !(distance < self.radius) {
            return 0.0;
        }
        1.0 - distance / self.radius
    }
}

/// Sizes may swing to half the minimum and twice the maximum under wave
/// and highlight modulation, never further.
const SIZE_FLOOR: f64 = 0.5;
const SIZE_CEIL: f64 = 2.0;

/// Longest tilt vector.
const MAX_TILT: f64 = 1.0;

/// Advances every entity one frame at time `t`.
pub fn step(
    entities: &mut [Entity],
    descriptor: &Descriptor,
    pointer: Option<DVec2>,
    t: f64,
    extent: Extent,
) {
    let field = &descriptor.field;
    let speed = descriptor.speed;
    let nudge = match descriptor.motion {
        MotionModel::Drift { nudge, .. } if !field.is_still() => nudge,
        _ => 0.0,
    };

    for entity in entities.iter_mut() {
        entity.size = entity.base_size;
        entity.opacity = entity.base_opacity;

        match entity.motion {
            Motion::Drift { velocity } => {
                let mut delta = velocity;
                if nudge > 0.0 {
                    let angle = field.angle(entity.position.x, entity.position.y, t);
                    delta += DVec2::from_angle(angle) * nudge;
                }
                entity.position += delta * speed;
            }
            Motion::Flow { speed: own } => {
                let angle = field.angle(entity.position.x, entity.position.y, t);
                entity.position += DVec2::from_angle(angle) * own * speed;
            }
            Motion::Wave { anchor, phase } => {
                let displacement = field.evaluate(anchor.x, anchor.y, t * speed + phase);
                let bound = field.bound();
                let swell = if bound > 0.0 { displacement / bound } else { 0.0 };
                entity.position = DVec2::new(anchor.x, anchor.y + displacement);
                entity.size = entity.base_size * (1.0 + 0.5 * swell);
                entity.opacity = entity.base_opacity * (0.6 + 0.4 * swell);
            }
            Motion::Anchored { anchor } => {
                entity.position = anchor;
                let ts = t * speed;
                entity.tilt = DVec2::new(
                    field.evaluate(anchor.x, anchor.y, ts),
                    field.evaluate(anchor.y, anchor.x, ts + 1.7),
                );
            }
        }

        if let Some(pointer) = pointer {
            apply_pointer(entity, &descriptor.interaction, pointer);
        }

        entity.opacity = entity.opacity.clamp(0.0, 1.0);
        entity.size = entity.size.clamp(
            descriptor.size.min * SIZE_FLOOR,
            descriptor.size.max * SIZE_CEIL,
        );
        entity.tilt = entity.tilt.clamp_length_max(MAX_TILT);
        entity.position = descriptor.boundary.apply(entity.position, extent);
    }
}

fn apply_pointer(entity: &mut Entity, interaction: &Interaction, pointer: DVec2) {
    let offset = entity.position - pointer;
    let distance = offset.length();
    let falloff = interaction.falloff(distance);
    if falloff <= 0.0 {
        return;
    }
    let away = offset.try_normalize().unwrap_or(DVec2::ZERO);
    let force = interaction.strength * falloff;

    match interaction.mode {
        InteractionMode::Repel => entity.position += away * force,
        InteractionMode::Attract => entity.position -= away * force.min(distance),
        InteractionMode::Tilt => entity.tilt -= away * falloff * interaction.strength,
    }
    if interaction.highlight > 0.0 {
        entity.opacity += interaction.highlight * falloff;
        entity.size *= 1.0 + interaction.highlight * falloff;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::initialize;
    use crate::prng::Xorshift64;
    use crate::variant::VariantKind;
    use proptest::prelude::*;

    const DT: f64 = 1.0 / 60.0;

    fn seeded(kind: VariantKind, count: usize, w: f64, h: f64, seed: u64) -> (Descriptor, Vec<Entity>, Extent) {
        let d = kind.descriptor();
        let extent = Extent::new(w, h).unwrap();
        let entities = initialize(&d.seeding(), count, extent, &mut Xorshift64::new(seed));
        (d, entities, extent)
    }

    #[test]
    fn ten_particles_thousand_steps_stay_inside_and_move() {
        let (d, mut entities, extent) = seeded(VariantKind::Particles, 10, 800.0, 600.0, 42);
        let initial: Vec<DVec2> = entities.iter().map(|e| e.position).collect();
        for n in 0..1000 {
            step(&mut entities, &d, None, n as f64 * DT, extent);
            for e in &entities {
                assert!(extent.contains(e.position), "step {n}: {:?}", e.position);
            }
        }
        assert_eq!(entities.len(), 10);
        assert!(entities
            .iter()
            .zip(&initial)
            .any(|(e, p)| e.position != *p));
    }

    #[test]
    fn wave_anchor_never_drifts() {
        let (d, mut entities, extent) = seeded(VariantKind::Waves, 25, 800.0, 600.0, 7);
        let anchors: Vec<_> = entities.iter().map(|e| e.motion.anchor()).collect();
        for n in 0..500 {
            step(&mut entities, &d, None, n as f64 * DT, extent);
        }
        let after: Vec<_> = entities.iter().map(|e| e.motion.anchor()).collect();
        assert_eq!(anchors, after);
        for e in &entities {
            let anchor = e.motion.anchor().unwrap();
            assert_eq!(e.position.x, anchor.x);
        }
    }

    #[test]
    fn repel_pushes_away_and_attract_pulls_in() {
        let (mut d, mut entities, extent) = seeded(VariantKind::Particles, 1, 800.0, 600.0, 1);
        d.speed = 0.0;
        entities[0].position = DVec2::new(400.0, 300.0);
        let pointer = DVec2::new(380.0, 300.0);

        step(&mut entities, &d, Some(pointer), 0.0, extent);
        assert!(entities[0].position.x > 400.0);

        d.interaction.mode = InteractionMode::Attract;
        entities[0].position = DVec2::new(400.0, 300.0);
        step(&mut entities, &d, Some(pointer), 0.0, extent);
        let x = entities[0].position.x;
        assert!(x < 400.0 && x >= 380.0, "{x}");
    }

    #[test]
    fn pointer_outside_radius_has_no_effect() {
        let (mut d, mut entities, extent) = seeded(VariantKind::Particles, 1, 800.0, 600.0, 1);
        d.speed = 0.0;
        entities[0].position = DVec2::new(400.0, 300.0);
        step(&mut entities, &d, Some(DVec2::new(100.0, 100.0)), 0.0, extent);
        assert_eq!(entities[0].position, DVec2::new(400.0, 300.0));
    }

    #[test]
    fn pyramids_tilt_toward_pointer_without_moving() {
        let (d, mut entities, extent) = seeded(VariantKind::Pyramids, 4, 800.0, 600.0, 1);
        let anchor = entities[0].motion.anchor().unwrap();
        let pointer = anchor + DVec2::new(40.0, 0.0);
        step(&mut entities, &d, None, 0.0, extent);
        let still = entities[0].tilt;
        step(&mut entities, &d, Some(pointer), 0.0, extent);
        assert_eq!(entities[0].position, anchor);
        assert!(entities[0].tilt.x > still.x);
        assert!(entities[0].tilt.length() <= MAX_TILT + 1e-12);
    }

    #[test]
    fn highlight_is_clamped_and_does_not_accumulate() {
        let (d, mut entities, extent) = seeded(VariantKind::Waves, 9, 300.0, 300.0, 3);
        let target = entities[4].motion.anchor().unwrap();
        for _ in 0..50 {
            step(&mut entities, &d, Some(target), 0.0, extent);
        }
        let lit = entities[4].opacity;
        assert!((0.0..=1.0).contains(&lit));
        step(&mut entities, &d, None, 0.0, extent);
        assert!(entities[4].opacity <= lit);
        assert!(entities[4].size <= d.size.max * SIZE_CEIL);
    }

    #[test]
    fn clamp_boundary_pins_to_edges() {
        let (mut d, mut entities, extent) = seeded(VariantKind::Particles, 1, 100.0, 100.0, 1);
        d.boundary = crate::geometry::BoundaryPolicy::Clamp;
        entities[0].position = DVec2::new(99.9, 50.0);
        entities[0].motion = Motion::Drift {
            velocity: DVec2::new(5.0, 0.0),
        };
        step(&mut entities, &d, None, 0.0, extent);
        assert!(entities[0].position.x < 100.0 && entities[0].position.x > 99.9);
    }

    #[test]
    fn falloff_is_linear_inside_radius() {
        let i = Interaction {
            mode: InteractionMode::Repel,
            radius: 100.0,
            strength: 3.0,
            highlight: 0.0,
        };
        assert_eq!(i.falloff(0.0), 1.0);
        assert_eq!(i.falloff(50.0), 0.5);
        assert_eq!(i.falloff(100.0), 0.0);
        assert_eq!(i.falloff(250.0), 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn every_variant_stays_inside_for_any_step_count(
            variant in 0usize..5,
            steps in 0usize..200,
            w in 10.0_f64..2000.0,
            h in 10.0_f64..2000.0,
            seed in any::<u64>(),
            px in -100.0_f64..2100.0,
            py in -100.0_f64..2100.0,
        ) {
            let kind = VariantKind::list()[variant];
            let (d, mut entities, extent) = seeded(kind, 30, w, h, seed);
            for n in 0..steps {
                step(&mut entities, &d, Some(DVec2::new(px, py)), n as f64 * DT, extent);
                prop_assert_eq!(entities.len(), 30);
                for e in &entities {
                    prop_assert!(extent.contains(e.position), "{:?} outside {:?}", e.position, extent);
                    prop_assert!((0.0..=1.0).contains(&e.opacity));
                    prop_assert!(e.size >= d.size.min * SIZE_FLOOR && e.size <= d.size.max * SIZE_CEIL);
                }
            }
        }
    }
}
