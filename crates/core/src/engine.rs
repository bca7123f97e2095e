//! The `Engine` trait the driver runs, and the one implementation of it.
//!
//! The trait is object-safe so hosts can hold a `Box<dyn Engine>` and stay
//! independent of how a backdrop is configured.

use glam::DVec2;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::EngineError;
use crate::geometry::Extent;
use crate::init::initialize;
use crate::prng::Xorshift64;
use crate::render::render;
use crate::step::step;
use crate::surface::DrawSurface;
use crate::variant::{Descriptor, VariantKind};

/// A frame-driven backdrop simulation.
pub trait Engine {
    /// Drops the current entity set and seeds a fresh one for `extent`.
    fn reseed(&mut self, extent: Extent);

    /// Advances one frame. Does nothing before the first reseed.
    fn step(&mut self, pointer: Option<DVec2>);

    /// Paints the current state. Never mutates entities.
    fn render(&self, surface: &mut dyn DrawSurface);

    fn entities(&self) -> &[Entity];

    /// Extent of the last reseed, if any.
    fn extent(&self) -> Option<Extent>;

    /// Releases the entity set.
    fn clear(&mut self);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

/// A [`Descriptor`] plus the mutable state it animates.
#[derive(Debug, Clone)]
pub struct Simulation {
    descriptor: Descriptor,
    rng: Xorshift64,
    extent: Option<Extent>,
    entities: Vec<Entity>,
    time: f64,
    frame: u64,
}

impl Simulation {
    pub fn new(descriptor: Descriptor, seed: u64) -> Self {
        Self {
            descriptor,
            rng: Xorshift64::new(seed),
            extent: None,
            entities: Vec::new(),
            time: 0.0,
            frame: 0,
        }
    }

    /// Builds a simulation from a variant name and tuning JSON.
    pub fn from_json(variant: &str, seed: u64, params: &Value) -> Result<Self, EngineError> {
        let descriptor = VariantKind::from_name(variant)?
            .descriptor()
            .tuned(params, seed)?;
        Ok(Self::new(descriptor, seed))
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Field time of the next step.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Steps taken since the last reseed.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Engine for Simulation {
    fn reseed(&mut self, extent: Extent) {
        let count = self.descriptor.count.for_width(extent.width());
        self.entities = initialize(&self.descriptor.seeding(), count, extent, &mut self.rng);
        self.extent = Some(extent);
        self.frame = 0;
        tracing::debug!(
            variant = self.descriptor.kind.name(),
            count,
            width = extent.width(),
            height = extent.height(),
            "reseeded entity set"
        );
    }

    fn step(&mut self, pointer: Option<DVec2>) {
        let Some(extent) = self.extent else {
            return;
        };
        step(&mut self.entities, &self.descriptor, pointer, self.time, extent);
        self.time += self.descriptor.time_step;
        self.frame += 1;
    }

    fn render(&self, surface: &mut dyn DrawSurface) {
        render(surface, &self.entities, &self.descriptor.style, self.time);
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn extent(&self) -> Option<Extent> {
        self.extent
    }

    fn clear(&mut self) {
        self.entities = Vec::new();
        self.extent = None;
    }

    fn params(&self) -> Value {
        self.descriptor.params()
    }

    fn param_schema(&self) -> Value {
        self.descriptor.param_schema()
    }
}
