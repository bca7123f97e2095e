//! Reproducible description of a rendered backdrop frame.
//!
//! A [`Seed`] captures everything needed to recreate a frame: variant name,
//! surface size, tuning parameters, PRNG seed and frame count.

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, Simulation};
use crate::error::EngineError;
use crate::geometry::Extent;

/// Two identical `Seed` values run through the same binary produce
/// bit-identical frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub variant: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// A seed with empty params and zero frames.
    pub fn new(variant: &str, width: f64, height: f64, seed: u64) -> Self {
        Self {
            variant: variant.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    pub fn extent(&self) -> Result<Extent, EngineError> {
        Extent::new(self.width, self.height)
    }

    /// Checks that the size can be rasterized and that the variant and
    /// tuning are accepted.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.extent()?.pixels()?;
        Simulation::from_json(&self.variant, self.seed, &self.params)?;
        Ok(())
    }

    /// A seeded simulation advanced by `frames` steps without pointer input.
    pub fn simulation(&self) -> Result<Simulation, EngineError> {
        let extent = self.extent()?;
        let mut sim = Simulation::from_json(&self.variant, self.seed, &self.params)?;
        sim.reseed(extent);
        for _ in 0..self.frames {
            sim.step(None);
        }
        Ok(sim)
    }
}
