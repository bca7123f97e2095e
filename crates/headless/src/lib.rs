#![deny(unsafe_code)]
//! Display-free host for the backdrop engine.
//!
//! Runs the same [`Driver`] a browser would, against a CPU [`Raster`] and a
//! manual frame scheduler, so a [`Seed`] can be rendered to RGBA bytes or a
//! PNG on any machine. The CLI and the test suites both go through here.

pub mod pixel;
pub mod platform;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use backdrop_core::driver::{Driver, Lifecycle};
use backdrop_core::engine::Simulation;
use backdrop_core::error::EngineError;
use backdrop_core::seed::Seed;

pub use platform::{run_frames, HeadlessPlatform};
pub use raster::Raster;

/// Mounts `seed` on a headless platform and runs its frames.
///
/// A running backdrop draws one frame per step, so at least one frame is run
/// even when `seed.frames` is zero. Under reduced motion only the static
/// frame is drawn and `seed.frames` is ignored.
pub fn render_seed(seed: &Seed, reduced_motion: bool) -> Result<Driver<HeadlessPlatform>, EngineError> {
    let extent = seed.extent()?;
    extent.pixels()?;
    let sim = Simulation::from_json(&seed.variant, seed.seed, &seed.params)?;
    let platform =
        HeadlessPlatform::new(extent.width(), extent.height()).with_reduced_motion(reduced_motion);
    let mut driver = Driver::new(platform, Box::new(sim));
    driver.mount();

    if driver.state() == Lifecycle::Running {
        let ran = run_frames(&mut driver, seed.frames.max(1));
        tracing::info!(variant = %seed.variant, frames = ran, "rendered headless frames");
    }
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::engine::Engine;
    use serde_json::json;

    #[test]
    fn every_variant_renders_ink() {
        for name in backdrop_core::VariantKind::list_names() {
            let mut seed = Seed::new(name, 320.0, 200.0, 42);
            seed.frames = 5;
            let driver = render_seed(&seed, false).unwrap();
            let raster = driver.surface().unwrap();
            assert_eq!(raster.frames(), 5, "{name}");
            assert!(raster.has_ink(), "{name} drew nothing");
        }
    }

    #[test]
    fn headless_run_matches_direct_simulation() {
        let mut seed = Seed::new("flow", 640.0, 480.0, 9);
        seed.params = json!({"count": 60});
        seed.frames = 25;
        let driver = render_seed(&seed, false).unwrap();
        let direct = seed.simulation().unwrap();
        assert_eq!(driver.engine().entities(), direct.entities());
    }

    #[test]
    fn same_seed_same_pixels() {
        let mut seed = Seed::new("waves", 200.0, 150.0, 3);
        seed.frames = 10;
        let a = render_seed(&seed, false).unwrap();
        let b = render_seed(&seed, false).unwrap();
        assert_eq!(
            pixel::raster_to_rgba(a.surface().unwrap()),
            pixel::raster_to_rgba(b.surface().unwrap())
        );
    }

    #[test]
    fn reduced_motion_draws_one_frame() {
        let mut seed = Seed::new("particles", 320.0, 200.0, 1);
        seed.frames = 50;
        let driver = render_seed(&seed, true).unwrap();
        assert_eq!(driver.surface().unwrap().frames(), 1);
        assert_eq!(driver.platform().requested(), 0);
    }

    #[test]
    fn invalid_seed_is_rejected() {
        assert!(matches!(
            render_seed(&Seed::new("particles", 0.0, 10.0, 1), false),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(matches!(
            render_seed(&Seed::new("lasers", 10.0, 10.0, 1), false),
            Err(EngineError::UnknownVariant(_))
        ));
    }

    #[test]
    fn oversized_seed_is_rejected_before_allocating() {
        for reduced in [false, true] {
            assert!(matches!(
                render_seed(&Seed::new("particles", 1e10, 1e10, 1), reduced),
                Err(EngineError::InvalidDimensions)
            ));
        }
    }
}
