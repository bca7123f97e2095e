//! RGBA8 conversion of a [`Raster`].
//!
//! Always available (no feature gate) so byte buffers can be produced without
//! the `image` crate. A backdrop is drawn on a transparent layer behind page
//! content, so snapshots may optionally flatten onto the page color.

use backdrop_core::color::{Rgba, Srgb};

use crate::raster::Raster;

/// Straight-alpha RGBA8 bytes, `width * height * 4` long.
pub fn raster_to_rgba(raster: &Raster) -> Vec<u8> {
    raster.pixels().iter().flat_map(|p| p.to_rgba8()).collect()
}

/// Opaque RGBA8 bytes with the raster composited over `background`.
pub fn flatten_onto(raster: &Raster, background: Srgb) -> Vec<u8> {
    let page = background.with_alpha(1.0);
    raster
        .pixels()
        .iter()
        .flat_map(|p| p.over(page).to_rgba8())
        .collect()
}

/// Fraction of pixels with any coverage.
pub fn coverage(raster: &Raster) -> f64 {
    let pixels = raster.pixels();
    if pixels.is_empty() {
        return 0.0;
    }
    let inked = pixels.iter().filter(|p: &&Rgba| p.a > 0.0).count();
    inked as f64 / pixels.len() as f64
}
