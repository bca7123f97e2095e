//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so byte-only consumers of this
//! crate do not pull in the `image` crate.

use std::path::Path;

use backdrop_core::color::Srgb;
use backdrop_core::error::EngineError;

use crate::pixel::{flatten_onto, raster_to_rgba};
use crate::raster::Raster;

/// Writes the raster as PNG. With a `background` the image is flattened
/// onto it; without one the alpha channel is kept.
pub fn write_png(raster: &Raster, background: Option<Srgb>, path: &Path) -> Result<(), EngineError> {
    let rgba = match background {
        Some(page) => flatten_onto(raster, page),
        None => raster_to_rgba(raster),
    };
    let w = u32::try_from(raster.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    tracing::debug!(path = %path.display(), width = w, height = h, "wrote snapshot");
    Ok(())
}
