//! Error types for the backdrop engine core.

use thiserror::Error;

/// Errors produced while configuring or seeding a backdrop.
///
/// Nothing in the per-frame path returns an error: stepping and rendering are
/// pure numeric work over state that was validated when it was seeded.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, negative, not finite, or too large to rasterize.
    #[error("invalid dimensions: width and height must be positive finite sizes within raster limits")]
    InvalidDimensions,

    /// A variant name did not match any registered backdrop.
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// A tuning key carried a value outside its accepted set.
    #[error("unknown value '{value}' for option '{name}'")]
    UnknownOption { name: String, value: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed or looked up.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Writing an output artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_both_axes() {
        let msg = EngineError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn unknown_variant_includes_name() {
        let msg = EngineError::UnknownVariant("starfield".into()).to_string();
        assert!(msg.contains("starfield"), "missing name in: {msg}");
    }

    #[test]
    fn unknown_option_includes_name_and_value() {
        let err = EngineError::UnknownOption {
            name: "boundary".into(),
            value: "bounce".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("boundary"), "missing option in: {msg}");
        assert!(msg.contains("bounce"), "missing value in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = EngineError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
