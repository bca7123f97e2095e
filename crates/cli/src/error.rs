//! Failures of a `backdrop` invocation, grouped by who has to act on them.
//!
//! A failed run exits with a code per group, so scripts rendering many
//! backdrops can tell a bad request from a full disk:
//!
//! | code | group |
//! |------|-------|
//! | 2    | rejected by the argument parser before any backdrop work |
//! | 10   | the engine refused the seed (unknown variant, unrasterizable size, bad option value) |
//! | 11   | reading a seed file or writing the PNG or seed output failed |
//! | 12   | the request itself is malformed (unknown palette, non-object `--params`, no variant) |
//! | 13   | a seed file or `--params` payload could not be (de)serialized |

use backdrop_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The seed named a variant, size or option value the engine rejects.
    #[error(transparent)]
    Engine(EngineError),

    /// A seed file or snapshot path could not be read or written.
    #[error("{0}")]
    Io(String),

    /// The command line asked for something that cannot be rendered.
    #[error("{0}")]
    Input(String),

    /// A seed file or info payload failed to (de)serialize.
    #[error("{0}")]
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine(_) => 10,
            Self::Io(_) => 11,
            Self::Input(_) => 12,
            Self::Serialization(_) => 13,
        }
    }
}

impl From<EngineError> for CliError {
    /// Snapshot failures are I/O and an unknown palette is the caller's typo;
    /// everything else is the engine's verdict on the seed.
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => Self::Io(msg),
            EngineError::InvalidPalette(msg) => Self::Input(msg),
            other => Self::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_exit_code_is_10() {
        let err = CliError::from(EngineError::UnknownVariant("confetti".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("confetti"));
    }

    #[test]
    fn io_errors_exit_with_11() {
        assert_eq!(CliError::from(EngineError::Io("disk full".into())).exit_code(), 11);
        let missing = std::fs::read("/definitely/not/here.json").unwrap_err();
        assert_eq!(CliError::from(missing).exit_code(), 11);
    }

    #[test]
    fn bad_palette_is_an_input_error() {
        let err = CliError::from(EngineError::InvalidPalette("unknown palette 'neon'".into()));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn oversized_seed_is_an_engine_error() {
        let err = CliError::from(EngineError::InvalidDimensions);
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        assert_eq!(CliError::from(bad_json.unwrap_err()).exit_code(), 13);
    }
}
