#![deny(unsafe_code)]
//! Core of the animated backdrop engine.
//!
//! One parametrized engine reproduces every backdrop variant: a
//! [`Descriptor`] selects the field function, entity seeding, pointer
//! interaction and render style; [`Simulation`] animates it; [`Driver`]
//! runs it against a host [`Platform`] and [`DrawSurface`].

pub mod color;
pub mod driver;
pub mod engine;
pub mod entity;
pub mod error;
pub mod field;
pub mod geometry;
pub mod init;
pub mod palette;
pub mod params;
pub mod pointer;
pub mod prng;
pub mod render;
pub mod seed;
pub mod step;
pub mod surface;
pub mod variant;

pub use color::{Rgba, Srgb};
pub use driver::{Driver, FrameRequest, Lifecycle, Listener, ListenerKind, Platform};
pub use engine::{Engine, Simulation};
pub use entity::{Entity, Motion};
pub use error::EngineError;
pub use field::{FieldFn, FieldKind, NoiseField, SineField};
pub use geometry::{BoundaryPolicy, Extent};
pub use palette::Palette;
pub use pointer::PointerHandle;
pub use prng::Xorshift64;
pub use seed::Seed;
pub use surface::{DrawSurface, Paint, RecordingSurface};
pub use variant::{Descriptor, VariantKind};
