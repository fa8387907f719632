//! Interactive view of the ICRS [p, q, r] triad for a source at (α, δ).
//!
//! The geometry lives in [`coords`] and [`axes`]; [`scene`] issues the draw
//! sequence against the [`canvas::Canvas`] boundary, which [`render`] implements
//! for a terminal framebuffer.

pub mod axes;
pub mod canvas;
pub mod coords;
pub mod error;
pub mod graphics;
pub mod help;
pub mod math;
pub mod render;
pub mod scene;
pub mod state;
pub mod vertex;
pub mod widget;

pub use axes::AxisConvention;
pub use coords::{direction_vector, SourceDirection, UnitTriad, ViewingAngles};
pub use error::{Error, Result};
pub use scene::{FrameParams, SceneAssembler, SceneConfig, Variant};
