//! Fixed-function software rendering pipeline
//!
//! Stages, in draw order:
//! - vertex program: object space to screen space, optional Gouraud lighting
//! - rasterizer: points, lines and scanline-filled triangles
//! - fragment program: final color, optionally per-pixel Phong
//! - depth test into the framebuffer
//!
//! The camera writes the viewing matrices into the pipeline's graphics state.

mod camera;
mod edge;
mod error;
mod export;
mod interpolator;
mod math;
mod primitives;
mod program;
mod render;
mod shading;
mod state;
mod types;

pub use camera::*;
pub use edge::*;
pub use error::*;
pub use export::*;
pub use interpolator::*;
pub use math::*;
pub use primitives::*;
pub use program::*;
pub use render::*;
pub use shading::*;
pub use state::*;
pub use types::*;
