//! softpipe: a fixed-function software rendering pipeline
//!
//! - `rasterizer`: camera, graphics state, vertex and fragment programs,
//!   point/line/triangle rasterizers and the depth-tested render pipeline
//! - `scene`: RON scene files, cube and Bezier geometry that drive it

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rasterizer;
pub mod scene;
