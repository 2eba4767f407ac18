//! Emberfall Core Engine
//!
//! Ambient background renderer: drifting diamond and ember particles on a 2D
//! raster surface, with an optional noise-warped hand sprite composited above.

pub mod engine;
pub mod error;
pub mod fx;
pub mod gpu;
pub mod raster;
pub mod shaders;
pub mod sim;

// Re-export main types
pub use engine::*;
pub use error::*;
pub use fx::*;
pub use raster::*;
pub use sim::*;

// Re-export tunables from emberfall-params
pub use emberfall_params::*;
