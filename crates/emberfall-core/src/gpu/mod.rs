pub mod device;
pub mod hand_fx;
pub mod pipelines;
pub mod textures;

pub use device::*;
pub use hand_fx::*;
pub use pipelines::*;
pub use textures::*;
