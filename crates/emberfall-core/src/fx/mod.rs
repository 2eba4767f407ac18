pub mod layer;
pub mod layout;
pub mod program;
pub mod software;
pub mod sprite;

pub use layer::*;
pub use layout::*;
pub use software::*;
pub use sprite::*;
