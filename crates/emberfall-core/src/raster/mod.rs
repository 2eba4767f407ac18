pub mod color;
pub mod pixmap;
pub mod surface;

pub use color::*;
pub use pixmap::*;
pub use surface::*;
