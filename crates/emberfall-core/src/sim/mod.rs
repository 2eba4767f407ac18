pub mod particles;
pub mod population;
pub mod state;
pub mod viewport;

pub use particles::*;
pub use population::*;
pub use state::*;
pub use viewport::*;
