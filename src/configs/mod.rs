pub mod base;
pub mod logging;
pub mod player;

pub use base::*;
pub use logging::*;
pub use player::*;
