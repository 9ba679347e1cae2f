pub mod character;
pub mod error;
pub mod player;
pub mod world;

pub use character::*;
pub use error::*;
pub use player::*;
pub use world::*;
