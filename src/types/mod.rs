pub mod constants;
pub mod error;
pub mod geometry;
pub mod info;

pub use constants::*;
pub use error::ForwardError;
pub use geometry::{Aabb, Contact, Rect, Triangle, VerticalHit};
pub use info::MapInfo;
