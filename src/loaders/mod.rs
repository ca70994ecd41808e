pub mod gocad;
pub mod topography;

pub use gocad::{load_gocad_tsurf, parse_gocad_tsurf};
pub use topography::{load_topography, parse_topography};
