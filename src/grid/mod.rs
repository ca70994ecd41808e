pub mod grid2d;
pub mod tensor;

pub use grid2d::Grid2d;
pub use tensor::{Axis, Padding, TensorMesh, padded_widths};
