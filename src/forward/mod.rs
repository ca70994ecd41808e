//! Linear forward operator from active-cell density to receiver data.

pub mod kernel;
pub mod noise;
pub mod sensitivity;

use glam::DVec3;

use crate::types::Aabb;

pub use kernel::PrismGravity;
pub use noise::{Observations, synthetic_data};
pub use sensitivity::SensitivityMatrix;

/// Response at `receiver` of a single cell with unit property value.
///
/// Implementations must be pure: the sensitivity build may evaluate cells in
/// any order and from several threads.
pub trait ForwardKernel: Sync {
    fn response(&self, receiver: DVec3, cell: &Aabb) -> f64;
}
