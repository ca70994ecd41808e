//! Region labelling and density assignment.

pub mod cleanup;
pub mod density;
pub mod region;

pub use cleanup::CleanupRule;
pub use density::DensityTable;
pub use region::{GeologicalUnit, Region, RegionModel};
