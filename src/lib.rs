pub mod config;
pub mod forward;
pub mod geology;
pub mod grid;
pub mod loaders;
pub mod pipeline;
pub mod surface;
pub mod survey;
pub mod topography;
pub mod types;
pub mod visualization;
pub mod writers;

pub use config::{RunConfig, load_config};
pub use forward::{ForwardKernel, Observations, PrismGravity, SensitivityMatrix};
pub use geology::{DensityTable, Region, RegionModel};
pub use grid::{Axis, TensorMesh};
pub use loaders::{load_gocad_tsurf, load_topography};
pub use pipeline::{ForwardModel, Inputs, forward, load_inputs, run, write_outputs};
pub use survey::ReceiverSet;
pub use topography::{ActiveCells, Topography};
pub use types::{ForwardError, MapInfo};
