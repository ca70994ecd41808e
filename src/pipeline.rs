//! The forward run as a chain of stages over immutable values.
//!
//! All file reading happens in [`load_inputs`] and all writing in
//! [`write_outputs`], so a run that fails in between leaves no artifacts.

use std::time::Instant;

use tracing::info;

use crate::config::RunConfig;
use crate::forward::{Observations, PrismGravity, SensitivityMatrix, synthetic_data};
use crate::geology::{GeologicalUnit, RegionModel};
use crate::grid::TensorMesh;
use crate::loaders::{load_gocad_tsurf, load_topography};
use crate::surface::Selection;
use crate::survey::ReceiverSet;
use crate::topography::{ActiveCells, Topography};
use crate::types::ForwardError;
use crate::visualization::{PlotOptions, save_data_map};
use crate::writers::{write_mesh, write_model, write_npy_f64, write_observations};

#[derive(Debug, Clone)]
pub struct Inputs {
    pub topography: Topography,
    /// Units in painting order.
    pub surfaces: Vec<GeologicalUnit>,
}

/// Everything a run computes, stage by stage.
#[derive(Debug, Clone)]
pub struct ForwardModel {
    pub mesh: TensorMesh,
    pub regions: RegionModel,
    pub active: ActiveCells,
    /// Density contrast per active cell (g/cc).
    pub density: Vec<f64>,
    pub receivers: ReceiverSet,
    pub sensitivity: SensitivityMatrix,
    pub observations: Observations,
}

impl ForwardModel {
    /// Density over the full mesh with `no_data` in air cells.
    pub fn full_density(&self, no_data: f64) -> Result<Vec<f64>, ForwardError> {
        self.active.expand(&self.density, no_data)
    }
}

pub fn load_inputs(config: &RunConfig) -> Result<Inputs, ForwardError> {
    let topography = load_topography(&config.topography)?;
    info!(
        path = %config.topography.display(),
        samples = topography.points().len(),
        "loaded topography"
    );

    let surfaces = config
        .surfaces
        .iter()
        .map(|entry| {
            let surface = load_gocad_tsurf(&entry.path)?;
            info!(
                path = %entry.path.display(),
                vertices = surface.vertices().len(),
                triangles = surface.triangle_count(),
                "loaded surface"
            );
            Ok(GeologicalUnit {
                surface,
                selection: Selection {
                    boundaries: entry.boundaries,
                    internal: entry.internal,
                },
                region: entry.region,
            })
        })
        .collect::<Result<Vec<_>, ForwardError>>()?;

    Ok(Inputs {
        topography,
        surfaces,
    })
}

pub fn forward(config: &RunConfig, inputs: &Inputs) -> Result<ForwardModel, ForwardError> {
    let mesh = TensorMesh::padded(&config.mesh)?;
    info!(shape = ?mesh.shape(), cells = mesh.n_cells(), "built mesh");

    let mut regions = RegionModel::classify(&mesh, &inputs.surfaces)?;
    for rule in &config.cleanup {
        let cleared = regions.apply_cleanup(&mesh, rule);
        info!(region = ?rule.region, cleared, "applied cleanup rule");
    }

    let topography = inputs.topography.interpolator();
    let active = ActiveCells::from_topography(&mesh, &topography);
    let density = active.reduce(&config.density.assign(regions.labels()))?;

    let receivers = ReceiverSet::draped(&mesh, &config.survey, &topography)?;
    let sensitivity = SensitivityMatrix::build(&mesh, &active, &receivers, &PrismGravity)?;
    let observations = synthetic_data(&sensitivity, &density, &config.noise)?;

    Ok(ForwardModel {
        mesh,
        regions,
        active,
        density,
        receivers,
        sensitivity,
        observations,
    })
}

pub fn write_outputs(config: &RunConfig, model: &ForwardModel) -> Result<(), ForwardError> {
    let output = &config.output;
    std::fs::create_dir_all(&output.directory).map_err(|source| ForwardError::Write {
        path: output.directory.clone(),
        source,
    })?;

    let path = output.path_of(&output.observations);
    write_observations(&path, &model.receivers, &model.observations)?;
    info!(path = %path.display(), "wrote observations");

    let path = output.path_of(&output.sensitivity);
    let g = &model.sensitivity;
    write_npy_f64(&path, &[g.rows(), g.cols()], g.data())?;
    info!(path = %path.display(), "wrote sensitivity");

    let path = output.path_of(&output.mesh);
    write_mesh(&path, &model.mesh)?;

    let path = output.path_of(&output.model);
    write_model(&path, &model.mesh, &model.full_density(config.no_data_value)?)?;
    info!(path = %path.display(), "wrote density model");

    let path = output.path_of(&output.regions);
    write_model(&path, &model.mesh, &model.regions.codes(config.no_data_value))?;

    let options = PlotOptions {
        anchor: glam::DVec2::new(config.mesh.anchor[0], config.mesh.anchor[1]),
        half_width: output.plot_half_width,
        ..PlotOptions::default()
    };
    let path = output.path_of(&output.plot);
    save_data_map(&path, &model.receivers, &model.observations.values, &options)?;
    info!(path = %path.display(), "wrote data map");

    Ok(())
}

/// Validate, load, compute and write.
pub fn run(config: &RunConfig) -> Result<ForwardModel, ForwardError> {
    let start = Instant::now();
    config.validate()?;
    let inputs = load_inputs(config)?;
    let model = forward(config, &inputs)?;
    write_outputs(config, &model)?;
    info!(elapsed_s = start.elapsed().as_secs_f64(), "forward run complete");
    Ok(model)
}
