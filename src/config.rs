//! Run configuration.
//!
//! Every field defaults to the reference forward run over the TKC kimberlite
//! geology, so an empty YAML document reproduces it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geology::{CleanupRule, DensityTable, Region};
use crate::grid::Axis;
use crate::types::{DEFAULT_NOISE_SEED, ForwardError, NO_DATA};

const GEOLOGY_DIR: &str = "../Geology_Surfaces";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Value written for air cells and used as the unclassified region code.
    pub no_data_value: f64,
    pub mesh: MeshConfig,
    /// Topography samples: header line followed by `x y z` rows.
    pub topography: PathBuf,
    /// Geological surfaces, applied in order; later entries win on overlap.
    pub surfaces: Vec<SurfaceConfig>,
    pub cleanup: Vec<CleanupRule>,
    pub density: DensityTable,
    pub survey: SurveyConfig,
    pub noise: NoiseConfig,
    pub output: OutputConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let geology = Path::new(GEOLOGY_DIR);
        let surface = |name: &str, region| SurfaceConfig {
            path: geology.join(name),
            boundaries: true,
            internal: true,
            region,
        };
        Self {
            no_data_value: NO_DATA,
            mesh: MeshConfig::default(),
            topography: geology.join("TKCtopo.dat"),
            surfaces: vec![
                surface("Till.ts", Region::Till),
                surface("PK1.ts", Region::Pk1),
                surface("PK2.ts", Region::Pk2),
                surface("PK3.ts", Region::Pk3),
                surface("HK1.ts", Region::Hk1),
                surface("VK.ts", Region::Vk),
            ],
            cleanup: vec![CleanupRule {
                region: Region::Pk1,
                axis: Axis::Y,
                below: Some(350.0 + 7.133e6),
                above: None,
            }],
            density: DensityTable::default(),
            survey: SurveyConfig::default(),
            noise: NoiseConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Core cell size along x, y, z (metres).
    pub cell_size: [f64; 3],
    /// Core cell count along x, y, z.
    pub core_cells: [usize; 3],
    /// Padding cells on each horizontal side and below the core.
    pub padding_cells: usize,
    /// Geometric growth of successive padding cells, per axis.
    pub padding_factor: [f64; 3],
    /// World position of the core centre (x, y) and of the mesh top (z).
    pub anchor: [f64; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            cell_size: [10.0, 10.0, 10.0],
            core_cells: [61, 61, 50],
            padding_cells: 10,
            padding_factor: [1.25, 1.25, 1.25],
            anchor: [300.0 + 5.57e5, 600.0 + 7.133e6, 450.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub path: PathBuf,
    /// Select cells cut by the surface.
    #[serde(default = "default_true")]
    pub boundaries: bool,
    /// Select cells whose centre is enclosed by the surface.
    #[serde(default = "default_true")]
    pub internal: bool,
    pub region: Region,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Cells excluded from the receiver lattice on every horizontal side.
    pub padding: usize,
    /// Take every `stride`-th cell centre.
    pub stride: usize,
    /// Height of the receivers above the topography (metres).
    pub standoff: f64,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            padding: 10,
            stride: 2,
            standoff: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Standard deviation as a fraction of each datum's magnitude.
    pub relative: f64,
    /// Standard deviation floor (mGal).
    pub floor: f64,
    pub seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            relative: 0.0,
            floor: 0.0,
            seed: DEFAULT_NOISE_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub observations: PathBuf,
    pub sensitivity: PathBuf,
    pub model: PathBuf,
    /// Region codes per cell, in the same layout as `model`.
    pub regions: PathBuf,
    pub mesh: PathBuf,
    pub plot: PathBuf,
    /// Half-width of the plotted window about the anchor; the receiver footprint when unset.
    pub plot_half_width: Option<f64>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            observations: "GRAV_CoarseForward_DoubleContrast_Synthetic_data.obs".into(),
            sensitivity: "G_Grav_Inverse.npy".into(),
            model: "model_grav_inverse_mesh.den".into(),
            regions: "model_regions.mod".into(),
            mesh: "mesh_inverse.msh".into(),
            plot: "Grav_Data_Inverse_Mesh.png".into(),
            plot_half_width: Some(500.0),
        }
    }
}

impl OutputConfig {
    pub fn path_of(&self, file: &Path) -> PathBuf {
        self.directory.join(file)
    }
}

impl RunConfig {
    /// Reject configurations that cannot produce a run, before any file is touched.
    pub fn validate(&self) -> Result<(), ForwardError> {
        let invalid = |msg: String| Err(ForwardError::InvalidConfig(msg));

        if !self.no_data_value.is_finite() {
            return invalid("no_data_value must be finite".to_string());
        }
        let mesh = &self.mesh;
        for axis in 0..3 {
            if mesh.cell_size[axis] <= 0.0 || !mesh.cell_size[axis].is_finite() {
                return invalid(format!(
                    "mesh.cell_size[{axis}] must be positive, got {}",
                    mesh.cell_size[axis]
                ));
            }
            if mesh.core_cells[axis] == 0 {
                return invalid(format!("mesh.core_cells[{axis}] must be at least 1"));
            }
            if mesh.padding_factor[axis] < 1.0 || !mesh.padding_factor[axis].is_finite() {
                return invalid(format!(
                    "mesh.padding_factor[{axis}] must be >= 1, got {}",
                    mesh.padding_factor[axis]
                ));
            }
        }
        if mesh.anchor.iter().any(|v| !v.is_finite()) {
            return invalid("mesh.anchor must be finite".to_string());
        }
        if self.surfaces.is_empty() {
            return invalid("at least one geological surface is required".to_string());
        }
        for rule in &self.cleanup {
            rule.validate()?;
        }
        if self.survey.stride == 0 {
            return invalid("survey.stride must be at least 1".to_string());
        }
        if !self.survey.standoff.is_finite() {
            return invalid("survey.standoff must be finite".to_string());
        }
        for axis in 0..2 {
            let cells = mesh.core_cells[axis] + 2 * mesh.padding_cells;
            if 2 * self.survey.padding >= cells {
                return invalid(format!(
                    "survey.padding {} leaves no receivers along axis {axis} ({cells} cells)",
                    self.survey.padding
                ));
            }
        }
        if self.noise.relative < 0.0 || self.noise.floor < 0.0 {
            return invalid("noise levels must be non-negative".to_string());
        }
        if !self.density.is_finite() {
            return invalid("density values must be finite".to_string());
        }
        if let Some(half) = self.output.plot_half_width {
            if !(half.is_finite() && half > 0.0) {
                return invalid(format!(
                    "output.plot_half_width must be positive, got {half}"
                ));
            }
        }
        Ok(())
    }
}

/// Load a YAML run configuration. Relative input and output paths are resolved
/// against the directory containing the YAML file.
pub fn load_config(yaml_path: impl AsRef<Path>) -> Result<RunConfig, ForwardError> {
    let yaml_path = yaml_path.as_ref();
    let yaml_str = std::fs::read_to_string(yaml_path).map_err(|source| ForwardError::Read {
        path: yaml_path.to_path_buf(),
        source,
    })?;
    let mut config: RunConfig = serde_yaml::from_str(&yaml_str)?;

    config.topography = resolve_path(yaml_path, &config.topography);
    for surface in &mut config.surfaces {
        surface.path = resolve_path(yaml_path, &surface.path);
    }
    config.output.directory = resolve_path(yaml_path, &config.output.directory);

    config.validate()?;
    Ok(config)
}

fn resolve_path(yaml_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    match yaml_path.parent() {
        Some(parent) => parent.join(path),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_matches_reference_run() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.surfaces.len(), 6);
        assert_eq!(config.surfaces[0].region, Region::Till);
        assert_eq!(config.surfaces[5].region, Region::Vk);
        assert_eq!(config.mesh.core_cells, [61, 61, 50]);
        assert_eq!(config.no_data_value, -100.0);
        assert_eq!(config.cleanup[0].below, Some(7_133_350.0));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "survey:\n  stride: 3\nnoise:\n  floor: 0.01\n";
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.survey.stride, 3);
        assert_eq!(config.survey.padding, 10);
        assert_eq!(config.noise.floor, 0.01);
        assert_eq!(config.noise.seed, DEFAULT_NOISE_SEED);
        assert_eq!(config.density, DensityTable::default());
    }

    #[test]
    fn surface_flags_default_to_true() {
        let yaml = "surfaces:\n  - { path: a.ts, region: hk1 }\n";
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.surfaces[0].boundaries);
        assert!(config.surfaces[0].internal);
        assert_eq!(config.surfaces[0].region, Region::Hk1);
    }

    #[test]
    fn validation_fails_fast() {
        let mut config = RunConfig::default();
        config.surfaces.clear();
        assert!(matches!(
            config.validate(),
            Err(ForwardError::InvalidConfig(_))
        ));

        let mut config = RunConfig::default();
        config.mesh.cell_size[2] = 0.0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.survey.stride = 0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.survey.padding = 41;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.noise.relative = -0.1;
        assert!(config.validate().is_err());

        for half in [0.0, -1.0, f64::NAN] {
            let mut config = RunConfig::default();
            config.output.plot_half_width = Some(half);
            assert!(config.validate().is_err());
        }
        let mut config = RunConfig::default();
        config.output.plot_half_width = Some(2_500.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_paths_resolve_against_yaml_dir() {
        let resolved = resolve_path(Path::new("/data/run/config.yaml"), Path::new("topo.dat"));
        assert_eq!(resolved, PathBuf::from("/data/run/topo.dat"));
        let absolute = resolve_path(Path::new("/data/run/config.yaml"), Path::new("/x/topo.dat"));
        assert_eq!(absolute, PathBuf::from("/x/topo.dat"));
    }
}
