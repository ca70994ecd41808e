use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use glam::DVec3;

use gravity_forward::config::{MeshConfig, SurveyConfig};
use gravity_forward::geology::GeologicalUnit;
use gravity_forward::surface::{Selection, TriangulatedSurface};
use gravity_forward::types::{Aabb, GRAVITATIONAL_CONSTANT};
use gravity_forward::{
    DensityTable, Inputs, Region, RunConfig, Topography, forward, load_config, load_inputs, run,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("grav-forward-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Nine 10 m cubes in one layer under flat ground, all labelled by one block.
fn toy() -> (RunConfig, Inputs) {
    let config = RunConfig {
        mesh: MeshConfig {
            cell_size: [10.0, 10.0, 10.0],
            core_cells: [3, 3, 1],
            padding_cells: 0,
            padding_factor: [1.0, 1.0, 1.0],
            anchor: [0.0, 0.0, 0.0],
        },
        cleanup: Vec::new(),
        density: DensityTable {
            xvk: -1.0,
            ..DensityTable::uniform(0.0)
        },
        survey: SurveyConfig {
            padding: 1,
            stride: 1,
            standoff: 1.0,
        },
        ..RunConfig::default()
    };
    let block = TriangulatedSurface::from_box(
        "block",
        &Aabb::new(DVec3::new(-16.0, -16.0, -11.0), DVec3::new(16.0, 16.0, 1.0)),
    );
    let inputs = Inputs {
        topography: Topography::flat(DVec3::ZERO, 50.0),
        surfaces: vec![GeologicalUnit {
            surface: block,
            selection: Selection {
                boundaries: true,
                internal: true,
            },
            region: Region::Xvk,
        }],
    };
    (config, inputs)
}

#[test]
fn toy_block_gives_negative_anomaly() {
    let (config, inputs) = toy();
    let model = forward(&config, &inputs).expect("forward run");

    assert_eq!(model.active.n_active(), 9);
    assert_eq!(model.regions.count(Region::Xvk), 9);
    assert_eq!(model.density, vec![-1.0; 9]);

    assert_eq!(model.receivers.len(), 1);
    assert_eq!(model.receivers.locations()[0], DVec3::new(0.0, 0.0, 1.0));

    let gz = model.observations.values[0];
    assert!(gz < 0.0);
    // Bounded by an infinite Bouguer slab of the same thickness.
    let slab = 2.0 * std::f64::consts::PI * GRAVITATIONAL_CONSTANT * 1.0e3 * 10.0 * 1.0e5;
    assert!(gz.abs() < slab);
    assert!(gz.abs() > 0.1 * slab);
    assert_relative_eq!(gz, -0.282_317, max_relative = 1e-4);
}

#[test]
fn noise_is_reproducible_for_a_fixed_seed() {
    let (mut config, inputs) = toy();
    let clean = forward(&config, &inputs).unwrap().observations;

    config.noise.floor = 0.01;
    let a = forward(&config, &inputs).unwrap().observations;
    let b = forward(&config, &inputs).unwrap().observations;

    assert_eq!(a.values[0].to_bits(), b.values[0].to_bits());
    assert_ne!(a.values[0], clean.values[0]);
    assert!((a.values[0] - clean.values[0]).abs() < 0.06);
    assert_eq!(a.uncertainties, vec![0.01]);
}

#[test]
fn fixture_run_writes_every_artifact() {
    let mut config = load_config(fixture("run.yaml")).expect("config should load");
    config.output.directory = scratch_dir("fixture");

    let model = run(&config).expect("run should succeed");

    assert_eq!(model.mesh.shape(), [10, 10, 6]);
    assert_eq!(model.active.n_active(), 600);
    assert_eq!(model.regions.count(Region::Pk1), 48);
    assert_eq!(model.receivers.len(), 36);
    assert_eq!(model.sensitivity.rows(), 36);
    assert_eq!(model.sensitivity.cols(), 600);
    assert!(model.observations.values.iter().all(|&v| v < 0.0));

    // Centre receivers sit over the block and see the strongest anomaly.
    let (ne, _) = model.receivers.shape();
    let values = &model.observations.values;
    let centre = values[2 + ne * 2];
    assert_relative_eq!(centre, values[3 + ne * 3], max_relative = 1e-9);
    assert_relative_eq!(centre, values[2 + ne * 3], max_relative = 1e-9);
    assert!(centre < values[0]);

    let out = &config.output;
    let obs = std::fs::read_to_string(out.path_of(&out.observations)).unwrap();
    assert_eq!(obs.lines().next(), Some("36"));
    assert_eq!(obs.lines().count(), 37);

    let npy = std::fs::read(out.path_of(&out.sensitivity)).unwrap();
    let header_len = 10 + u16::from_le_bytes([npy[8], npy[9]]) as usize;
    assert_eq!(header_len % 64, 0);
    assert!(String::from_utf8_lossy(&npy[..header_len]).contains("'shape': (36, 600)"));
    assert_eq!(npy.len(), header_len + 36 * 600 * 8);

    let msh = std::fs::read_to_string(out.path_of(&out.mesh)).unwrap();
    assert_eq!(msh.lines().next(), Some("10 10 6"));

    let den = std::fs::read_to_string(out.path_of(&out.model)).unwrap();
    let den: Vec<f64> = den.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(den.len(), 600);
    assert_eq!(den.iter().filter(|&&v| v == -0.8).count(), 48);

    let codes = std::fs::read_to_string(out.path_of(&out.regions)).unwrap();
    assert_eq!(codes.lines().count(), 600);

    let png = image::open(out.path_of(&out.plot)).unwrap();
    assert_eq!((png.width(), png.height()), (800, 640));

    let _ = std::fs::remove_dir_all(&out.directory);
}

#[test]
fn cleanup_rule_clears_the_southern_half_of_the_block() {
    let mut config = load_config(fixture("run_cleanup.yaml")).expect("config should load");
    config.output.directory = scratch_dir("cleanup");
    assert_eq!(config.cleanup.len(), 1);

    let model = run(&config).expect("run should succeed");
    assert_eq!(model.regions.count(Region::Pk1), 24);

    let out = &config.output;
    let read = |file: &Path| -> Vec<f64> {
        let text = std::fs::read_to_string(out.path_of(file)).unwrap();
        text.lines().map(|l| l.parse().unwrap()).collect()
    };
    let den = read(&out.model);
    assert_eq!(den.len(), 600);
    assert_eq!(den.iter().filter(|&&v| v == -0.8).count(), 24);

    let codes = read(&out.regions);
    let pk1 = f64::from(Region::Pk1.code());
    assert_eq!(codes.iter().filter(|&&v| v == pk1).count(), 24);
    assert_eq!(
        codes.iter().filter(|&&v| v == config.no_data_value).count(),
        600 - 24
    );

    // Only the northern receivers still sit over dense rock.
    let (ne, _) = model.receivers.shape();
    let values = &model.observations.values;
    assert!(values[2 + ne * 3] < values[2 + ne * 2]);

    let _ = std::fs::remove_dir_all(&out.directory);
}

#[test]
fn non_positive_plot_window_is_rejected_up_front() {
    let mut config = load_config(fixture("run.yaml")).unwrap();
    config.output.plot_half_width = Some(-1.0);
    config.output.directory = scratch_dir("plot_window");

    assert!(run(&config).is_err());
    assert!(!config.output.directory.exists());
}

#[test]
fn missing_surface_fails_before_writing() {
    let mut config = load_config(fixture("run.yaml")).unwrap();
    config.surfaces[0].path = fixture("missing.ts");
    config.output.directory = scratch_dir("missing");

    assert!(load_inputs(&config).is_err());
    assert!(run(&config).is_err());
    assert!(!config.output.directory.exists());
}

#[test]
fn invalid_mesh_is_rejected_up_front() {
    let mut config = load_config(fixture("run.yaml")).unwrap();
    config.mesh.cell_size[2] = 0.0;
    config.output.directory = scratch_dir("invalid");

    assert!(run(&config).is_err());
    assert!(!config.output.directory.exists());
}
