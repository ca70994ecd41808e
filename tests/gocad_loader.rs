use std::path::Path;

use gravity_forward::types::ForwardError;
use gravity_forward::{load_gocad_tsurf, load_topography};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn loads_closed_block_surface() {
    let surface = load_gocad_tsurf(fixture("block.ts")).expect("surface should load");

    assert_eq!(surface.name(), "block");
    assert_eq!(surface.vertices().len(), 8);
    assert_eq!(surface.triangle_count(), 12);

    let bounds = surface.bounds();
    assert_eq!(bounds.min.to_array(), [-12.0, -12.0, -27.0]);
    assert_eq!(bounds.max.to_array(), [12.0, 12.0, -7.0]);

    // ATOM 9 aliases vertex 1.
    let t = surface.triangle(4);
    assert_eq!(t.a, surface.triangle(0).a);
}

#[test]
fn unknown_vertex_reports_line() {
    let err = load_gocad_tsurf(fixture("broken.ts")).unwrap_err();
    match err {
        ForwardError::Parse { line, message, .. } => {
            assert_eq!(line, 6);
            assert!(message.contains('4'), "{message}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_file_names_the_path() {
    let err = load_gocad_tsurf(fixture("nope.ts")).unwrap_err();
    assert!(matches!(err, ForwardError::Read { .. }));
    assert!(err.to_string().contains("nope.ts"));
}

#[test]
fn loads_topography_skipping_header() {
    let topo = load_topography(fixture("topo.dat")).expect("topography should load");
    assert_eq!(topo.points().len(), 9);
    assert!(topo.points().iter().all(|p| p.z == 0.0));
}
