//! Cell selection against a triangulated surface.
//!
//! Interior cells are found column by column: triangles are binned by the cell
//! columns their plan-view bounds cover, a vertical ray through each column
//! centre collects crossings, and cell centres between paired crossings are
//! inside. Boundary cells are those any triangle overlaps.

use glam::DVec2;

use crate::grid::{Axis, TensorMesh};
use crate::surface::{TriangulatedSurface, VerticalRay, inside_intervals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Cells the surface passes through.
    pub boundaries: bool,
    /// Cells whose centre the surface encloses.
    pub internal: bool,
}

/// Per-cell flags (mesh order) of the cells `selection` picks out of `surface`.
pub fn select_cells(
    mesh: &TensorMesh,
    surface: &TriangulatedSurface,
    selection: Selection,
) -> Vec<bool> {
    let mut selected = vec![false; mesh.n_cells()];
    if selection.internal {
        mark_interior(mesh, surface, &mut selected);
    }
    if selection.boundaries {
        mark_boundary(mesh, surface, &mut selected);
    }
    selected
}

fn mark_interior(mesh: &TensorMesh, surface: &TriangulatedSurface, selected: &mut [bool]) {
    let [nx, ny, _] = mesh.shape();
    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); nx * ny];
    for (t, tri) in surface.triangles().enumerate() {
        let b = tri.bounds();
        for j in mesh.centers_within(Axis::Y, b.min.y, b.max.y) {
            for i in mesh.centers_within(Axis::X, b.min.x, b.max.x) {
                columns[i + nx * j].push(t);
            }
        }
    }

    let cx = mesh.centers(Axis::X);
    let cy = mesh.centers(Axis::Y);
    for j in 0..ny {
        for i in 0..nx {
            let candidates = &columns[i + nx * j];
            if candidates.is_empty() {
                continue;
            }
            let ray = VerticalRay::new(DVec2::new(cx[i], cy[j]));
            let crossings = ray.crossings(surface, candidates.iter().copied());
            for (bottom, top) in inside_intervals(&crossings) {
                for k in mesh.centers_within(Axis::Z, bottom, top) {
                    selected[mesh.cell_index(i, j, k)] = true;
                }
            }
        }
    }
}

fn mark_boundary(mesh: &TensorMesh, surface: &TriangulatedSurface, selected: &mut [bool]) {
    for tri in surface.triangles() {
        let b = tri.bounds();
        let is = mesh.cells_overlapping(Axis::X, b.min.x, b.max.x);
        let js = mesh.cells_overlapping(Axis::Y, b.min.y, b.max.y);
        let ks = mesh.cells_overlapping(Axis::Z, b.min.z, b.max.z);
        for k in ks {
            for j in js.clone() {
                for i in is.clone() {
                    let index = mesh.cell_index(i, j, k);
                    if !selected[index] && tri.overlaps_box(&mesh.cell_bounds(index)) {
                        selected[index] = true;
                    }
                }
            }
        }
    }
}
