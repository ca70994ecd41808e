//! Cells below the topographic surface.
//!
//! A cell is active when its top face lies at or below the topography
//! interpolated at each of the four top-face corner nodes. Every density and
//! data vector in the forward problem is defined over active cells only;
//! [`ActiveCells::expand`] maps such a reduced vector back onto the full mesh.

use glam::DVec2;
use tracing::info;

use crate::grid::{Axis, TensorMesh};
use crate::topography::NearestInterpolator;
use crate::types::ForwardError;

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCells {
    mask: Vec<bool>,
    indices: Vec<usize>,
}

impl ActiveCells {
    pub fn from_mask(mask: Vec<bool>) -> Self {
        let indices = mask
            .iter()
            .enumerate()
            .filter_map(|(i, active)| active.then_some(i))
            .collect();
        Self { mask, indices }
    }

    pub fn all(n_cells: usize) -> Self {
        Self::from_mask(vec![true; n_cells])
    }

    pub fn from_topography(mesh: &TensorMesh, topography: &NearestInterpolator) -> Self {
        let [nx, ny, nz] = mesh.shape();
        let node_x = mesh.nodes(Axis::X);
        let node_y = mesh.nodes(Axis::Y);
        let node_z = mesh.nodes(Axis::Z);

        let node_topo: Vec<f64> = (0..=ny)
            .flat_map(|j| (0..=nx).map(move |i| (i, j)))
            .map(|(i, j)| topography.interpolate(DVec2::new(node_x[i], node_y[j])))
            .collect();
        let at = |i: usize, j: usize| node_topo[i + (nx + 1) * j];

        let mut mask = vec![false; mesh.n_cells()];
        for j in 0..ny {
            for i in 0..nx {
                let ground = at(i, j)
                    .min(at(i + 1, j))
                    .min(at(i, j + 1))
                    .min(at(i + 1, j + 1));
                for k in 0..nz {
                    if node_z[k + 1] <= ground {
                        mask[mesh.cell_index(i, j, k)] = true;
                    }
                }
            }
        }

        let active = Self::from_mask(mask);
        info!(
            active = active.n_active(),
            air = active.n_cells() - active.n_active(),
            "active cells from topography"
        );
        active
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Full-mesh indices of the active cells, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn n_cells(&self) -> usize {
        self.mask.len()
    }

    pub fn n_active(&self) -> usize {
        self.indices.len()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Restrict a full-mesh vector to the active cells.
    pub fn reduce<T: Copy>(&self, full: &[T]) -> Result<Vec<T>, ForwardError> {
        ForwardError::check_len("full-mesh vector", self.n_cells(), full.len())?;
        Ok(self.indices.iter().map(|&i| full[i]).collect())
    }

    /// Inject an active-cell vector into the full mesh, filling air cells with `fill`.
    pub fn expand(&self, reduced: &[f64], fill: f64) -> Result<Vec<f64>, ForwardError> {
        ForwardError::check_len("active-cell vector", self.n_active(), reduced.len())?;
        let mut full = vec![fill; self.n_cells()];
        for (&i, &v) in self.indices.iter().zip(reduced) {
            full[i] = v;
        }
        Ok(full)
    }
}
