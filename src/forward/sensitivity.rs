//! Dense sensitivity matrix G (receivers x active cells), row-major.

use std::time::Instant;

use tracing::info;

use crate::forward::ForwardKernel;
use crate::grid::TensorMesh;
use crate::survey::ReceiverSet;
use crate::topography::ActiveCells;
use crate::types::{Aabb, ForwardError};

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SensitivityMatrix {
    pub fn build<K: ForwardKernel>(
        mesh: &TensorMesh,
        active: &ActiveCells,
        receivers: &ReceiverSet,
        kernel: &K,
    ) -> Result<Self, ForwardError> {
        ForwardError::check_len("active mask", mesh.n_cells(), active.n_cells())?;
        if active.n_active() == 0 {
            return Err(ForwardError::EmptyInput(
                "no active cells below the topography".to_string(),
            ));
        }
        if receivers.is_empty() {
            return Err(ForwardError::EmptyInput("no receivers".to_string()));
        }

        let rows = receivers.len();
        let cols = active.n_active();
        let len = rows
            .checked_mul(cols)
            .ok_or(ForwardError::Allocation { rows, cols })?;
        let mut data: Vec<f64> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ForwardError::Allocation { rows, cols })?;
        data.resize(len, 0.0);

        let cells: Vec<Aabb> = active
            .indices()
            .iter()
            .map(|&i| mesh.cell_bounds(i))
            .collect();

        let start = Instant::now();
        fill_rows(&mut data, cols, receivers, &cells, kernel);
        info!(
            rows,
            cols,
            megabytes = (len * std::mem::size_of::<f64>()) as f64 / 1.0e6,
            elapsed_s = start.elapsed().as_secs_f64(),
            "built sensitivity matrix"
        );

        Ok(Self { rows, cols, data })
    }

    pub fn from_rows(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ForwardError> {
        ForwardError::check_len("sensitivity entries", rows * cols, data.len())?;
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Predicted data `G m` for an active-cell model.
    pub fn apply(&self, model: &[f64]) -> Result<Vec<f64>, ForwardError> {
        ForwardError::check_len("density model", self.cols, model.len())?;
        Ok((0..self.rows)
            .map(|r| self.row(r).iter().zip(model).map(|(g, m)| g * m).sum())
            .collect())
    }
}

#[cfg(feature = "rayon")]
fn fill_rows<K: ForwardKernel>(
    data: &mut [f64],
    cols: usize,
    receivers: &ReceiverSet,
    cells: &[Aabb],
    kernel: &K,
) {
    use rayon::prelude::*;

    data.par_chunks_mut(cols)
        .zip(receivers.locations().par_iter())
        .for_each(|(row, &receiver)| {
            for (g, cell) in row.iter_mut().zip(cells) {
                *g = kernel.response(receiver, cell);
            }
        });
}

#[cfg(not(feature = "rayon"))]
fn fill_rows<K: ForwardKernel>(
    data: &mut [f64],
    cols: usize,
    receivers: &ReceiverSet,
    cells: &[Aabb],
    kernel: &K,
) {
    for (row, &receiver) in data.chunks_mut(cols).zip(receivers.locations()) {
        for (g, cell) in row.iter_mut().zip(cells) {
            *g = kernel.response(receiver, cell);
        }
    }
}
