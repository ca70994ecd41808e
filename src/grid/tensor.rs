//! Padded rectilinear (tensor-product) mesh.
//!
//! Cells are ordered with x fastest, then y, then z from the bottom up. Every
//! per-cell vector in the crate (regions, active flags, density) follows this order.

use std::ops::Range;

use glam::{DVec3, UVec3};
use serde::{Deserialize, Serialize};

use crate::config::MeshConfig;
use crate::types::{Aabb, ForwardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which ends of an axis carry expanding padding cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    Both,
    Below,
}

/// Cell widths along one axis: `padding_cells` cells growing geometrically by
/// `factor` away from a core of `core_cells` cells of width `cell_size`.
pub fn padded_widths(
    cell_size: f64,
    core_cells: usize,
    padding_cells: usize,
    factor: f64,
    padding: Padding,
) -> Result<Vec<f64>, ForwardError> {
    if cell_size <= 0.0 || !cell_size.is_finite() {
        return Err(ForwardError::InvalidConfig(format!(
            "cell size must be positive, got {cell_size}"
        )));
    }
    if core_cells == 0 {
        return Err(ForwardError::InvalidConfig(
            "core cell count must be at least 1".to_string(),
        ));
    }
    if factor < 1.0 || !factor.is_finite() {
        return Err(ForwardError::InvalidConfig(format!(
            "padding growth factor must be >= 1, got {factor}"
        )));
    }

    let pad: Vec<f64> = (1..=padding_cells)
        .map(|n| cell_size * factor.powi(n as i32))
        .collect();

    let mut widths = Vec::with_capacity(core_cells + 2 * padding_cells);
    widths.extend(pad.iter().rev());
    widths.extend(std::iter::repeat_n(cell_size, core_cells));
    if padding == Padding::Both {
        widths.extend(pad.iter());
    }
    Ok(widths)
}

#[derive(Debug, Clone)]
pub struct TensorMesh {
    widths: [Vec<f64>; 3],
    nodes: [Vec<f64>; 3],
    centers: [Vec<f64>; 3],
    origin: DVec3,
}

impl TensorMesh {
    pub fn new(
        hx: Vec<f64>,
        hy: Vec<f64>,
        hz: Vec<f64>,
        origin: DVec3,
    ) -> Result<Self, ForwardError> {
        let widths = [hx, hy, hz];
        for (axis, h) in widths.iter().enumerate() {
            if h.is_empty() {
                return Err(ForwardError::InvalidConfig(format!(
                    "mesh axis {axis} has no cells"
                )));
            }
            if let Some(bad) = h.iter().find(|w| **w <= 0.0 || !w.is_finite()) {
                return Err(ForwardError::InvalidConfig(format!(
                    "mesh axis {axis} has non-positive width {bad}"
                )));
            }
        }

        let origin_arr = origin.to_array();
        let nodes: [Vec<f64>; 3] = std::array::from_fn(|axis| {
            let mut acc = origin_arr[axis];
            let mut nodes = Vec::with_capacity(widths[axis].len() + 1);
            nodes.push(acc);
            for w in &widths[axis] {
                acc += w;
                nodes.push(acc);
            }
            nodes
        });
        let centers: [Vec<f64>; 3] = std::array::from_fn(|axis| {
            nodes[axis].windows(2).map(|n| 0.5 * (n[0] + n[1])).collect()
        });

        Ok(Self {
            widths,
            nodes,
            centers,
            origin,
        })
    }

    /// Build the padded mesh described by `config`: padding on both horizontal ends and
    /// below the core, x and y centred on the anchor, top of the mesh at the anchor elevation.
    pub fn padded(config: &MeshConfig) -> Result<Self, ForwardError> {
        let sides = [Padding::Both, Padding::Both, Padding::Below];
        let mut widths: [Vec<f64>; 3] = Default::default();
        for axis in 0..3 {
            widths[axis] = padded_widths(
                config.cell_size[axis],
                config.core_cells[axis],
                config.padding_cells,
                config.padding_factor[axis],
                sides[axis],
            )?;
        }
        let extent = DVec3::new(
            widths[0].iter().sum(),
            widths[1].iter().sum(),
            widths[2].iter().sum(),
        );
        let anchor = DVec3::from_array(config.anchor);
        let origin = anchor - DVec3::new(0.5 * extent.x, 0.5 * extent.y, extent.z);
        let [hx, hy, hz] = widths;
        Self::new(hx, hy, hz, origin)
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn shape(&self) -> [usize; 3] {
        [
            self.widths[0].len(),
            self.widths[1].len(),
            self.widths[2].len(),
        ]
    }

    pub fn n_cells(&self) -> usize {
        self.widths.iter().map(Vec::len).product()
    }

    pub fn widths(&self, axis: Axis) -> &[f64] {
        &self.widths[axis.index()]
    }

    pub fn nodes(&self, axis: Axis) -> &[f64] {
        &self.nodes[axis.index()]
    }

    pub fn centers(&self, axis: Axis) -> &[f64] {
        &self.centers[axis.index()]
    }

    /// Elevation of the top face of the mesh.
    pub fn top(&self) -> f64 {
        self.nodes[2][self.widths[2].len()]
    }

    #[inline]
    pub fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx, ny, _] = self.shape();
        i + nx * (j + ny * k)
    }

    #[inline]
    pub fn cell_ijk(&self, index: usize) -> UVec3 {
        let [nx, ny, _] = self.shape();
        UVec3::new(
            (index % nx) as u32,
            ((index / nx) % ny) as u32,
            (index / (nx * ny)) as u32,
        )
    }

    pub fn cell_center(&self, index: usize) -> DVec3 {
        let ijk = self.cell_ijk(index);
        DVec3::new(
            self.centers[0][ijk.x as usize],
            self.centers[1][ijk.y as usize],
            self.centers[2][ijk.z as usize],
        )
    }

    pub fn cell_bounds(&self, index: usize) -> Aabb {
        let ijk = self.cell_ijk(index);
        let (i, j, k) = (ijk.x as usize, ijk.y as usize, ijk.z as usize);
        Aabb::new(
            DVec3::new(self.nodes[0][i], self.nodes[1][j], self.nodes[2][k]),
            DVec3::new(
                self.nodes[0][i + 1],
                self.nodes[1][j + 1],
                self.nodes[2][k + 1],
            ),
        )
    }

    /// Cells along `axis` whose extent intersects `[lo, hi]`.
    pub fn cells_overlapping(&self, axis: Axis, lo: f64, hi: f64) -> Range<usize> {
        let nodes = &self.nodes[axis.index()];
        let n = nodes.len() - 1;
        let start = nodes[1..].partition_point(|&x| x < lo);
        let end = nodes[..n].partition_point(|&x| x <= hi);
        start..end.max(start)
    }

    /// Cells along `axis` whose centre lies within `[lo, hi]`.
    pub fn centers_within(&self, axis: Axis, lo: f64, hi: f64) -> Range<usize> {
        let centers = &self.centers[axis.index()];
        let start = centers.partition_point(|&x| x < lo);
        let end = centers.partition_point(|&x| x <= hi);
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn padding_grows_geometrically_away_from_core() {
        let h = padded_widths(10.0, 3, 2, 1.5, Padding::Both).unwrap();
        assert_eq!(h, vec![22.5, 15.0, 10.0, 10.0, 10.0, 15.0, 22.5]);

        let below = padded_widths(10.0, 2, 2, 2.0, Padding::Below).unwrap();
        assert_eq!(below, vec![40.0, 20.0, 10.0, 10.0]);
    }

    #[test]
    fn invalid_sizes_fail_fast() {
        assert!(padded_widths(0.0, 3, 2, 1.2, Padding::Both).is_err());
        assert!(padded_widths(-1.0, 3, 2, 1.2, Padding::Both).is_err());
        assert!(padded_widths(1.0, 0, 2, 1.2, Padding::Both).is_err());
        assert!(padded_widths(1.0, 3, 2, 0.5, Padding::Both).is_err());
        assert!(TensorMesh::new(vec![], vec![1.0], vec![1.0], DVec3::ZERO).is_err());
        assert!(TensorMesh::new(vec![1.0, 0.0], vec![1.0], vec![1.0], DVec3::ZERO).is_err());
    }

    #[test]
    fn padded_mesh_is_centred_on_anchor_with_top_at_anchor() {
        let config = MeshConfig {
            cell_size: [10.0, 10.0, 5.0],
            core_cells: [5, 3, 4],
            padding_cells: 2,
            padding_factor: [1.25, 1.25, 1.25],
            anchor: [1000.0, 2000.0, 450.0],
        };
        let mesh = TensorMesh::padded(&config).unwrap();
        assert_eq!(mesh.shape(), [9, 7, 6]);
        assert_eq!(mesh.n_cells(), 9 * 7 * 6);
        assert_relative_eq!(mesh.top(), 450.0, epsilon = 1e-9);
        // Odd core count: the middle core cell is centred on the anchor.
        assert_relative_eq!(mesh.centers(Axis::X)[4], 1000.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.centers(Axis::Y)[3], 2000.0, epsilon = 1e-9);
        // Top layer is a core layer.
        assert_relative_eq!(*mesh.widths(Axis::Z).last().unwrap(), 5.0);
    }

    #[test]
    fn index_round_trip_and_cell_geometry() {
        let mesh = TensorMesh::new(
            vec![1.0, 2.0, 3.0],
            vec![1.0, 1.0],
            vec![4.0, 4.0],
            DVec3::new(10.0, 20.0, -8.0),
        )
        .unwrap();
        let idx = mesh.cell_index(2, 1, 1);
        assert_eq!(idx, 2 + 3 * (1 + 2 * 1));
        assert_eq!(mesh.cell_ijk(idx), UVec3::new(2, 1, 1));

        let b = mesh.cell_bounds(idx);
        assert_eq!(b.min, DVec3::new(13.0, 21.0, -4.0));
        assert_eq!(b.max, DVec3::new(16.0, 22.0, 0.0));
        assert_eq!(mesh.cell_center(idx), DVec3::new(14.5, 21.5, -2.0));
    }

    #[test]
    fn range_queries() {
        let mesh = TensorMesh::new(
            vec![1.0; 5],
            vec![1.0],
            vec![1.0],
            DVec3::ZERO,
        )
        .unwrap();
        assert_eq!(mesh.cells_overlapping(Axis::X, 1.5, 2.5), 1..3);
        assert_eq!(mesh.cells_overlapping(Axis::X, 2.0, 2.0), 1..3);
        assert_eq!(mesh.cells_overlapping(Axis::X, 7.0, 9.0), 5..5);
        assert_eq!(mesh.centers_within(Axis::X, 1.0, 3.5), 1..4);
        assert_eq!(mesh.centers_within(Axis::X, -3.0, -1.0), 0..0);
    }
}
