//! Per-cell geological region labels.
//!
//! Units are painted onto the mesh in the order given; a later unit overwrites
//! earlier labels on overlapping cells, which encodes the stacking order of the
//! geology. Cells no unit selects stay unclassified (`None`).

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geology::CleanupRule;
use crate::grid::TensorMesh;
use crate::surface::{Selection, TriangulatedSurface, select_cells};
use crate::types::ForwardError;

/// Geological regions of the TKC kimberlite model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Till,
    Xvk,
    Pk1,
    Pk2,
    Pk3,
    Hk1,
    Vk,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Till,
        Region::Xvk,
        Region::Pk1,
        Region::Pk2,
        Region::Pk3,
        Region::Hk1,
        Region::Vk,
    ];

    /// Integer code used in label files (0..=6).
    pub fn code(self) -> u8 {
        match self {
            Region::Till => 0,
            Region::Xvk => 1,
            Region::Pk1 => 2,
            Region::Pk2 => 3,
            Region::Pk3 => 4,
            Region::Hk1 => 5,
            Region::Vk => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Region> {
        Region::ALL.get(code as usize).copied()
    }
}

/// A closed surface and the region it stamps onto the cells it selects.
#[derive(Debug, Clone)]
pub struct GeologicalUnit {
    pub surface: TriangulatedSurface,
    pub selection: Selection,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionModel {
    labels: Vec<Option<Region>>,
}

impl RegionModel {
    pub fn unclassified(n_cells: usize) -> Self {
        Self {
            labels: vec![None; n_cells],
        }
    }

    pub fn from_labels(labels: Vec<Option<Region>>) -> Self {
        Self { labels }
    }

    /// Label the mesh from `units`, strictly in order (last write wins).
    pub fn classify(mesh: &TensorMesh, units: &[GeologicalUnit]) -> Result<Self, ForwardError> {
        if units.is_empty() {
            return Err(ForwardError::InvalidConfig(
                "at least one geological unit is required".to_string(),
            ));
        }

        let mut model = Self::unclassified(mesh.n_cells());
        for unit in units {
            let start = Instant::now();
            let selected = select_cells(mesh, &unit.surface, unit.selection);
            let painted = model.paint(&selected, unit.region)?;
            info!(
                surface = %unit.surface.name(),
                region = ?unit.region,
                cells = painted,
                elapsed_s = start.elapsed().as_secs_f64(),
                "indexed surface"
            );
        }
        Ok(model)
    }

    /// Assign `region` to every selected cell, returning how many were selected.
    pub fn paint(&mut self, selected: &[bool], region: Region) -> Result<usize, ForwardError> {
        ForwardError::check_len("cell selection", self.labels.len(), selected.len())?;
        let mut painted = 0;
        for (label, _) in self.labels.iter_mut().zip(selected).filter(|(_, s)| **s) {
            *label = Some(region);
            painted += 1;
        }
        Ok(painted)
    }

    /// Apply a cleanup rule in place, returning the number of cells reset.
    pub fn apply_cleanup(&mut self, mesh: &TensorMesh, rule: &CleanupRule) -> usize {
        let mut reset = 0;
        for (index, label) in self.labels.iter_mut().enumerate() {
            if rule.matches(*label, mesh.cell_center(index)) {
                *label = None;
                reset += 1;
            }
        }
        reset
    }

    pub fn labels(&self) -> &[Option<Region>] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn count(&self, region: Region) -> usize {
        self.labels.iter().filter(|l| **l == Some(region)).count()
    }

    /// Region codes as floats, `no_data` for unclassified cells.
    pub fn codes(&self, no_data: f64) -> Vec<f64> {
        self.labels
            .iter()
            .map(|l| l.map_or(no_data, |r| r.code() as f64))
            .collect()
    }
}
