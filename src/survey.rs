//! Receiver lattice draped over the topography.

use glam::{DVec2, DVec3};
use tracing::info;

use crate::config::SurveyConfig;
use crate::grid::{Axis, TensorMesh};
use crate::topography::NearestInterpolator;
use crate::types::{ForwardError, Rect};

/// Observation points on a regular plan-view lattice, ordered with easting
/// fastest. `elevation[i]` belongs to `(eastings[i % ne], northings[i / ne])`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverSet {
    eastings: Vec<f64>,
    northings: Vec<f64>,
    locations: Vec<DVec3>,
}

impl ReceiverSet {
    pub fn from_lattice(
        eastings: Vec<f64>,
        northings: Vec<f64>,
        elevations: Vec<f64>,
    ) -> Result<Self, ForwardError> {
        if eastings.is_empty() || northings.is_empty() {
            return Err(ForwardError::EmptyInput(
                "receiver lattice has no points".to_string(),
            ));
        }
        ForwardError::check_len(
            "receiver elevations",
            eastings.len() * northings.len(),
            elevations.len(),
        )?;
        let ne = eastings.len();
        let locations = elevations
            .iter()
            .enumerate()
            .map(|(i, &z)| DVec3::new(eastings[i % ne], northings[i / ne], z))
            .collect();
        Ok(Self {
            eastings,
            northings,
            locations,
        })
    }

    /// Every `stride`-th cell centre inside the mesh, skipping `padding` cells on
    /// each horizontal side, raised `standoff` metres above the nearest topography sample.
    pub fn draped(
        mesh: &TensorMesh,
        survey: &SurveyConfig,
        topography: &NearestInterpolator,
    ) -> Result<Self, ForwardError> {
        if survey.stride == 0 {
            return Err(ForwardError::InvalidConfig(
                "survey stride must be at least 1".to_string(),
            ));
        }
        let pick = |axis: Axis| -> Vec<f64> {
            let centers = mesh.centers(axis);
            let end = centers.len().saturating_sub(survey.padding);
            centers
                .get(survey.padding..end)
                .unwrap_or_default()
                .iter()
                .step_by(survey.stride)
                .copied()
                .collect()
        };
        let eastings = pick(Axis::X);
        let northings = pick(Axis::Y);

        let elevations = northings
            .iter()
            .flat_map(|&y| eastings.iter().map(move |&x| DVec2::new(x, y)))
            .map(|p| topography.interpolate(p) + survey.standoff)
            .collect();

        let receivers = Self::from_lattice(eastings, northings, elevations)?;
        info!(
            receivers = receivers.len(),
            shape = ?receivers.shape(),
            "built receiver lattice"
        );
        Ok(receivers)
    }

    pub fn locations(&self) -> &[DVec3] {
        &self.locations
    }

    pub fn eastings(&self) -> &[f64] {
        &self.eastings
    }

    pub fn northings(&self) -> &[f64] {
        &self.northings
    }

    /// (eastings, northings) lattice dimensions.
    pub fn shape(&self) -> (usize, usize) {
        (self.eastings.len(), self.northings.len())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Plan-view bounding rectangle of the receivers.
    pub fn footprint(&self) -> Rect {
        let mut rect = Rect::empty();
        for p in &self.locations {
            rect.expand_to_include(p.truncate());
        }
        rect
    }
}
