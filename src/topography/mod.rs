//! Topography samples, nearest-neighbour interpolation and the active-cell mask.

pub mod active;
pub mod nearest;

use glam::DVec3;

use crate::types::ForwardError;

pub use active::ActiveCells;
pub use nearest::NearestInterpolator;

/// Scattered topography samples (x, y, elevation).
#[derive(Debug, Clone, PartialEq)]
pub struct Topography {
    points: Vec<DVec3>,
}

impl Topography {
    pub fn new(points: Vec<DVec3>) -> Result<Self, ForwardError> {
        if points.is_empty() {
            return Err(ForwardError::EmptyInput(
                "topography has no samples".to_string(),
            ));
        }
        Ok(Self { points })
    }

    /// Flat surface sampled at the corners of a square of half-width `half_width` about `center`.
    pub fn flat(center: DVec3, half_width: f64) -> Self {
        let points = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
            .into_iter()
            .map(|(sx, sy)| center + DVec3::new(sx * half_width, sy * half_width, 0.0))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn interpolator(&self) -> NearestInterpolator {
        NearestInterpolator::new(&self.points)
    }
}
