//! Synthetic observations with optional seeded Gaussian noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

use crate::config::NoiseConfig;
use crate::forward::SensitivityMatrix;
use crate::types::ForwardError;

/// Observed data and their one-sigma uncertainties, one entry per receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    pub values: Vec<f64>,
    pub uncertainties: Vec<f64>,
}

impl Observations {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Forward-model `density` and perturb each datum by `sigma * N(0, 1)` with
/// `sigma = relative * |d| + floor`, drawing from a generator seeded with `noise.seed`.
pub fn synthetic_data(
    sensitivity: &SensitivityMatrix,
    density: &[f64],
    noise: &NoiseConfig,
) -> Result<Observations, ForwardError> {
    if noise.relative < 0.0 || noise.floor < 0.0 {
        return Err(ForwardError::InvalidConfig(
            "noise levels must be non-negative".to_string(),
        ));
    }
    let mut values = sensitivity.apply(density)?;
    let uncertainties: Vec<f64> = values
        .iter()
        .map(|d| noise.relative * d.abs() + noise.floor)
        .collect();

    if uncertainties.iter().any(|&s| s > 0.0) {
        let mut rng = StdRng::seed_from_u64(noise.seed);
        for (d, sigma) in values.iter_mut().zip(&uncertainties) {
            let n: f64 = rng.sample(StandardNormal);
            *d += sigma * n;
        }
        debug!(seed = noise.seed, "added gaussian noise");
    }

    Ok(Observations {
        values,
        uncertainties,
    })
}
