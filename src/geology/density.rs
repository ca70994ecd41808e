//! Region -> density contrast lookup.

use serde::{Deserialize, Serialize};

use crate::geology::Region;

/// Density contrast (g/cc) per region, plus the background used for
/// unclassified cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityTable {
    pub till: f64,
    pub xvk: f64,
    pub pk1: f64,
    pub pk2: f64,
    pub pk3: f64,
    pub hk1: f64,
    pub vk: f64,
    pub background: f64,
}

impl Default for DensityTable {
    fn default() -> Self {
        Self {
            till: 0.0,
            xvk: 0.0,
            pk1: -0.8,
            pk2: 0.0,
            pk3: 0.0,
            hk1: -0.2,
            vk: -0.8,
            background: 0.0,
        }
    }
}

impl DensityTable {
    /// A table with every region at `background`.
    pub fn uniform(background: f64) -> Self {
        Self {
            till: background,
            xvk: background,
            pk1: background,
            pk2: background,
            pk3: background,
            hk1: background,
            vk: background,
            background,
        }
    }

    pub fn value(&self, label: Option<Region>) -> f64 {
        match label {
            Some(Region::Till) => self.till,
            Some(Region::Xvk) => self.xvk,
            Some(Region::Pk1) => self.pk1,
            Some(Region::Pk2) => self.pk2,
            Some(Region::Pk3) => self.pk3,
            Some(Region::Hk1) => self.hk1,
            Some(Region::Vk) => self.vk,
            None => self.background,
        }
    }

    /// Density of every cell in `labels`, in the same order.
    pub fn assign(&self, labels: &[Option<Region>]) -> Vec<f64> {
        labels.iter().map(|l| self.value(*l)).collect()
    }

    pub fn is_finite(&self) -> bool {
        Region::ALL
            .iter()
            .map(|r| self.value(Some(*r)))
            .chain(std::iter::once(self.background))
            .all(f64::is_finite)
    }
}
