//! Suppression of known misclassification artifacts.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geology::Region;
use crate::grid::Axis;
use crate::types::ForwardError;

/// Resets cells of `region` whose centre lies below `below` or above `above`
/// along `axis` back to unclassified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupRule {
    pub region: Region,
    pub axis: Axis,
    #[serde(default)]
    pub below: Option<f64>,
    #[serde(default)]
    pub above: Option<f64>,
}

impl CleanupRule {
    pub fn validate(&self) -> Result<(), ForwardError> {
        if self.below.is_none() && self.above.is_none() {
            return Err(ForwardError::InvalidConfig(format!(
                "cleanup rule for {:?} needs `below` or `above`",
                self.region
            )));
        }
        Ok(())
    }

    pub fn matches(&self, label: Option<Region>, center: DVec3) -> bool {
        if label != Some(self.region) {
            return false;
        }
        let coord = center[self.axis.index()];
        self.below.is_some_and(|b| coord < b) || self.above.is_some_and(|a| coord > a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geology::RegionModel;
    use crate::grid::TensorMesh;

    fn rule() -> CleanupRule {
        CleanupRule {
            region: Region::Pk1,
            axis: Axis::Y,
            below: Some(2.0),
            above: None,
        }
    }

    #[test]
    fn predicate_needs_region_and_coordinate() {
        let rule = rule();
        assert!(rule.matches(Some(Region::Pk1), DVec3::new(9.0, 1.5, 9.0)));
        assert!(!rule.matches(Some(Region::Pk1), DVec3::new(0.0, 2.5, 0.0)));
        assert!(!rule.matches(Some(Region::Pk2), DVec3::new(0.0, 1.5, 0.0)));
        assert!(!rule.matches(None, DVec3::new(0.0, 1.5, 0.0)));
    }

    #[test]
    fn rule_without_bounds_is_rejected() {
        let mut rule = rule();
        rule.below = None;
        assert!(rule.validate().is_err());
        rule.above = Some(1.0);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn cleanup_leaves_complement_untouched() {
        let mesh = TensorMesh::new(vec![1.0; 3], vec![1.0; 4], vec![1.0; 2], DVec3::ZERO).unwrap();
        let labels = (0..mesh.n_cells())
            .map(|i| match i % 3 {
                0 => Some(Region::Pk1),
                1 => Some(Region::Hk1),
                _ => None,
            })
            .collect();
        let before = RegionModel::from_labels(labels);
        let mut after = before.clone();
        let rule = rule();
        let reset = after.apply_cleanup(&mesh, &rule);
        assert!(reset > 0);

        for index in 0..mesh.n_cells() {
            let old = before.labels()[index];
            let new = after.labels()[index];
            if rule.matches(old, mesh.cell_center(index)) {
                assert_eq!(new, None);
            } else {
                assert_eq!(new, old, "cell {index} changed outside the rule");
            }
        }
    }
}
