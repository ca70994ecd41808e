//! Lattice metadata.

use glam::DVec2;

#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    pub width: u32,
    pub height: u32,
    pub resolution: f64,
    /// Origin of cell (0, 0) in world coordinates (metres).
    pub origin: DVec2,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            resolution: 1.0,
            origin: DVec2::ZERO,
        }
    }
}
