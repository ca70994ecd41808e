use glam::{DVec2, UVec2};

use crate::types::{ForwardError, MapInfo};

/// Regular 2D lattice of values, row-major with x fastest.
#[derive(Debug, Clone)]
pub struct Grid2d<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self, ForwardError> {
        let expected_len = (info.width as usize) * (info.height as usize);
        ForwardError::check_len("lattice data", expected_len, data.len())?;
        Ok(Self { info, data })
    }

    pub fn filled_with(info: MapInfo, mut fill: impl FnMut() -> T) -> Self {
        let len = (info.width as usize) * (info.height as usize);
        let data = (0..len).map(|_| fill()).collect();
        Self { info, data }
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn get(&self, pos: UVec2) -> Option<&T> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return None;
        }
        Some(&self.data[self.index(pos)])
    }

    pub fn get_mut(&mut self, pos: UVec2) -> Option<&mut T> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return None;
        }
        let idx = self.index(pos);
        Some(&mut self.data[idx])
    }

    fn index(&self, pos: UVec2) -> usize {
        (pos.y as usize) * (self.info.width as usize) + (pos.x as usize)
    }

    /// Continuous lattice coordinates of a world position (may lie outside the lattice).
    pub fn world_to_map(&self, pos: DVec2) -> DVec2 {
        (pos - self.info.origin) / self.info.resolution
    }

    pub fn map_to_world(&self, pos: DVec2) -> DVec2 {
        self.info.origin + pos * self.info.resolution
    }

    /// Lattice cell containing `pos`, clamped to the lattice edges.
    pub fn clamped_cell(&self, pos: DVec2) -> UVec2 {
        let m = self.world_to_map(pos).floor();
        let max_x = self.info.width.saturating_sub(1) as f64;
        let max_y = self.info.height.saturating_sub(1) as f64;
        UVec2::new(m.x.clamp(0.0, max_x) as u32, m.y.clamp(0.0, max_y) as u32)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}
