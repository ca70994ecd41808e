//! Nearest-neighbour interpolation over scattered samples.
//!
//! Samples are binned into a regular bucket lattice (`Grid2d<Vec<u32>>`) sized for
//! roughly one sample per bucket. A query searches square rings of buckets around
//! its own bucket and stops once no unvisited ring can hold a closer sample.

use glam::{DVec2, DVec3, IVec2, UVec2};

use crate::grid::Grid2d;
use crate::types::{MapInfo, Rect};

const MAX_BUCKETS_PER_AXIS: f64 = 2048.0;

#[derive(Debug, Clone)]
pub struct NearestInterpolator {
    points: Vec<DVec3>,
    buckets: Grid2d<Vec<u32>>,
}

impl NearestInterpolator {
    /// Build the index. `points` must not be empty; [`Topography`](super::Topography)
    /// guarantees this.
    pub fn new(points: &[DVec3]) -> Self {
        let mut bounds = Rect::empty();
        for p in points {
            bounds.expand_to_include(p.truncate());
        }
        if bounds.is_empty() {
            bounds = Rect {
                min: DVec2::ZERO,
                max: DVec2::ZERO,
            };
        }

        let size = bounds.size();
        let extent = size.max_element();
        let resolution = if extent > 0.0 {
            let floor = extent * 1e-3;
            let area = size.x.max(floor) * size.y.max(floor);
            (area / points.len().max(1) as f64)
                .sqrt()
                .max(extent / MAX_BUCKETS_PER_AXIS)
        } else {
            1.0
        };
        let info = MapInfo {
            width: (size.x / resolution).floor() as u32 + 1,
            height: (size.y / resolution).floor() as u32 + 1,
            resolution,
            origin: bounds.min,
        };

        let mut buckets = Grid2d::filled_with(info, Vec::new);
        for (i, p) in points.iter().enumerate() {
            let cell = buckets.clamped_cell(p.truncate());
            if let Some(bucket) = buckets.get_mut(cell) {
                bucket.push(i as u32);
            }
        }

        Self {
            points: points.to_vec(),
            buckets,
        }
    }

    /// Index of the sample closest to `query` in plan view. Ties go to the lowest index.
    pub fn nearest(&self, query: DVec2) -> Option<usize> {
        let center = self.buckets.clamped_cell(query).as_ivec2();
        let width = self.buckets.width() as i32;
        let height = self.buckets.height() as i32;
        let resolution = self.buckets.info().resolution;
        let max_ring = width.max(height);

        let mut best: Option<(f64, usize)> = None;
        for ring in 0..=max_ring {
            for cell in ring_cells(center, ring) {
                if cell.x < 0 || cell.y < 0 || cell.x >= width || cell.y >= height {
                    continue;
                }
                let Some(bucket) = self.buckets.get(cell.as_uvec2()) else {
                    continue;
                };
                for &i in bucket {
                    let i = i as usize;
                    let d2 = (self.points[i].truncate() - query).length_squared();
                    let closer = match best {
                        None => true,
                        Some((best_d2, best_i)) => d2 < best_d2 || (d2 == best_d2 && i < best_i),
                    };
                    if closer {
                        best = Some((d2, i));
                    }
                }
            }
            // Buckets beyond this ring are at least `ring` buckets away.
            if let Some((d2, _)) = best {
                let reach = ring as f64 * resolution;
                if d2 <= reach * reach {
                    break;
                }
            }
        }
        best.map(|(_, i)| i)
    }

    /// Elevation of the nearest sample.
    pub fn interpolate(&self, query: DVec2) -> f64 {
        self.nearest(query)
            .map(|i| self.points[i].z)
            .unwrap_or(f64::NAN)
    }

    pub fn bucket_shape(&self) -> UVec2 {
        UVec2::new(self.buckets.width(), self.buckets.height())
    }
}

fn ring_cells(center: IVec2, ring: i32) -> Vec<IVec2> {
    if ring == 0 {
        return vec![center];
    }
    let mut cells = Vec::with_capacity(8 * ring as usize);
    for dx in -ring..=ring {
        cells.push(center + IVec2::new(dx, -ring));
        cells.push(center + IVec2::new(dx, ring));
    }
    for dy in (-ring + 1)..ring {
        cells.push(center + IVec2::new(-ring, dy));
        cells.push(center + IVec2::new(ring, dy));
    }
    cells
}
