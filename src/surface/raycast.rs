use glam::DVec2;

use crate::surface::TriangulatedSurface;
use crate::types::{Contact, VerticalHit};

/// Crossings of two triangles closer than this (metres) are one crossing: a ray
/// through a shared edge or vertex reports the same elevation from every
/// triangle that owns it.
const MERGE_TOL: f64 = 1e-6;

/// Vertical line through a horizontal position, cast through a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalRay {
    pub position: DVec2,
}

impl VerticalRay {
    pub fn new(position: DVec2) -> Self {
        Self { position }
    }

    /// Sorted elevations where the ray passes through the given triangles.
    ///
    /// Hits at the same elevation count once when the ray crosses the sheet there and not
    /// at all when it only grazes a fold, such as the rim of a closed surface seen from
    /// above.
    pub fn crossings(
        &self,
        surface: &TriangulatedSurface,
        candidates: impl IntoIterator<Item = usize>,
    ) -> Vec<f64> {
        let mut hits: Vec<VerticalHit> = candidates
            .into_iter()
            .filter_map(|t| surface.triangle(t).vertical_hit(self.position))
            .collect();
        hits.sort_by(|a, b| a.z.total_cmp(&b.z));
        hits.chunk_by(|a, b| b.z - a.z <= MERGE_TOL)
            .filter(|group| passes_through(group))
            .map(|group| group[0].z)
            .collect()
    }
}

/// Whether coincident hits are a crossing of the surface rather than a touch.
fn passes_through(group: &[VerticalHit]) -> bool {
    match group {
        [_] => true,
        [first, second] => match (first.contact, second.contact) {
            (
                Contact::Edge { from, to, apex: p },
                Contact::Edge { from: f, to: t, apex: q },
            ) if (from == f && to == t) || (from == t && to == f) => {
                let edge = to - from;
                edge.perp_dot(p - from) * edge.perp_dot(q - from) < 0.0
            }
            _ => first.upward == second.upward,
        },
        [first, rest @ ..] => rest.iter().all(|hit| hit.upward == first.upward),
        [] => false,
    }
}

/// Pair sorted crossings into enclosed `[bottom, top]` intervals by parity. An
/// unpaired last crossing (open surface) encloses nothing.
pub fn inside_intervals(crossings: &[f64]) -> Vec<(f64, f64)> {
    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}
