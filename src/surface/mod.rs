//! Triangulated geological surfaces and their rasterisation onto the mesh.

pub mod index;
pub mod raycast;

use glam::DVec3;

use crate::types::{Aabb, ForwardError, Triangle};

pub use index::{Selection, select_cells};
pub use raycast::{VerticalRay, inside_intervals};

#[derive(Debug, Clone, PartialEq)]
pub struct TriangulatedSurface {
    name: String,
    vertices: Vec<DVec3>,
    triangles: Vec<[usize; 3]>,
}

impl TriangulatedSurface {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<DVec3>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self, ForwardError> {
        let name = name.into();
        if triangles.is_empty() {
            return Err(ForwardError::EmptyInput(format!(
                "surface `{name}` has no triangles"
            )));
        }
        if let Some(tri) = triangles
            .iter()
            .find(|t| t.iter().any(|&v| v >= vertices.len()))
        {
            return Err(ForwardError::InvalidConfig(format!(
                "surface `{name}` references vertex {:?} but has {} vertices",
                tri,
                vertices.len()
            )));
        }
        Ok(Self {
            name,
            vertices,
            triangles,
        })
    }

    /// Closed surface of an axis-aligned box (12 triangles).
    pub fn from_box(name: impl Into<String>, aabb: &Aabb) -> Self {
        let (lo, hi) = (aabb.min, aabb.max);
        let vertices = (0..8)
            .map(|c| {
                DVec3::new(
                    if c & 1 == 0 { lo.x } else { hi.x },
                    if c & 2 == 0 { lo.y } else { hi.y },
                    if c & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .collect();
        let triangles = vec![
            [0, 1, 3],
            [0, 3, 2],
            [4, 5, 7],
            [4, 7, 6],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 2, 6],
            [0, 6, 4],
            [1, 3, 7],
            [1, 7, 5],
        ];
        Self {
            name: name.into(),
            vertices,
            triangles,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.triangles[index];
        Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c])
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangles.len()).map(|i| self.triangle(i))
    }

    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for v in &self.vertices {
            bounds.expand_to_include(*v);
        }
        bounds
    }
}
