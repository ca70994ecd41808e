//! Geometric primitives shared by the mesh, surface indexing and forward kernel.

use glam::{DVec2, DVec3};

/// Axis-aligned box in world coordinates (metres).
/// Convention: [min.x, max.x] x [min.y, max.y] x [min.z, max.z], z positive up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create bounds that represent "no region" (empty). Expanding by any point
    /// makes it non-empty.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_to_include(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn center(&self) -> DVec3 {
        0.5 * (self.min + self.max)
    }

    #[inline]
    pub fn half_extents(&self) -> DVec3 {
        0.5 * (self.max - self.min)
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        let d = self.max - self.min;
        d.x * d.y * d.z
    }
}

/// World-axis-aligned rectangle in metres (horizontal plane).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Part of a triangle a vertical line touches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Face,
    /// On the plan-view edge `from`-`to`; `apex` is the opposite vertex.
    Edge { from: DVec2, to: DVec2, apex: DVec2 },
    Vertex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalHit {
    pub z: f64,
    /// Counter-clockwise winding seen from above.
    pub upward: bool,
    pub contact: Contact,
}

/// Triangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
}

impl Triangle {
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { a, b, c }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.a.min(self.b).min(self.c), self.a.max(self.b).max(self.c))
    }

    /// Where the vertical line through `p` pierces the triangle, if it does.
    ///
    /// Points on an edge count as inside; triangles that are vertical in plan view never
    /// intersect.
    pub fn vertical_hit(&self, p: DVec2) -> Option<VerticalHit> {
        let plan = [self.a.truncate(), self.b.truncate(), self.c.truncate()];
        let [a, b, c] = plan;
        let det = (b - a).perp_dot(c - a);
        if det.abs() <= f64::EPSILON * (b - a).length_squared().max(1.0) {
            return None;
        }
        let w_b = (p - a).perp_dot(c - a) / det;
        let w_c = (b - a).perp_dot(p - a) / det;
        let w_a = 1.0 - w_b - w_c;
        let weights = [w_a, w_b, w_c];
        const TOL: f64 = -1e-12;
        if weights.iter().any(|&w| w < TOL) {
            return None;
        }

        const ON_EDGE: f64 = 1e-9;
        let mut near = (0..3).filter(|&i| weights[i].abs() <= ON_EDGE);
        let contact = match (near.next(), near.next()) {
            (None, _) => Contact::Face,
            (Some(i), None) => Contact::Edge {
                from: plan[(i + 1) % 3],
                to: plan[(i + 2) % 3],
                apex: plan[i],
            },
            _ => Contact::Vertex,
        };

        Some(VerticalHit {
            z: self.a.z + w_b * (self.b.z - self.a.z) + w_c * (self.c.z - self.a.z),
            upward: det > 0.0,
            contact,
        })
    }

    /// Separating-axis overlap test against an axis-aligned box (Akenine-Möller).
    pub fn overlaps_box(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let half = aabb.half_extents();
        let v0 = self.a - center;
        let v1 = self.b - center;
        let v2 = self.c - center;

        let lo = v0.min(v1).min(v2);
        let hi = v0.max(v1).max(v2);
        if lo.x > half.x || hi.x < -half.x {
            return false;
        }
        if lo.y > half.y || hi.y < -half.y {
            return false;
        }
        if lo.z > half.z || hi.z < -half.z {
            return false;
        }

        let edges = [v1 - v0, v2 - v1, v0 - v2];
        for edge in edges {
            for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
                if separated_on(axis.cross(edge), [v0, v1, v2], half) {
                    return false;
                }
            }
        }

        let normal = edges[0].cross(edges[1]);
        let r = half.dot(normal.abs());
        normal.dot(v0).abs() <= r
    }
}

fn separated_on(axis: DVec3, verts: [DVec3; 3], half: DVec3) -> bool {
    if axis.length_squared() < 1e-24 {
        return false;
    }
    let p0 = axis.dot(verts[0]);
    let p1 = axis.dot(verts[1]);
    let p2 = axis.dot(verts[2]);
    let r = half.dot(axis.abs());
    p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
}
