// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries on mesh elements.
//!
//! Normals, centers, areas and extents are always computed from the current
//! vertex positions, so they can never go stale after a primitive moves or
//! re-links vertices.

use nalgebra::{Point3, Vector3};

use crate::arena::Mesh;
use crate::keys::*;

/// Below this length a normal or axis is treated as undefined.
const AXIS_EPSILON: f64 = 1e-9;

/// Maximum |cos| deviation for an edge to count as aligned with an axis.
pub const ALIGN_TOLERANCE: f64 = 1e-4;

/// Computes a polygon normal using Newell's method.
///
/// Works for any planar polygon (convex or concave). The direction follows the
/// right-hand rule relative to the point order. Returns `None` for collinear
/// or repeated points.
pub fn newell_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }

    let mut normal = Vector3::zeros();
    let n = points.len();
    for i in 0..n {
        let curr = points[i];
        let next = points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }

    normal.try_normalize(AXIS_EPSILON)
}

/// Local coordinate frame of a face: its normal, the global up axis projected
/// onto the face plane, and `side = normal × up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub normal: Vector3<f64>,
    pub up: Vector3<f64>,
    pub side: Vector3<f64>,
}

impl LocalFrame {
    /// Builds the frame for a face normal.
    ///
    /// Returns `None` when the normal is parallel to global up (floors,
    /// ceilings): such faces have no in-plane up direction.
    pub fn from_normal(normal: &Vector3<f64>) -> Option<Self> {
        Self::with_reference(normal, &Vector3::z())
    }

    /// Like [`LocalFrame::from_normal`], but horizontal faces fall back to
    /// global +Y as their up reference.
    pub fn from_normal_or_fallback(normal: &Vector3<f64>) -> Self {
        Self::from_normal(normal)
            .or_else(|| Self::with_reference(normal, &Vector3::y()))
            .unwrap_or(Self {
                normal: Vector3::z(),
                up: Vector3::y(),
                side: -Vector3::x(),
            })
    }

    fn with_reference(normal: &Vector3<f64>, reference: &Vector3<f64>) -> Option<Self> {
        let n = normal.try_normalize(AXIS_EPSILON)?;
        let up = (reference - n * n.dot(reference)).try_normalize(AXIS_EPSILON)?;
        Some(Self {
            normal: n,
            up,
            side: n.cross(&up),
        })
    }

    /// Expresses `p` relative to `origin` as `(side, up)` coordinates.
    pub fn to_local(&self, origin: &Point3<f64>, p: &Point3<f64>) -> (f64, f64) {
        let d = p - origin;
        (d.dot(&self.side), d.dot(&self.up))
    }

    /// Maps `(side, up)` coordinates around `origin` back to world space.
    pub fn to_world(&self, origin: &Point3<f64>, side: f64, up: f64) -> Point3<f64> {
        origin + self.side * side + self.up * up
    }

    /// Returns `true` if `dir` runs along the up axis.
    pub fn is_vertical(&self, dir: &Vector3<f64>) -> bool {
        dir.try_normalize(AXIS_EPSILON)
            .is_some_and(|d| d.dot(&self.up).abs() >= 1.0 - ALIGN_TOLERANCE)
    }

    /// Returns `true` if `dir` is perpendicular to the up axis.
    pub fn is_horizontal(&self, dir: &Vector3<f64>) -> bool {
        dir.try_normalize(AXIS_EPSILON)
            .is_some_and(|d| d.dot(&self.up).abs() <= ALIGN_TOLERANCE)
    }
}

/// Edges of a face sorted by their direction in a local frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeClasses {
    pub vertical: Vec<EdgeKey>,
    pub horizontal: Vec<EdgeKey>,
}

impl Mesh {
    /// Returns the 3D position of a vertex as a nalgebra Point3.
    pub fn vertex_point(&self, key: VertexKey) -> Option<Point3<f64>> {
        self.vertices.get(key).map(|v| Point3::new(v.x, v.y, v.z))
    }

    /// Moves a vertex to a new position.
    pub fn set_vertex_point(&mut self, key: VertexKey, p: &Point3<f64>) {
        if let Some(v) = self.vertices.get_mut(key) {
            v.x = p.x;
            v.y = p.y;
            v.z = p.z;
        }
    }

    /// Computes the Euclidean length of an edge.
    pub fn edge_length(&self, key: EdgeKey) -> Option<f64> {
        let (a, b) = self.edge_points(key)?;
        Some((b - a).norm())
    }

    /// Computes the midpoint of an edge.
    pub fn edge_median(&self, key: EdgeKey) -> Option<Point3<f64>> {
        let (a, b) = self.edge_points(key)?;
        Some(nalgebra::center(&a, &b))
    }

    /// Returns the vector from an edge's start to its end.
    pub fn edge_direction(&self, key: EdgeKey) -> Option<Vector3<f64>> {
        let (a, b) = self.edge_points(key)?;
        Some(b - a)
    }

    fn edge_points(&self, key: EdgeKey) -> Option<(Point3<f64>, Point3<f64>)> {
        let edge = self.edges.get(key)?;
        Some((self.vertex_point(edge.start)?, self.vertex_point(edge.end)?))
    }

    /// Returns the positions of a face loop, in winding order.
    pub fn face_points(&self, key: FaceKey) -> Option<Vec<Point3<f64>>> {
        self.faces
            .get(key)?
            .verts
            .iter()
            .map(|&vk| self.vertex_point(vk))
            .collect()
    }

    /// Computes the unit face normal (Newell's method).
    pub fn face_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        newell_normal(&self.face_points(key)?)
    }

    /// Computes the median center (mean of loop vertices) of a face.
    pub fn face_center(&self, key: FaceKey) -> Option<Point3<f64>> {
        let points = self.face_points(key)?;
        if points.is_empty() {
            return None;
        }
        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / points.len() as f64))
    }

    /// Computes the area of a face using the cross-product triangle fan method.
    pub fn face_area(&self, key: FaceKey) -> Option<f64> {
        let points = self.face_points(key)?;
        if points.len() < 3 {
            return Some(0.0);
        }
        let p0 = points[0];
        let mut total = Vector3::zeros();
        for i in 1..points.len() - 1 {
            total += (points[i] - p0).cross(&(points[i + 1] - p0));
        }
        Some(total.norm() / 2.0)
    }

    /// Returns the strict local frame of a face; `None` for horizontal faces
    /// or faces without a normal.
    pub fn face_frame(&self, key: FaceKey) -> Option<LocalFrame> {
        LocalFrame::from_normal(&self.face_normal(key)?)
    }

    /// Returns the local frame of a face, falling back to +Y as up reference
    /// for horizontal faces.
    pub fn face_frame_or_fallback(&self, key: FaceKey) -> Option<LocalFrame> {
        Some(LocalFrame::from_normal_or_fallback(&self.face_normal(key)?))
    }

    /// Computes `(width, height)` of a face: its extents along the frame's
    /// side and up axes.
    pub fn face_dimensions(&self, key: FaceKey, frame: &LocalFrame) -> Option<(f64, f64)> {
        let points = self.face_points(key)?;
        let origin = *points.first()?;
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &points {
            let (s, u) = frame.to_local(&origin, p);
            min = (min.0.min(s), min.1.min(u));
            max = (max.0.max(s), max.1.max(u));
        }
        Some((max.0 - min.0, max.1 - min.1))
    }

    /// Splits edges into those running along the frame's up axis and those
    /// perpendicular to it. Edges that are neither are left out.
    pub fn classify_edges(&self, edges: &[EdgeKey], frame: &LocalFrame) -> EdgeClasses {
        let mut classes = EdgeClasses::default();
        for &ek in edges {
            let Some(dir) = self.edge_direction(ek) else {
                continue;
            };
            if frame.is_vertical(&dir) {
                classes.vertical.push(ek);
            } else if frame.is_horizontal(&dir) {
                classes.horizontal.push(ek);
            }
        }
        classes
    }
}
