// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Individual face inset.
//!
//! Insetting shrinks a face inward and fills the gap with a ring of quads, one
//! per boundary edge. The face keeps its key and becomes the inner face; its
//! old boundary edges now belong to the ring, so neighbouring faces are never
//! modified.

use nalgebra::{Point3, Vector3};

use crate::arena::Mesh;
use crate::error::{Error, Result};
use crate::geometry::newell_normal;
use crate::keys::*;

/// Miter denominators below this mean the two edges fold back on each other.
const MITER_EPSILON: f64 = 1e-9;

/// Result of [`Mesh::inset_individual`].
#[derive(Debug, Clone, Default)]
pub struct InsetResult {
    /// Ring faces of every inset face, in face then loop order.
    pub faces: Vec<FaceKey>,
    /// The shrunk faces (same keys as the input).
    pub inner: Vec<FaceKey>,
}

impl Mesh {
    /// Insets each face individually by `thickness`.
    ///
    /// Every face is validated before any of them is modified, so an error
    /// leaves the mesh untouched.
    pub fn inset_individual(&mut self, faces: &[FaceKey], thickness: f64) -> Result<InsetResult> {
        let plans = faces
            .iter()
            .map(|&fk| Ok((fk, self.inset_positions(fk, thickness)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut result = InsetResult::default();
        for (fk, positions) in plans {
            result.faces.extend(self.inset_to(fk, &positions)?);
            result.inner.push(fk);
        }
        Ok(result)
    }

    /// Computes the mitred inner loop of a face inset by `thickness`.
    ///
    /// Each vertex moves along the bisector of its two adjacent edges so that
    /// both edges end up exactly `thickness` away from their originals.
    pub fn inset_positions(&self, face: FaceKey, thickness: f64) -> Result<Vec<Point3<f64>>> {
        let points = self.face_points(face).ok_or(Error::FaceNotFound(face))?;
        let normal = newell_normal(&points).ok_or(Error::ZeroAreaFace(face))?;
        let degenerate = || Error::DegenerateInset { face, thickness };
        let n = points.len();

        let inward: Vec<Vector3<f64>> = (0..n)
            .map(|i| normal.cross(&(points[(i + 1) % n] - points[i])).try_normalize(MITER_EPSILON))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(degenerate)?;

        let mut positions = Vec::with_capacity(n);
        for i in 0..n {
            let a = inward[(i + n - 1) % n];
            let b = inward[i];
            let denom = 1.0 + a.dot(&b);
            if denom < MITER_EPSILON {
                return Err(degenerate());
            }
            positions.push(points[i] + (a + b) * (thickness / denom));
        }

        // The inner loop must keep the outer loop's orientation edge by edge;
        // a flipped or zero-length edge means the inset overran the face.
        let flipped = (0..n).any(|i| {
            let outer = points[(i + 1) % n] - points[i];
            let inner = positions[(i + 1) % n] - positions[i];
            inner.dot(&outer) <= 0.0
        });
        let same_side = newell_normal(&positions).is_some_and(|inner| inner.dot(&normal) > 0.0);
        if flipped || !same_side {
            return Err(degenerate());
        }
        Ok(positions)
    }

    /// Insets a face to caller-supplied inner positions, one per loop vertex.
    ///
    /// Returns the ring faces in loop order. Ring faces inherit the face's
    /// material.
    pub fn inset_to(&mut self, face: FaceKey, positions: &[Point3<f64>]) -> Result<Vec<FaceKey>> {
        let data = self.face(face).ok_or(Error::FaceNotFound(face))?;
        let outer = data.verts.clone();
        let material = data.material;
        if positions.len() != outer.len() {
            return Err(Error::LoopMismatch {
                face,
                expected: outer.len(),
                got: positions.len(),
            });
        }

        let inner: Vec<VertexKey> = positions.iter().map(|p| self.add_vertex_at(p)).collect();
        self.replace_face_loop(face, inner.clone())?;

        let n = outer.len();
        let mut ring = Vec::with_capacity(n);
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = self.add_face_by_vertices(&[outer[i], outer[j], inner[j], inner[i]])?;
            ring.push(quad);
        }
        if let Some(m) = material {
            self.set_face_material(&ring, m);
        }
        Ok(ring)
    }
}
