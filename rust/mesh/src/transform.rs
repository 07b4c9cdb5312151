// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Affine moves on vertex sets.
//!
//! Transforms modify vertex coordinates in-place. Since edges and faces only
//! reference vertices through keys, moving vertices moves everything that
//! uses them.

use nalgebra::{Point3, Vector3};

use crate::arena::Mesh;
use crate::error::{Error, Result};
use crate::geometry::LocalFrame;
use crate::keys::*;

impl Mesh {
    /// Translates the given vertices by `offset`.
    pub fn translate_verts(&mut self, verts: &[VertexKey], offset: &Vector3<f64>) {
        for &vk in verts {
            if let Some(v) = self.vertices.get_mut(vk) {
                v.x += offset.x;
                v.y += offset.y;
                v.z += offset.z;
            }
        }
    }

    /// Translates every vertex of a face by `offset`.
    pub fn translate_face(&mut self, face: FaceKey, offset: &Vector3<f64>) {
        if let Some(verts) = self.face_verts(face).map(|v| v.to_vec()) {
            self.translate_verts(&verts, offset);
        }
    }

    /// Scales vertices along a single axis about `origin`.
    ///
    /// Components perpendicular to `axis` are untouched, so scaling a wall
    /// face along its local up axis squashes it vertically without moving it
    /// sideways or out of its plane.
    pub fn scale_verts_along(
        &mut self,
        verts: &[VertexKey],
        origin: &Point3<f64>,
        axis: &Vector3<f64>,
        factor: f64,
    ) {
        let Some(axis) = axis.try_normalize(1e-12) else {
            return;
        };
        for &vk in verts {
            if let Some(p) = self.vertex_point(vk) {
                let along = (p - origin).dot(&axis);
                let moved = p + axis * (along * (factor - 1.0));
                self.set_vertex_point(vk, &moved);
            }
        }
    }

    /// Forces a face to the exact rectangle spanned by its extents along the
    /// frame's side and up axes.
    ///
    /// Quads keep their vertices: each corner snaps to the rectangle corner of
    /// its quadrant around the face center. Other loops are replaced by a
    /// fresh 4-vertex rectangle face carrying the same material, whose key is
    /// returned.
    pub fn regularize_face(&mut self, face: FaceKey, frame: &LocalFrame) -> Result<FaceKey> {
        let center = self.face_center(face).ok_or(Error::FaceNotFound(face))?;
        let verts = self.face_verts(face).map(|v| v.to_vec()).unwrap_or_default();
        let local: Vec<(f64, f64)> = verts
            .iter()
            .filter_map(|&vk| self.vertex_point(vk))
            .map(|p| frame.to_local(&center, &p))
            .collect();

        let (mut min_s, mut min_u) = (f64::INFINITY, f64::INFINITY);
        let (mut max_s, mut max_u) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(s, u) in &local {
            min_s = min_s.min(s);
            min_u = min_u.min(u);
            max_s = max_s.max(s);
            max_u = max_u.max(u);
        }
        if !(max_s - min_s > 0.0 && max_u - min_u > 0.0) {
            return Err(Error::ZeroAreaFace(face));
        }

        if verts.len() == 4 {
            let corners: Vec<(f64, f64)> = local
                .iter()
                .map(|&(s, u)| {
                    (
                        if s < 0.0 { min_s } else { max_s },
                        if u < 0.0 { min_u } else { max_u },
                    )
                })
                .collect();
            let distinct = corners
                .iter()
                .enumerate()
                .all(|(i, c)| corners[i + 1..].iter().all(|o| o != c));
            if distinct {
                for (&vk, (s, u)) in verts.iter().zip(corners) {
                    self.set_vertex_point(vk, &frame.to_world(&center, s, u));
                }
                return Ok(face);
            }
        }

        let corners = [(min_s, min_u), (max_s, min_u), (max_s, max_u), (min_s, max_u)];
        let mut quad: Vec<VertexKey> = corners
            .iter()
            .map(|&(s, u)| self.add_vertex_at(&frame.to_world(&center, s, u)))
            .collect();
        // side × up == -normal for a strict frame; keep the original winding
        if frame.side.cross(&frame.up).dot(&frame.normal) < 0.0 {
            quad.reverse();
        }
        let material = self.face_material(face);
        self.remove_face(face)?;
        let replacement = self.add_face_by_vertices(&quad)?;
        if let Some(m) = material {
            self.set_face_material(&[replacement], m);
        }
        Ok(replacement)
    }
}
