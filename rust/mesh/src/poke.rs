// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poking a face into a triangle fan.

use crate::arena::Mesh;
use crate::error::{Error, Result};
use crate::keys::*;

/// Result of [`Mesh::poke`].
#[derive(Debug, Clone)]
pub struct PokeResult {
    /// The new vertex at the face's median center.
    pub center: VertexKey,
    /// One triangle per boundary edge, in loop order.
    pub faces: Vec<FaceKey>,
}

impl Mesh {
    /// Replaces a face by a fan of triangles around its median center.
    ///
    /// Triangle `i` is `[verts[i], verts[i + 1], center]`, so the fan keeps
    /// the face's winding and its material.
    pub fn poke(&mut self, face: FaceKey) -> Result<PokeResult> {
        let center = self.face_center(face).ok_or(Error::FaceNotFound(face))?;
        let material = self.face_material(face);
        let verts = self.remove_face(face)?.verts;

        let c = self.add_vertex_at(&center);
        let n = verts.len();
        let faces = (0..n)
            .map(|i| self.add_face_by_vertices(&[verts[i], verts[(i + 1) % n], c]))
            .collect::<Result<Vec<_>>>()?;
        if let Some(m) = material {
            self.set_face_material(&faces, m);
        }
        Ok(PokeResult { center: c, faces })
    }
}
