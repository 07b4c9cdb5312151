// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face duplication.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::Mesh;
use crate::error::{Error, Result};
use crate::keys::*;

/// Result of [`Mesh::duplicate_faces`].
#[derive(Debug, Clone, Default)]
pub struct DuplicateResult {
    pub verts: Vec<VertexKey>,
    pub edges: Vec<EdgeKey>,
    pub faces: Vec<FaceKey>,
}

impl Mesh {
    /// Copies faces into free-standing geometry.
    ///
    /// Vertices shared between the input faces stay shared between their
    /// copies, but nothing is shared with the originals. Materials are
    /// copied.
    pub fn duplicate_faces(&mut self, faces: &[FaceKey]) -> Result<DuplicateResult> {
        let mut map: FxHashMap<VertexKey, VertexKey> = FxHashMap::default();
        let mut seen_edges = FxHashSet::default();
        let mut result = DuplicateResult::default();

        for &fk in faces {
            let verts = self.face_verts(fk).ok_or(Error::FaceNotFound(fk))?.to_vec();
            let material = self.face_material(fk);

            let mut loop_copy = Vec::with_capacity(verts.len());
            for vk in verts {
                let copy = match map.get(&vk) {
                    Some(&c) => c,
                    None => {
                        let p = self.vertex_point(vk).ok_or(Error::VertexNotFound(vk))?;
                        let c = self.add_vertex_at(&p);
                        map.insert(vk, c);
                        result.verts.push(c);
                        c
                    }
                };
                loop_copy.push(copy);
            }

            let copy = self.add_face_by_vertices(&loop_copy)?;
            if let Some(m) = material {
                self.set_face_material(&[copy], m);
            }
            let edges = self.face_edges(copy).unwrap_or_default();
            result
                .edges
                .extend(edges.iter().copied().filter(|ek| seen_edges.insert(*ek)));
            result.faces.push(copy);
        }
        Ok(result)
    }
}
