// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging of coincident vertices.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::Mesh;
use crate::error::Result;
use crate::keys::*;
use crate::spatial::SpatialIndex;

impl Mesh {
    /// Merges vertices within `tolerance` of each other into the earliest one
    /// in storage order.
    ///
    /// Face loops are rewritten to the surviving vertices. Edges that touched
    /// a merged vertex are rebuilt, and faces left with fewer than three
    /// distinct vertices are removed. When no pair is within tolerance the
    /// mesh is not touched at all. Returns the number of merged vertices.
    pub fn merge_duplicate_vertices(&mut self, tolerance: f64) -> Result<usize> {
        let index = SpatialIndex::from_mesh(self, tolerance);
        let mut merge_map: FxHashMap<VertexKey, VertexKey> = FxHashMap::default();

        let all_keys: Vec<VertexKey> = self.vertices.keys().collect();
        for &vk in &all_keys {
            if merge_map.contains_key(&vk) {
                continue;
            }
            let Some(p) = self.vertex_point(vk) else {
                continue;
            };
            for other in index.find_all_near(self, &p, tolerance) {
                if other != vk && !merge_map.contains_key(&other) {
                    merge_map.insert(other, vk);
                }
            }
        }

        if merge_map.is_empty() {
            return Ok(0);
        }

        // Faces touching a merged vertex, in storage order
        let affected: FxHashSet<FaceKey> = merge_map
            .keys()
            .flat_map(|&vk| self.vertex_faces(vk))
            .collect();
        let mut rewrites: Vec<(FaceKey, Option<Vec<VertexKey>>)> = Vec::new();
        for (fk, face) in self.faces.iter() {
            if affected.contains(&fk) {
                let mapped = face
                    .verts
                    .iter()
                    .map(|v| merge_map.get(v).copied().unwrap_or(*v))
                    .collect();
                rewrites.push((fk, collapse_loop(mapped)));
            }
        }

        let dead_edges: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, e)| merge_map.contains_key(&e.start) || merge_map.contains_key(&e.end))
            .map(|(ek, _)| ek)
            .collect();
        for ek in dead_edges {
            self.remove_edge_raw(ek);
        }
        for vk in merge_map.keys() {
            self.vertices.remove(*vk);
            self.vertex_to_edges.remove(vk);
        }

        for (fk, rewrite) in rewrites {
            match rewrite {
                Some(verts) => self.replace_face_loop(fk, verts)?,
                None => {
                    self.remove_face(fk)?;
                }
            }
        }

        Ok(merge_map.len())
    }
}

/// Drops consecutive repeats from a cyclic loop. Returns `None` when the
/// result is not a valid face loop.
fn collapse_loop(mut verts: Vec<VertexKey>) -> Option<Vec<VertexKey>> {
    verts.dedup();
    while verts.len() > 1 && verts.first() == verts.last() {
        verts.pop();
    }
    let distinct: FxHashSet<VertexKey> = verts.iter().copied().collect();
    (verts.len() >= 3 && distinct.len() == verts.len()).then_some(verts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::make_quad;

    #[test]
    fn merging_welds_adjacent_quads() {
        let mut mesh = Mesh::new();
        let left = mesh
            .add_face_by_coords(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ])
            .unwrap();
        let right = mesh
            .add_face_by_coords(&[
                [1.00001, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 0.0, 1.0],
                [1.00001, 0.0, 1.0],
            ])
            .unwrap();
        assert_eq!(mesh.edge_count(), 8);

        let merged = mesh.merge_duplicate_vertices(1e-4).unwrap();

        assert_eq!(merged, 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.edge_count(), 7);
        assert_eq!(mesh.face_neighbors(left), vec![right]);
    }

    #[test]
    fn merging_is_idempotent_and_cheap_when_clean() {
        let mut mesh = Mesh::new();
        mesh.add_face_by_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap();
        mesh.add_face_by_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .unwrap();

        assert_eq!(mesh.merge_duplicate_vertices(1e-4).unwrap(), 2);
        let (v, e, f) = (mesh.vertex_count(), mesh.edge_count(), mesh.face_count());
        assert_eq!(mesh.merge_duplicate_vertices(1e-4).unwrap(), 0);
        assert_eq!((mesh.vertex_count(), mesh.edge_count(), mesh.face_count()), (v, e, f));
    }

    #[test]
    fn collapsed_faces_are_removed() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(0.0, 0.0, 0.0);
        let b = mesh.add_vertex(1.0, 0.0, 0.0);
        let c = mesh.add_vertex(1.0, 0.0, 0.00001);
        let d = mesh.add_vertex(0.0, 0.0, 1.0);
        let sliver = mesh.add_face_by_vertices(&[a, b, c]).unwrap();
        let quad = make_quad(&mut mesh, a, b, c, d).unwrap();

        assert_eq!(mesh.merge_duplicate_vertices(1e-4).unwrap(), 1);

        assert!(mesh.face(sliver).is_none());
        assert_eq!(mesh.face_verts(quad).unwrap(), &[a, b, d]);
        assert!(mesh.vertex(c).is_none());
    }
}
