// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traversal methods for navigating mesh adjacency.
//!
//! Downward traversal reads face loops; upward traversal (vertex → edges →
//! faces) goes through the adjacency index.

use rustc_hash::FxHashSet;

use crate::arena::Mesh;
use crate::keys::*;

impl Mesh {
    /// Returns the start and end vertex keys of an edge.
    pub fn edge_vertices(&self, key: EdgeKey) -> Option<(VertexKey, VertexKey)> {
        self.edges.get(key).map(|e| (e.start, e.end))
    }

    /// Returns the vertex loop of a face, in winding order.
    pub fn face_verts(&self, key: FaceKey) -> Option<&[VertexKey]> {
        self.faces.get(key).map(|f| f.verts.as_slice())
    }

    /// Returns the edge loop of a face, in winding order.
    pub fn face_edges(&self, key: FaceKey) -> Option<&[EdgeKey]> {
        self.faces.get(key).map(|f| f.edges.as_slice())
    }

    /// Returns the faces bordering an edge, in link order.
    pub fn edge_faces(&self, key: EdgeKey) -> &[FaceKey] {
        self.edge_to_faces
            .get(&key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the edges using a vertex, in link order.
    pub fn vertex_edges(&self, key: VertexKey) -> &[EdgeKey] {
        self.vertex_to_edges
            .get(&key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns all faces using a vertex.
    pub fn vertex_faces(&self, key: VertexKey) -> FxHashSet<FaceKey> {
        self.vertex_edges(key)
            .iter()
            .flat_map(|&ek| self.edge_faces(ek).iter().copied())
            .collect()
    }

    /// Returns the unique faces bordering any of the given edges, in
    /// first-encounter order.
    pub fn faces_of_edges(&self, edges: &[EdgeKey]) -> Vec<FaceKey> {
        let mut seen = FxHashSet::default();
        edges
            .iter()
            .flat_map(|&ek| self.edge_faces(ek).iter().copied())
            .filter(|fk| seen.insert(*fk))
            .collect()
    }

    /// Returns the faces sharing an edge with `key`.
    pub fn face_neighbors(&self, key: FaceKey) -> Vec<FaceKey> {
        let Some(edges) = self.face_edges(key) else {
            return Vec::new();
        };
        let mut seen = FxHashSet::default();
        edges
            .iter()
            .flat_map(|&ek| self.edge_faces(ek).iter().copied())
            .filter(|&fk| fk != key && seen.insert(fk))
            .collect()
    }

    /// Returns `true` if the face loop runs along `edge` from its start to
    /// its end vertex, `false` if it runs the other way, and `None` if the
    /// face does not use the edge.
    pub fn face_traverses_forward(&self, face: FaceKey, edge: EdgeKey) -> Option<bool> {
        let f = self.faces.get(face)?;
        let e = self.edges.get(edge)?;
        let i = f.edges.iter().position(|&ek| ek == edge)?;
        Some(f.verts[i] == e.start)
    }

    /// Returns all unique vertices referenced by the given faces, in loop
    /// order of first encounter.
    pub fn faces_verts(&self, faces: &[FaceKey]) -> Vec<VertexKey> {
        let mut seen = FxHashSet::default();
        faces
            .iter()
            .filter_map(|&fk| self.face_verts(fk))
            .flat_map(|verts| verts.iter().copied())
            .filter(|vk| seen.insert(*vk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::Mesh;
    use crate::construction::make_quad;

    #[test]
    fn neighbours_and_traversal_direction() {
        let mut mesh = Mesh::new();
        let v: Vec<_> = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
            [2.0, 0.0, 0.0],
            [2.0, 0.0, 1.0],
        ]
        .iter()
        .map(|c| mesh.add_vertex(c[0], c[1], c[2]))
        .collect();

        let left = make_quad(&mut mesh, v[0], v[1], v[2], v[3]).unwrap();
        let right = make_quad(&mut mesh, v[1], v[4], v[5], v[2]).unwrap();
        let shared = mesh.find_edge(v[1], v[2]).unwrap();

        assert_eq!(mesh.face_neighbors(left), vec![right]);
        assert_eq!(mesh.edge_faces(shared), &[left, right]);
        assert_eq!(mesh.face_traverses_forward(left, shared), Some(true));
        assert_eq!(mesh.face_traverses_forward(right, shared), Some(false));
        assert_eq!(mesh.vertex_faces(v[1]).len(), 2);
        assert_eq!(mesh.faces_of_edges(&[shared, shared]), vec![left, right]);
        assert_eq!(mesh.faces_verts(&[left, right]).len(), 6);
    }

    #[test]
    fn traversal_of_missing_elements_is_empty() {
        let mut mesh = Mesh::new();
        let face = mesh
            .add_face_by_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap();
        mesh.remove_face(face).unwrap();

        assert!(mesh.face_verts(face).is_none());
        assert!(mesh.face_neighbors(face).is_empty());
    }
}
