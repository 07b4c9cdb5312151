// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for mesh elements.
//!
//! Each element is created through the mesh, which ensures referential
//! integrity (all referenced sub-elements must exist), keeps at most one edge
//! per vertex pair, and maintains the adjacency index.

use nalgebra::Point3;
use rustc_hash::FxHashSet;

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;

impl Mesh {
    /// Adds a vertex at a nalgebra point.
    pub fn add_vertex_at(&mut self, p: &Point3<f64>) -> VertexKey {
        self.add_vertex(p.x, p.y, p.z)
    }

    /// Returns the edge joining `a` and `b` in either direction, if any.
    pub fn find_edge(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKey> {
        self.vertex_to_edges.get(&a)?.iter().copied().find(|&ek| {
            self.edges
                .get(ek)
                .is_some_and(|e| (e.start == a && e.end == b) || (e.start == b && e.end == a))
        })
    }

    /// Creates an edge between two existing, distinct vertices.
    ///
    /// If an edge already joins the pair (in either direction) it is returned
    /// instead of inserting a parallel one.
    pub fn add_edge(&mut self, start: VertexKey, end: VertexKey) -> Result<EdgeKey> {
        if !self.vertices.contains_key(start) {
            return Err(Error::VertexNotFound(start));
        }
        if !self.vertices.contains_key(end) {
            return Err(Error::VertexNotFound(end));
        }
        if start == end {
            return Err(Error::DegenerateEdge(start));
        }
        if let Some(existing) = self.find_edge(start, end) {
            return Ok(existing);
        }

        let key = self.edges.insert(EdgeData { start, end });
        self.link_vertex_edge(start, key);
        self.link_vertex_edge(end, key);
        Ok(key)
    }

    /// Creates a face from an ordered vertex loop.
    ///
    /// The loop needs at least 3 distinct vertices. Boundary edges are created
    /// on demand and shared with neighbouring faces.
    pub fn add_face_by_vertices(&mut self, verts: &[VertexKey]) -> Result<FaceKey> {
        validate_loop(self, verts)?;
        let edges = self.loop_edges(verts)?;

        let key = self.faces.insert(FaceData {
            verts: verts.to_vec(),
            edges: edges.clone(),
            material: None,
        });
        for ek in edges {
            self.link_edge_face(ek, key);
        }
        Ok(key)
    }

    /// Creates a face from raw coordinates, adding one new vertex per point.
    pub fn add_face_by_coords(&mut self, coords: &[[f64; 3]]) -> Result<FaceKey> {
        let verts: Vec<VertexKey> = coords
            .iter()
            .map(|c| self.add_vertex(c[0], c[1], c[2]))
            .collect();
        self.add_face_by_vertices(&verts)
    }

    /// Removes a face and unlinks it from its edges.
    ///
    /// Edges and vertices stay in the mesh; they usually still bound
    /// neighbouring faces or the faces that replace this one.
    pub fn remove_face(&mut self, face: FaceKey) -> Result<FaceData> {
        let data = self.faces.remove(face).ok_or(Error::FaceNotFound(face))?;
        for &ek in &data.edges {
            self.unlink_edge_face(ek, face);
        }
        Ok(data)
    }

    /// Replaces the vertex loop of an existing face, keeping its key and
    /// material. Old edges are unlinked (not deleted), new ones are created
    /// or reused.
    pub(crate) fn replace_face_loop(&mut self, face: FaceKey, verts: Vec<VertexKey>) -> Result<()> {
        validate_loop(self, &verts)?;
        let old_edges = self
            .faces
            .get(face)
            .map(|f| f.edges.clone())
            .ok_or(Error::FaceNotFound(face))?;
        for ek in old_edges {
            self.unlink_edge_face(ek, face);
        }

        let edges = self.loop_edges(&verts)?;
        for &ek in &edges {
            self.link_edge_face(ek, face);
        }
        if let Some(data) = self.faces.get_mut(face) {
            data.verts = verts;
            data.edges = edges;
        }
        Ok(())
    }

    /// Edge loop for a vertex loop, creating missing edges.
    fn loop_edges(&mut self, verts: &[VertexKey]) -> Result<Vec<EdgeKey>> {
        let n = verts.len();
        (0..n)
            .map(|i| self.add_edge(verts[i], verts[(i + 1) % n]))
            .collect()
    }
}

/// Checks that a loop has at least 3 distinct, existing vertices.
fn validate_loop(mesh: &Mesh, verts: &[VertexKey]) -> Result<()> {
    let distinct: FxHashSet<VertexKey> = verts.iter().copied().collect();
    if verts.len() < 3 || distinct.len() != verts.len() {
        return Err(Error::DegenerateFace(distinct.len()));
    }
    if let Some(&missing) = verts.iter().find(|&&v| !mesh.vertices.contains_key(v)) {
        return Err(Error::VertexNotFound(missing));
    }
    Ok(())
}

/// Helper to build a quadrilateral face from four corner vertices.
pub fn make_quad(
    mesh: &mut Mesh,
    v0: VertexKey,
    v1: VertexKey,
    v2: VertexKey,
    v3: VertexKey,
) -> Result<FaceKey> {
    mesh.add_face_by_vertices(&[v0, v1, v2, v3])
}
