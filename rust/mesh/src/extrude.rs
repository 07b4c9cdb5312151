// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion of faces and free edges.
//!
//! Extrusion never moves anything: the copied geometry sits on top of the
//! original until the caller translates it. Side faces are wound so that
//! they agree with the faces they are attached to.

use rustc_hash::FxHashMap;

use crate::arena::Mesh;
use crate::error::{Error, Result};
use crate::keys::*;

/// Result of [`Mesh::extrude_discrete_faces`].
#[derive(Debug, Clone, Default)]
pub struct ExtrudeFacesResult {
    /// The extruded copies, one per input face.
    pub faces: Vec<FaceKey>,
    /// Side quads joining each original boundary to its copy.
    pub side_faces: Vec<FaceKey>,
}

/// Result of [`Mesh::extrude_edge_only`].
#[derive(Debug, Clone, Default)]
pub struct ExtrudeEdgesResult {
    /// Copied vertices, in order of first encounter.
    pub verts: Vec<VertexKey>,
    /// Copied edges, one per input edge.
    pub edges: Vec<EdgeKey>,
    /// Quads joining each edge to its copy.
    pub faces: Vec<FaceKey>,
}

impl Mesh {
    /// Extrudes each face on its own: the face is replaced by a copy of its
    /// loop joined to the old boundary by side quads.
    ///
    /// Copies and sides inherit the face's material. The original face key
    /// is removed.
    pub fn extrude_discrete_faces(&mut self, faces: &[FaceKey]) -> Result<ExtrudeFacesResult> {
        let mut result = ExtrudeFacesResult::default();
        for &fk in faces {
            let verts = self.face_verts(fk).ok_or(Error::FaceNotFound(fk))?.to_vec();
            let material = self.face_material(fk);

            let copies: Vec<VertexKey> = verts
                .iter()
                .map(|&vk| {
                    let p = self.vertex_point(vk).ok_or(Error::VertexNotFound(vk))?;
                    Ok(self.add_vertex_at(&p))
                })
                .collect::<Result<_>>()?;

            self.remove_face(fk)?;
            let top = self.add_face_by_vertices(&copies)?;
            let mut created = vec![top];

            let n = verts.len();
            for i in 0..n {
                let j = (i + 1) % n;
                let side = self.add_face_by_vertices(&[verts[i], verts[j], copies[j], copies[i]])?;
                result.side_faces.push(side);
                created.push(side);
            }
            if let Some(m) = material {
                self.set_face_material(&created, m);
            }
            result.faces.push(top);
        }
        Ok(result)
    }

    /// Extrudes free edges into quads.
    ///
    /// Endpoints shared by several input edges are copied once, so a chain
    /// of edges extrudes into a connected strip. Each quad runs against the
    /// direction in which the edge's first face traverses it, keeping the
    /// winding consistent with that face.
    pub fn extrude_edge_only(&mut self, edges: &[EdgeKey]) -> Result<ExtrudeEdgesResult> {
        let mut copies: FxHashMap<VertexKey, VertexKey> = FxHashMap::default();
        let mut result = ExtrudeEdgesResult::default();

        for &ek in edges {
            let (a, b) = self.edge_vertices(ek).ok_or(Error::EdgeNotFound(ek))?;
            let owner = self.edge_faces(ek).first().copied();
            let material = owner.and_then(|fk| self.face_material(fk));
            let forward = owner
                .and_then(|fk| self.face_traverses_forward(fk, ek))
                .unwrap_or(false);

            let mut copy_of = |mesh: &mut Mesh, v: VertexKey| -> Result<VertexKey> {
                if let Some(&c) = copies.get(&v) {
                    return Ok(c);
                }
                let p = mesh.vertex_point(v).ok_or(Error::VertexNotFound(v))?;
                let c = mesh.add_vertex_at(&p);
                copies.insert(v, c);
                result.verts.push(c);
                Ok(c)
            };
            let ca = copy_of(self, a)?;
            let cb = copy_of(self, b)?;

            let quad = if forward {
                [b, a, ca, cb]
            } else {
                [a, b, cb, ca]
            };
            let face = self.add_face_by_vertices(&quad)?;
            if let Some(m) = material {
                self.set_face_material(&[face], m);
            }
            let copied = self.find_edge(ca, cb).ok_or(Error::EdgeNotFound(ek))?;
            result.edges.push(copied);
            result.faces.push(face);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn wall(mesh: &mut Mesh) -> FaceKey {
        mesh.add_face_by_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn discrete_extrusion_builds_a_tube() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);
        let normal = mesh.face_normal(face).unwrap();

        let result = mesh.extrude_discrete_faces(&[face]).unwrap();

        assert!(mesh.face(face).is_none());
        assert_eq!(result.faces.len(), 1);
        assert_eq!(result.side_faces.len(), 4);
        assert_eq!(mesh.vertex_count(), 8);

        let top = result.faces[0];
        mesh.translate_face(top, &(-normal * 0.5));
        assert!(mesh.face_normal(top).unwrap().dot(&normal) > 0.99);
        for &side in &result.side_faces {
            assert_relative_eq!(mesh.face_area(side).unwrap(), 0.5, epsilon = 1e-12);
        }
        assert_eq!(mesh.recalc_normals(), 0);
    }

    #[test]
    fn edge_extrusion_shares_copied_corners() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);
        let edges = mesh.face_edges(face).unwrap().to_vec();

        let result = mesh.extrude_edge_only(&edges[0..2]).unwrap();

        assert_eq!(result.verts.len(), 3);
        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.faces.len(), 2);

        mesh.translate_verts(&result.verts, &Vector3::new(0.0, 0.3, 0.0));
        // quads agree with the face they hang from
        assert_eq!(mesh.recalc_normals(), 0);
        for &fk in &result.faces {
            assert_relative_eq!(mesh.face_area(fk).unwrap(), 0.3, epsilon = 1e-12);
        }
    }

    #[test]
    fn extruding_a_loose_edge() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(0.0, 0.0, 0.0);
        let b = mesh.add_vertex(1.0, 0.0, 0.0);
        let edge = mesh.add_edge(a, b).unwrap();

        let result = mesh.extrude_edge_only(&[edge]).unwrap();
        assert_eq!(mesh.face_verts(result.faces[0]).unwrap()[..2], [a, b]);
    }
}
