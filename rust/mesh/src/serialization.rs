// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON mesh documents.
//!
//! A [`MeshDocument`] is the host container a mesh is loaded from and
//! committed back to. Vertices and faces are stored by index; slot map keys
//! never leave the process. Faces are written in storage order, which is the
//! order face indices refer to.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::VertexKey;

/// Serializable mesh container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<FaceDocument>,
    /// Material names; a face's material is an index into this list.
    #[serde(default)]
    pub materials: Vec<String>,
    /// Free-form records attached by tools working on the mesh.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDocument {
    pub vertices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<u32>,
}

impl MeshDocument {
    /// Parses a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl Mesh {
    /// Builds a mesh from a document.
    pub fn load(doc: &MeshDocument) -> Result<Self> {
        let mut mesh = Mesh::new();
        let vertex_keys: Vec<VertexKey> = doc
            .vertices
            .iter()
            .map(|c| mesh.add_vertex(c[0], c[1], c[2]))
            .collect();

        for (i, fd) in doc.faces.iter().enumerate() {
            let verts = fd
                .vertices
                .iter()
                .map(|&vi| {
                    vertex_keys.get(vi).copied().ok_or_else(|| {
                        Error::Serialization(format!("face {i} references missing vertex {vi}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let fk = mesh.add_face_by_vertices(&verts)?;
            if let Some(m) = fd.material {
                mesh.set_face_material(&[fk], MaterialId(m));
            }
        }
        Ok(mesh)
    }

    /// Writes the mesh into a fresh document.
    ///
    /// Vertices no face uses are kept so that loading and committing an
    /// unchanged document is lossless.
    pub fn commit(&self) -> MeshDocument {
        let mut doc = MeshDocument::default();
        self.commit_into(&mut doc);
        doc
    }

    /// Replaces the geometry of an existing document, keeping its material
    /// names and extras.
    pub fn commit_into(&self, doc: &mut MeshDocument) {
        let mut vertex_ids = FxHashMap::default();
        doc.vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, (k, v))| {
                vertex_ids.insert(k, i);
                [v.x, v.y, v.z]
            })
            .collect();
        doc.faces = self
            .faces
            .values()
            .map(|f| FaceDocument {
                vertices: f.verts.iter().map(|vk| vertex_ids[vk]).collect(),
                material: f.material.map(|m| m.0),
            })
            .collect();
    }

    /// Deserializes a mesh from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::load(&MeshDocument::from_json(json)?)
    }

    /// Serializes the mesh to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        self.commit().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "vertices": [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
        "faces": [{ "vertices": [0, 1, 2, 3], "material": 0 }],
        "materials": ["Wall"]
    }"#;

    #[test]
    fn load_builds_faces_and_materials() {
        let mesh = Mesh::from_json(SQUARE).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 4);
        let face = mesh.face_keys().next().unwrap();
        assert_eq!(mesh.face_material(face), Some(MaterialId(0)));
    }

    #[test]
    fn commit_keeps_names_and_extras() {
        let mut doc = MeshDocument::from_json(SQUARE).unwrap();
        doc.extras
            .insert("note".to_string(), serde_json::Value::String("kept".to_string()));
        let mut mesh = Mesh::load(&doc).unwrap();
        mesh.add_face_by_coords(&[[5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 0.0, 1.0]])
            .unwrap();

        mesh.commit_into(&mut doc);

        assert_eq!(doc.vertices.len(), 7);
        assert_eq!(doc.faces.len(), 2);
        assert_eq!(doc.faces[1].vertices, vec![4, 5, 6]);
        assert_eq!(doc.materials, vec!["Wall".to_string()]);
        assert!(doc.extras.contains_key("note"));
    }

    #[test]
    fn unchanged_document_survives_load_and_commit() {
        let doc = MeshDocument::from_json(SQUARE).unwrap();
        let mut committed = Mesh::load(&doc).unwrap().commit();
        committed.materials = doc.materials.clone();
        assert_eq!(committed, doc);
    }

    #[test]
    fn dangling_vertex_index_is_rejected() {
        let json = r#"{ "vertices": [[0, 0, 0]], "faces": [{ "vertices": [0, 1, 2] }] }"#;
        assert!(matches!(Mesh::from_json(json), Err(Error::Serialization(_))));
    }
}
