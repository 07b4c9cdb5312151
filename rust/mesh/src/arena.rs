// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for mesh elements.
//!
//! The [`Mesh`] is the central owner of all geometry. Every element lives in
//! a slot map with stable, generational keys. Upward adjacency indices
//! (vertex → edges, edge → faces) enable neighbourhood queries without any
//! element holding a reference to another.
//!
//! ## Loop representation
//!
//! A face stores its boundary twice: as the ordered vertex loop
//! `verts[0..n]` and as the edge loop `edges[0..n]`, where `edges[i]` joins
//! `verts[i]` and `verts[(i + 1) % n]`. The winding of the vertex loop
//! defines the face normal (right-hand rule). Edges are undirected; whether a
//! face traverses an edge forward is recovered from the vertex loop.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::keys::*;

/// Identifier of a material slot assigned to faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

/// Data stored for a vertex: a point in 3D space.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Data stored for an edge: an undirected segment between two distinct vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexKey,
    pub end: VertexKey,
}

impl EdgeData {
    /// Returns the endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    pub fn other(&self, v: VertexKey) -> Option<VertexKey> {
        if self.start == v {
            Some(self.end)
        } else if self.end == v {
            Some(self.start)
        } else {
            None
        }
    }

    /// Returns `true` if both edges share at least one endpoint.
    pub fn touches(&self, other: &EdgeData) -> bool {
        self.start == other.start
            || self.start == other.end
            || self.end == other.start
            || self.end == other.end
    }
}

/// Data stored for a face: a polygon bounded by a single vertex loop.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Vertices in winding order.
    pub verts: Vec<VertexKey>,
    /// `edges[i]` joins `verts[i]` and `verts[(i + 1) % n]`.
    pub edges: Vec<EdgeKey>,
    /// Material slot, if one has been assigned.
    pub material: Option<MaterialId>,
}

/// The arena that owns all mesh elements and their adjacency indices.
///
/// # Example
///
/// ```
/// use fenestra_mesh::Mesh;
///
/// let mut mesh = Mesh::new();
/// let face = mesh
///     .add_face_by_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]])
///     .unwrap();
///
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.edge_count(), 4);
/// assert_eq!(mesh.face_verts(face).unwrap().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,

    // Upward adjacency: child → parents, in link order
    pub(crate) vertex_to_edges: FxHashMap<VertexKey, SmallVec<[EdgeKey; 4]>>,
    pub(crate) edge_to_faces: FxHashMap<EdgeKey, SmallVec<[FaceKey; 2]>>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            vertex_to_edges: FxHashMap::default(),
            edge_to_faces: FxHashMap::default(),
        }
    }

    // --- Vertex operations ---

    /// Adds a vertex at the given 3D coordinates.
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> VertexKey {
        self.vertices.insert(VertexData { x, y, z })
    }

    /// Returns the vertex data for the given key, or `None` if not found.
    pub fn vertex(&self, key: VertexKey) -> Option<&VertexData> {
        self.vertices.get(key)
    }

    /// Returns the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the coordinates of a vertex as `[x, y, z]`.
    pub fn vertex_coords(&self, key: VertexKey) -> Option<[f64; 3]> {
        self.vertices.get(key).map(|v| [v.x, v.y, v.z])
    }

    /// Iterates over all vertex keys in storage order.
    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    // --- Edge operations ---

    /// Returns the edge data for the given key, or `None` if not found.
    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    /// Returns the number of edges in the mesh.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Face operations ---

    /// Returns the face data for the given key, or `None` if not found.
    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    /// Returns the number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterates over all face keys in storage order.
    ///
    /// Storage order is the "index" order used when faces are selected by
    /// position.
    pub fn face_keys(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces.keys()
    }

    /// Returns the material assigned to a face.
    pub fn face_material(&self, key: FaceKey) -> Option<MaterialId> {
        self.faces.get(key).and_then(|f| f.material)
    }

    /// Assigns a material to every listed face that still exists.
    pub fn set_face_material(&mut self, faces: &[FaceKey], material: MaterialId) {
        for &fk in faces {
            if let Some(face) = self.faces.get_mut(fk) {
                face.material = Some(material);
            }
        }
    }

    /// Returns the faces carrying the given material, in storage order.
    pub fn faces_with_material(&self, material: MaterialId) -> Vec<FaceKey> {
        self.faces
            .iter()
            .filter(|(_, f)| f.material == Some(material))
            .map(|(k, _)| k)
            .collect()
    }

    // --- Element existence checks ---

    /// Returns `true` if the given key references a live element.
    pub fn contains(&self, key: ElementKey) -> bool {
        match key {
            ElementKey::Vertex(k) => self.vertices.contains_key(k),
            ElementKey::Edge(k) => self.edges.contains_key(k),
            ElementKey::Face(k) => self.faces.contains_key(k),
        }
    }

    // --- Adjacency index helpers ---

    /// Register that an edge uses a vertex.
    pub(crate) fn link_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) {
        let list = self.vertex_to_edges.entry(vertex).or_default();
        if !list.contains(&edge) {
            list.push(edge);
        }
    }

    /// Register that a face uses an edge.
    pub(crate) fn link_edge_face(&mut self, edge: EdgeKey, face: FaceKey) {
        let list = self.edge_to_faces.entry(edge).or_default();
        if !list.contains(&face) {
            list.push(face);
        }
    }

    /// Drop the face from the adjacency lists of the given edge.
    pub(crate) fn unlink_edge_face(&mut self, edge: EdgeKey, face: FaceKey) {
        if let Some(list) = self.edge_to_faces.get_mut(&edge) {
            list.retain(|f| *f != face);
        }
    }

    /// Removes an edge and its adjacency entries. Faces still using it are
    /// not touched; callers re-link them.
    pub(crate) fn remove_edge_raw(&mut self, edge: EdgeKey) -> Option<EdgeData> {
        let data = self.edges.remove(edge)?;
        for v in [data.start, data.end] {
            if let Some(list) = self.vertex_to_edges.get_mut(&v) {
                list.retain(|e| *e != edge);
            }
        }
        self.edge_to_faces.remove(&edge);
        Some(data)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
