// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Fenestra Mesh
//!
//! Boundary-representation mesh store for procedural architecture.
//!
//! All vertices, edges and faces live in slot maps owned by a single
//! [`Mesh`]. Faces keep an ordered loop of vertex keys together with the
//! matching loop of edge keys, and the mesh maintains upward adjacency
//! (vertex → edges, edge → faces) in index tables rather than through
//! back-pointers.
//!
//! On top of the store sit the editing primitives that window generation is
//! built from: edge subdivision, individual inset, discrete and edge-only
//! extrusion, duplication, poking, affine moves, winding recalculation and
//! coincident-vertex merging. Every primitive returns its new geometry in
//! classified result sets ordered by input traversal order.

pub mod arena;
pub mod construction;
pub mod duplicate;
pub mod error;
pub mod extrude;
pub mod geometry;
pub mod inset;
pub mod keys;
pub mod merge;
pub mod normals;
pub mod poke;
pub mod serialization;
pub mod spatial;
pub mod subdivide;
pub mod transform;
pub mod traversal;

pub use arena::{MaterialId, Mesh};
pub use construction::make_quad;
pub use duplicate::DuplicateResult;
pub use error::{Error, Result};
pub use extrude::{ExtrudeEdgesResult, ExtrudeFacesResult};
pub use geometry::{EdgeClasses, LocalFrame};
pub use inset::InsetResult;
pub use keys::{EdgeKey, ElementKey, ElementType, FaceKey, VertexKey};
pub use poke::PokeResult;
pub use serialization::{FaceDocument, MeshDocument};
pub use spatial::SpatialIndex;
pub use subdivide::SubdivideResult;
