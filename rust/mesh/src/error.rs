// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mesh primitives.

use crate::keys::{EdgeKey, FaceKey, VertexKey};

/// Result type alias for mesh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a mesh.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Vertex key not found in the mesh.
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    /// Edge key not found in the mesh.
    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    /// Face key not found in the mesh.
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// An edge would connect a vertex to itself.
    #[error("edge endpoints must be distinct: {0:?}")]
    DegenerateEdge(VertexKey),

    /// A face loop has fewer than 3 distinct vertices.
    #[error("face loop needs at least 3 distinct vertices, got {0}")]
    DegenerateFace(usize),

    /// A face has no well-defined normal (zero area or collinear loop).
    #[error("face {0:?} has zero area")]
    ZeroAreaFace(FaceKey),

    /// Insetting a face would collapse or flip its inner loop.
    #[error("inset of face {face:?} by {thickness} collapses the face")]
    DegenerateInset { face: FaceKey, thickness: f64 },

    /// Caller supplied a position list that does not match the face loop.
    #[error("face {face:?} has {expected} vertices but {got} positions were supplied")]
    LoopMismatch {
        face: FaceKey,
        expected: usize,
        got: usize,
    },

    /// Two loop vertices cannot be connected across the face.
    #[error("cannot split face {face:?}: {reason}")]
    InvalidSplit { face: FaceKey, reason: &'static str },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
