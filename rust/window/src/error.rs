// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fenestra_mesh::FaceKey;
use thiserror::Error;

/// Result type for window generation
pub type Result<T> = std::result::Result<T, WindowError>;

/// Errors that can occur while generating a window
#[derive(Error, Debug)]
pub enum WindowError {
    /// A split or inset would leave a face with non-positive area. Processing
    /// of the current face stops.
    #[error("Degenerate geometry on face {face:?}: {reason}")]
    DegenerateGeometry { face: FaceKey, reason: String },

    /// The face has no usable local frame for the operation.
    #[error("Unsupported orientation for face {0:?}: normal is parallel to global up")]
    UnsupportedOrientation(FaceKey),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Mesh primitive failed: {0}")]
    UpstreamPrimitiveFailure(#[from] fenestra_mesh::Error),
}

impl WindowError {
    pub(crate) fn degenerate(face: FaceKey, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            face,
            reason: reason.into(),
        }
    }

    /// Maps a failed inset to `DegenerateGeometry`; everything else stays an
    /// upstream failure.
    pub(crate) fn from_inset(err: fenestra_mesh::Error) -> Self {
        match err {
            fenestra_mesh::Error::DegenerateInset { face, thickness } => {
                Self::degenerate(face, format!("inset by {thickness} collapses the face"))
            }
            fenestra_mesh::Error::ZeroAreaFace(face) => Self::degenerate(face, "face has zero area"),
            other => Self::UpstreamPrimitiveFailure(other),
        }
    }
}
