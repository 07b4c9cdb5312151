// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frame builder: insets the opening to give the frame its thickness and
//! extrudes it backward to give the frame its depth.

use fenestra_mesh::{Error as MeshError, FaceKey, Mesh};

use crate::error::{Result, WindowError};
use crate::materials::{MaterialRole, WindowMaterials};

/// Builds a frame around `face` and returns the fillable opening inside it.
///
/// The incoming face is glazed first, so the returned opening carries glass.
/// With `depth <= 0` the frame is flush and the inset face itself is
/// returned.
pub fn build(
    mesh: &mut Mesh,
    face: FaceKey,
    thickness: f64,
    depth: f64,
    merge_tolerance: f64,
    materials: &mut WindowMaterials<'_>,
) -> Result<FaceKey> {
    materials.apply(mesh, MaterialRole::Glass, &[face]);

    let merged = mesh.merge_duplicate_vertices(merge_tolerance)?;
    if merged > 0 {
        tracing::debug!(merged, "Welded coincident vertices before framing");
    }
    if mesh.face(face).is_none() {
        return Err(WindowError::degenerate(face, "face collapsed while welding vertices"));
    }

    let mut frame_faces = Vec::new();
    if thickness > 0.0 {
        let inset = mesh
            .inset_individual(&[face], thickness)
            .map_err(WindowError::from_inset)?;
        frame_faces.extend(inset.faces);
    }

    mesh.recalc_normals();

    let opening = if depth > 0.0 {
        let normal = mesh
            .face_normal(face)
            .ok_or(MeshError::ZeroAreaFace(face))
            .map_err(WindowError::from_inset)?;
        let extruded = mesh.extrude_discrete_faces(&[face])?;
        let opening = extruded.faces[0];
        mesh.translate_face(opening, &(-normal * depth));
        frame_faces.extend(extruded.side_faces);
        opening
    } else {
        face
    };

    materials.apply(mesh, MaterialRole::Frame, &frame_faces);
    tracing::debug!(?opening, thickness, depth, frame_faces = frame_faces.len(), "Built frame");
    Ok(opening)
}
