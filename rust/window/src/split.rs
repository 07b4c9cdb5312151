// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face splitter: carves a smaller rectangle out of the target face to leave
//! a margin of wall around the window.

use fenestra_mesh::{Error as MeshError, FaceKey, Mesh};
use nalgebra::Vector3;

use crate::error::{Result, WindowError};

/// Slack allowed when checking that the rectangle stays inside the face.
const CONTAINMENT_EPSILON: f64 = 1e-9;

/// Shrinks `face` to a `size[0] x size[1]` fraction of its width and height,
/// centered on its center plus `offset` (projected onto the face plane).
///
/// The face keeps its key and becomes the rectangle; the margin becomes a
/// ring of faces carrying the face's original material. When `enabled` is
/// false the face is returned untouched.
pub fn split(
    mesh: &mut Mesh,
    face: FaceKey,
    size: [f64; 2],
    offset: &Vector3<f64>,
    enabled: bool,
) -> Result<FaceKey> {
    if !enabled {
        return Ok(face);
    }

    let verts = mesh.face_verts(face).ok_or(MeshError::FaceNotFound(face))?.to_vec();
    if verts.len() != 4 {
        return Err(MeshError::LoopMismatch {
            face,
            expected: 4,
            got: verts.len(),
        }
        .into());
    }
    let frame = mesh
        .face_frame_or_fallback(face)
        .ok_or_else(|| WindowError::degenerate(face, "face has no normal"))?;
    let center = mesh.face_center(face).ok_or(MeshError::FaceNotFound(face))?;

    let points = mesh.face_points(face).unwrap_or_default();
    let local: Vec<(f64, f64)> = points.iter().map(|p| frame.to_local(&center, p)).collect();
    let (min_s, max_s, min_u, max_u) = local.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(a, b, c, d), &(s, u)| (a.min(s), b.max(s), c.min(u), d.max(u)),
    );

    let width = (max_s - min_s) * size[0];
    let height = (max_u - min_u) * size[1];
    if !(width > 0.0 && height > 0.0) {
        return Err(WindowError::degenerate(
            face,
            format!("split size {width} x {height} is not positive"),
        ));
    }

    let shift = offset - frame.normal * frame.normal.dot(offset);
    let (cs, cu) = (shift.dot(&frame.side), shift.dot(&frame.up));
    let (half_w, half_h) = (width / 2.0, height / 2.0);
    if cs - half_w < min_s - CONTAINMENT_EPSILON
        || cs + half_w > max_s + CONTAINMENT_EPSILON
        || cu - half_h < min_u - CONTAINMENT_EPSILON
        || cu + half_h > max_u + CONTAINMENT_EPSILON
    {
        return Err(WindowError::degenerate(face, "split rectangle leaves the face"));
    }

    // Each corner moves to the rectangle corner of its quadrant
    let corners: Vec<(f64, f64)> = local
        .iter()
        .map(|&(s, u)| {
            (
                if s < 0.0 { cs - half_w } else { cs + half_w },
                if u < 0.0 { cu - half_h } else { cu + half_h },
            )
        })
        .collect();
    let distinct = (0..4).all(|i| (i + 1..4).all(|j| corners[i] != corners[j]));
    if !distinct {
        return Err(WindowError::degenerate(face, "face corners do not span four quadrants"));
    }

    let positions: Vec<_> = corners
        .iter()
        .map(|&(s, u)| frame.to_world(&center, s, u))
        .collect();
    mesh.inset_to(face, &positions)?;

    tracing::debug!(?face, width, height, "Split face");
    Ok(face)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wall(mesh: &mut Mesh) -> FaceKey {
        mesh.add_face_by_coords(&[
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 0.0, 2.0],
            [0.0, 0.0, 2.0],
        ])
        .unwrap()
    }

    #[test]
    fn disabled_split_is_identity() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);
        let before = mesh.face_points(face);

        let out = split(&mut mesh, face, [0.5, 0.5], &Vector3::new(1.0, 0.0, 0.0), false).unwrap();

        assert_eq!(out, face);
        assert_eq!(mesh.face_points(face), before);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn split_shrinks_and_offsets() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);
        let normal = mesh.face_normal(face).unwrap();

        // offset along the normal is dropped
        let offset = Vector3::new(0.5, 3.0, 0.25);
        let out = split(&mut mesh, face, [0.5, 0.5], &offset, true).unwrap();

        assert_eq!(mesh.face_count(), 5);
        assert_relative_eq!(mesh.face_area(out).unwrap(), 2.0, epsilon = 1e-9);
        let c = mesh.face_center(out).unwrap();
        assert_relative_eq!(c.x, 2.5, epsilon = 1e-9);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(c.z, 1.25, epsilon = 1e-9);
        assert!(mesh.face_normal(out).unwrap().dot(&normal) > 0.99);
    }

    #[test]
    fn rectangle_outside_the_face_is_degenerate() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);

        let err = split(&mut mesh, face, [0.5, 0.5], &Vector3::new(1.5, 0.0, 0.0), true).unwrap_err();

        assert!(matches!(err, WindowError::DegenerateGeometry { .. }));
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn non_quads_are_rejected() {
        let mut mesh = Mesh::new();
        let tri = mesh
            .add_face_by_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap();
        let err = split(&mut mesh, tri, [0.5, 0.5], &Vector3::zeros(), true).unwrap_err();
        assert!(matches!(err, WindowError::UpstreamPrimitiveFailure(_)));
    }
}
