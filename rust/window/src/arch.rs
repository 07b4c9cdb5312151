// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arch builder: bends the top edge of a face into a sine profile.

use std::f64::consts::PI;

use fenestra_mesh::{Error as MeshError, FaceKey, Mesh, VertexKey};
use rustc_hash::FxHashSet;

use crate::error::{Result, WindowError};

/// Raise of vertex `k` of `n` along the arch, before the common offset.
pub fn arch_raise(k: usize, n: usize, height: f64) -> f64 {
    if n < 2 {
        return 0.0;
    }
    height * (PI * k as f64 / (n - 1) as f64).sin()
}

/// Cuts the top edge of `face` into `segments` pieces and moves its
/// `segments + 1` vertices down by `offset`, then up along a half sine of
/// amplitude `height`.
///
/// Returns the arch vertices ordered along the face's side axis. With zero
/// segments the face is left alone and nothing is returned.
pub fn build(
    mesh: &mut Mesh,
    face: FaceKey,
    segments: usize,
    offset: f64,
    height: f64,
) -> Result<Vec<VertexKey>> {
    if segments == 0 {
        return Ok(Vec::new());
    }
    let frame = mesh
        .face_frame_or_fallback(face)
        .ok_or_else(|| WindowError::degenerate(face, "face has no normal"))?;
    let edges = mesh.face_edges(face).ok_or(MeshError::FaceNotFound(face))?.to_vec();

    let top = edges
        .iter()
        .filter_map(|&ek| Some((ek, mesh.edge_median(ek)?.coords.dot(&frame.up))))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(ek, _)| ek)
        .ok_or_else(|| WindowError::degenerate(face, "face has no edges"))?;

    let pieces = mesh.subdivide_edges(&[top], segments - 1)?.split_edges;
    let mut seen = FxHashSet::default();
    let mut verts: Vec<(VertexKey, f64)> = pieces
        .iter()
        .filter_map(|&ek| mesh.edge_vertices(ek))
        .flat_map(|(a, b)| [a, b])
        .filter(|vk| seen.insert(*vk))
        .filter_map(|vk| Some((vk, mesh.vertex_point(vk)?.coords.dot(&frame.side))))
        .collect();
    verts.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = verts.len();
    for (k, &(vk, _)) in verts.iter().enumerate() {
        let shift = arch_raise(k, n, height) - offset;
        mesh.translate_verts(&[vk], &(frame.up * shift));
    }

    tracing::debug!(?face, segments, vertices = n, "Built arch");
    Ok(verts.into_iter().map(|(vk, _)| vk).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wall(mesh: &mut Mesh) -> FaceKey {
        mesh.add_face_by_coords(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn raise_is_symmetric() {
        for n in 2..9 {
            for k in 0..n {
                assert_relative_eq!(arch_raise(k, n, 0.4), arch_raise(n - 1 - k, n, 0.4), epsilon = 1e-12);
            }
            assert_relative_eq!(arch_raise(0, n, 0.4), 0.0, epsilon = 1e-12);
        }
        assert_eq!(arch_raise(0, 1, 0.4), 0.0);
    }

    #[test]
    fn four_segments() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);

        let verts = build(&mut mesh, face, 4, 0.5, 0.4).unwrap();

        assert_eq!(verts.len(), 5);
        assert_eq!(mesh.face_verts(face).unwrap().len(), 7);
        let zs: Vec<f64> = verts.iter().map(|&v| mesh.vertex_point(v).unwrap().z).collect();
        let xs: Vec<f64> = verts.iter().map(|&v| mesh.vertex_point(v).unwrap().x).collect();
        assert_relative_eq!(zs[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(zs[4], 0.5, epsilon = 1e-9);
        assert_relative_eq!(zs[2], 0.9, epsilon = 1e-9);
        assert_relative_eq!(zs[1], zs[3], epsilon = 1e-9);
        // side runs toward -X on a wall facing -Y
        for (k, x) in xs.iter().enumerate() {
            assert_relative_eq!(*x, 2.0 - 0.5 * k as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn one_segment_only_lowers_the_corners() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);

        let verts = build(&mut mesh, face, 1, 0.25, 0.4).unwrap();

        assert_eq!(verts.len(), 2);
        for v in verts {
            assert_relative_eq!(mesh.vertex_point(v).unwrap().z, 0.75, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_segments_is_a_no_op() {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);
        let before = mesh.face_points(face);

        assert!(build(&mut mesh, face, 0, 0.5, 0.4).unwrap().is_empty());
        assert_eq!(mesh.face_points(face), before);
    }
}
