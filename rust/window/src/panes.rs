// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pane filler: cuts the opening into a grid and recesses every cell into a
//! glazed pane.

use fenestra_mesh::{Error as MeshError, FaceKey, Mesh};

use crate::error::{Result, WindowError};
use crate::materials::{MaterialRole, WindowMaterials};

/// Geometry produced by [`fill`].
#[derive(Debug, Clone, Default)]
pub struct PaneReport {
    /// Recessed glass cells, in first-encounter order of the cutting edges.
    pub cells: Vec<FaceKey>,
    /// Pane rings around the cells.
    pub rings: Vec<FaceKey>,
}

/// Cuts `face` with `count_x` cuts across its vertical edges and `count_y`
/// cuts across its horizontal edges, then insets each cell by `thickness`
/// and pushes it back by `depth`.
///
/// Without any cut there is no grid to fill and nothing happens.
pub fn fill(
    mesh: &mut Mesh,
    face: FaceKey,
    count_x: usize,
    count_y: usize,
    thickness: f64,
    depth: f64,
    materials: &mut WindowMaterials<'_>,
) -> Result<PaneReport> {
    let frame = mesh
        .face_frame_or_fallback(face)
        .ok_or_else(|| WindowError::degenerate(face, "face has no normal"))?;
    let edges = mesh.face_edges(face).ok_or(MeshError::FaceNotFound(face))?.to_vec();
    let classes = mesh.classify_edges(&edges, &frame);

    let mut row_edges = Vec::new();
    if count_x > 0 {
        row_edges = mesh.subdivide_edges(&classes.vertical, count_x)?.inner_edges;
    }
    let cell_edges = if count_y > 0 {
        let mut columns = classes.horizontal.clone();
        columns.extend(&row_edges);
        mesh.subdivide_edges(&columns, count_y)?.inner_edges
    } else if count_x > 0 {
        row_edges
    } else {
        tracing::debug!(?face, "No pane cuts, skipping panes");
        return Ok(PaneReport::default());
    };

    let cells = mesh.faces_of_edges(&cell_edges);
    let normals: Vec<_> = cells
        .iter()
        .map(|&fk| mesh.face_normal(fk).unwrap_or(frame.normal))
        .collect();

    let mut report = PaneReport::default();
    if thickness > 0.0 {
        report.rings = mesh
            .inset_individual(&cells, thickness)
            .map_err(WindowError::from_inset)?
            .faces;
    }
    for (&cell, normal) in cells.iter().zip(&normals) {
        mesh.translate_face(cell, &(-normal * depth));
    }
    materials.apply(mesh, MaterialRole::Pane, &report.rings);

    tracing::debug!(?face, cells = cells.len(), rings = report.rings.len(), "Filled panes");
    report.cells = cells;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{MaterialLibrary, WindowProperties};
    use approx::assert_relative_eq;

    fn wall(mesh: &mut Mesh) -> FaceKey {
        mesh.add_face_by_coords(&[
            [0.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [3.0, 0.0, 3.0],
            [0.0, 0.0, 3.0],
        ])
        .unwrap()
    }

    fn run(count_x: usize, count_y: usize) -> (Mesh, PaneReport) {
        let mut mesh = Mesh::new();
        let face = wall(&mut mesh);
        let mut library = MaterialLibrary::new();
        let mut properties = WindowProperties::default();
        let mut materials = WindowMaterials::new(&mut library, Default::default(), &mut properties);
        let report = fill(&mut mesh, face, count_x, count_y, 0.1, 0.05, &mut materials).unwrap();
        (mesh, report)
    }

    #[test]
    fn grid_cell_count() {
        for (cx, cy) in [(1, 1), (2, 1), (1, 2), (2, 3)] {
            let (mesh, report) = run(cx, cy);
            assert_eq!(report.cells.len(), (cx + 1) * (cy + 1), "counts {cx}x{cy}");
            assert_eq!(report.rings.len(), 4 * report.cells.len());
            for &cell in &report.cells {
                assert_relative_eq!(mesh.face_center(cell).unwrap().y, 0.05, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn rows_only() {
        let (mesh, report) = run(2, 0);
        assert_eq!(report.cells.len(), 3);
        for &cell in &report.cells {
            let frame = mesh.face_frame(cell).unwrap();
            let (w, h) = mesh.face_dimensions(cell, &frame).unwrap();
            assert_relative_eq!(w, 2.8, epsilon = 1e-9);
            assert_relative_eq!(h, 0.8, epsilon = 1e-9);
        }
    }

    #[test]
    fn no_cuts_is_a_no_op() {
        let (mesh, report) = run(0, 0);
        assert!(report.cells.is_empty());
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn columns_only() {
        let (mesh, report) = run(0, 2);
        assert_eq!(report.cells.len(), 3);
        assert_eq!(mesh.face_count(), 3 + 4 * 3);
    }
}
