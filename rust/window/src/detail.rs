// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arch detail: turns the arch cap into a fan of small recessed panes.

use fenestra_mesh::FaceKey;
use fenestra_mesh::Mesh;

use crate::error::{Result, WindowError};
use crate::materials::{MaterialRole, WindowMaterials};

/// Geometry produced by [`build`].
#[derive(Debug, Clone, Default)]
pub struct DetailReport {
    /// The recessed triangles (or the plain fan when no thickness is set).
    pub triangles: Vec<FaceKey>,
    /// Inset rings around the triangles, with pane material.
    pub rings: Vec<FaceKey>,
}

/// Pokes `face` into a triangle fan. With a positive `thickness` every
/// triangle is inset, extruded and pushed back by `depth` along the face's
/// original normal.
pub fn build(
    mesh: &mut Mesh,
    face: FaceKey,
    enabled: bool,
    thickness: f64,
    depth: f64,
    materials: &mut WindowMaterials<'_>,
) -> Result<DetailReport> {
    let mut report = DetailReport::default();
    materials.resolve(MaterialRole::Pane);
    if !enabled {
        return Ok(report);
    }

    let normal = mesh
        .face_normal(face)
        .ok_or_else(|| WindowError::degenerate(face, "face has no normal"))?;
    let fan = mesh.poke(face)?.faces;

    if thickness > 0.0 {
        report.rings = mesh
            .inset_individual(&fan, thickness)
            .map_err(WindowError::from_inset)?
            .faces;
        mesh.recalc_normals();
        materials.apply(mesh, MaterialRole::Pane, &report.rings);

        let extruded = mesh.extrude_discrete_faces(&fan)?;
        for &tri in &extruded.faces {
            mesh.translate_face(tri, &(-normal * depth));
        }
        report.triangles = extruded.faces;
    } else {
        report.triangles = fan;
    }

    tracing::debug!(
        ?face,
        triangles = report.triangles.len(),
        rings = report.rings.len(),
        "Built arch detail"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{MaterialLibrary, WindowProperties};
    use approx::assert_relative_eq;

    fn cap(mesh: &mut Mesh) -> FaceKey {
        // half-hexagon facing -Y, like a two-segment arch
        mesh.add_face_by_coords(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 0.0, 0.5],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 0.5],
        ])
        .unwrap()
    }

    fn run(mesh: &mut Mesh, face: FaceKey, enabled: bool, thickness: f64) -> (DetailReport, WindowProperties) {
        let mut library = MaterialLibrary::new();
        let mut properties = WindowProperties::default();
        let mut materials = WindowMaterials::new(&mut library, Default::default(), &mut properties);
        let report = build(mesh, face, enabled, thickness, 0.01, &mut materials).unwrap();
        (report, properties)
    }

    #[test]
    fn disabled_detail_leaves_the_face() {
        let mut mesh = Mesh::new();
        let face = cap(&mut mesh);
        let (report, properties) = run(&mut mesh, face, false, 0.03);
        assert!(report.triangles.is_empty());
        assert!(mesh.face(face).is_some());
        // the pane material is still claimed for later passes
        assert!(properties.pane.is_some());
    }

    #[test]
    fn fan_triangles_are_inset_and_recessed() {
        let mut mesh = Mesh::new();
        let face = cap(&mut mesh);

        let (report, properties) = run(&mut mesh, face, true, 0.03);

        assert_eq!(report.triangles.len(), 5);
        assert_eq!(report.rings.len(), 15);
        let pane = properties.pane.unwrap();
        assert_eq!(mesh.faces_with_material(pane).len(), 15);
        for &tri in &report.triangles {
            assert_eq!(mesh.face_verts(tri).unwrap().len(), 3);
            assert_relative_eq!(mesh.face_center(tri).unwrap().y, 0.01, epsilon = 1e-9);
        }
        // fan + rings + one side quad per triangle edge
        assert_eq!(mesh.face_count(), 5 + 15 + 15);
    }

    #[test]
    fn zero_thickness_only_pokes() {
        let mut mesh = Mesh::new();
        let face = cap(&mut mesh);
        let (report, _) = run(&mut mesh, face, true, 0.0);
        assert_eq!(report.triangles.len(), 5);
        assert!(report.rings.is_empty());
        assert_eq!(mesh.face_count(), 5);
    }
}
