// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bar filler: crossing mullion bars in front of the glazing.
//!
//! Every bar starts as a free-standing copy of the opening, is squashed to
//! the bar thickness along one local axis, moved into place and given depth
//! by extruding its long edges back toward the glass. All placement happens
//! in the face's local frame, so the opening may face any horizontal
//! direction.

use fenestra_mesh::{EdgeKey, Error as MeshError, FaceKey, LocalFrame, Mesh};
use nalgebra::{Point3, Vector3};

use crate::error::{Result, WindowError};
use crate::materials::{MaterialRole, WindowMaterials};

/// Vertical bars sit this much closer to the glass than horizontal ones so
/// the two never share a plane.
pub const BAR_EPSILON: f64 = 0.015;

/// Geometry produced by [`fill`].
#[derive(Debug, Clone, Default)]
pub struct BarReport {
    /// Number of horizontal bar assemblies.
    pub horizontal: usize,
    /// Number of vertical bar assemblies.
    pub vertical: usize,
    /// Front faces and extruded faces of every bar, all with bar material.
    pub faces: Vec<FaceKey>,
}

/// Opening geometry shared by all bars of one fill.
struct Placement {
    face: FaceKey,
    frame: LocalFrame,
    center: Point3<f64>,
    width: f64,
    height: f64,
}

/// Adds `count_x` horizontal and `count_y` vertical bars across `face`.
///
/// Bars stand `standoff / 2` in front of the opening. Faces without a strict
/// local frame (floors and ceilings) raise `UnsupportedOrientation`.
pub fn fill(
    mesh: &mut Mesh,
    face: FaceKey,
    standoff: f64,
    count_x: usize,
    count_y: usize,
    thickness: f64,
    materials: &mut WindowMaterials<'_>,
) -> Result<BarReport> {
    let normal = mesh
        .face_normal(face)
        .ok_or_else(|| WindowError::degenerate(face, "face has no normal"))?;
    let frame = LocalFrame::from_normal(&normal).ok_or(WindowError::UnsupportedOrientation(face))?;
    let (width, height) = mesh
        .face_dimensions(face, &frame)
        .ok_or(MeshError::FaceNotFound(face))?;
    let center = mesh.face_center(face).ok_or(MeshError::FaceNotFound(face))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(WindowError::degenerate(face, "opening has no extent"));
    }

    let placement = Placement {
        face,
        frame,
        center,
        width,
        height,
    };
    let mut report = BarReport::default();

    let spacing = height / (count_x + 1) as f64;
    for i in 0..count_x {
        let along = -height / 2.0 + (i + 1) as f64 * spacing;
        report.faces.extend(horizontal_bar(mesh, &placement, along, thickness, standoff)?);
        report.horizontal += 1;
    }

    let spacing = width / (count_y + 1) as f64;
    for i in 0..count_y {
        let along = -width / 2.0 + (i + 1) as f64 * spacing;
        report.faces.extend(vertical_bar(mesh, &placement, along, thickness, standoff)?);
        report.vertical += 1;
    }

    materials.apply(mesh, MaterialRole::Bar, &report.faces);
    tracing::debug!(
        ?face,
        horizontal = report.horizontal,
        vertical = report.vertical,
        "Filled bars"
    );
    Ok(report)
}

fn horizontal_bar(
    mesh: &mut Mesh,
    at: &Placement,
    along_up: f64,
    thickness: f64,
    standoff: f64,
) -> Result<Vec<FaceKey>> {
    let frame = &at.frame;
    let copy = mesh.duplicate_faces(&[at.face])?.faces[0];
    // bars must be flat even when the opening is skewed
    let bar = mesh.regularize_face(copy, frame)?;
    let verts = mesh.face_verts(bar).ok_or(MeshError::FaceNotFound(bar))?.to_vec();

    mesh.scale_verts_along(&verts, &at.center, &frame.up, thickness / at.height);
    let offset = frame.up * along_up + frame.normal * (standoff / 2.0);
    mesh.translate_verts(&verts, &offset);

    let edges = mesh.face_edges(bar).ok_or(MeshError::FaceNotFound(bar))?.to_vec();
    let long_edges = mesh.classify_edges(&edges, frame).horizontal;
    extrude_back(mesh, bar, &long_edges, standoff / 2.0, &frame.normal)
}

fn vertical_bar(
    mesh: &mut Mesh,
    at: &Placement,
    along_side: f64,
    thickness: f64,
    standoff: f64,
) -> Result<Vec<FaceKey>> {
    let frame = &at.frame;
    let dup = mesh.duplicate_faces(&[at.face])?;
    let bar = dup.faces[0];

    mesh.scale_verts_along(&dup.verts, &at.center, &frame.side, thickness / at.width);
    let push = standoff / 2.0 - BAR_EPSILON;
    let offset = frame.side * along_side + frame.normal * push;
    mesh.translate_verts(&dup.verts, &offset);

    let long_edges = mesh.classify_edges(&dup.edges, frame).vertical;
    if long_edges.is_empty() {
        return Err(WindowError::UnsupportedOrientation(at.face));
    }
    extrude_back(mesh, bar, &long_edges, push, &frame.normal)
}

/// Extrudes the bar's long edges and moves the copies back by `distance`.
/// Returns the bar's front face followed by the extruded faces. A bar lying
/// on the glazing plane is left flat.
fn extrude_back(
    mesh: &mut Mesh,
    bar: FaceKey,
    edges: &[EdgeKey],
    distance: f64,
    normal: &Vector3<f64>,
) -> Result<Vec<FaceKey>> {
    if distance.abs() <= f64::EPSILON {
        return Ok(vec![bar]);
    }
    let extruded = mesh.extrude_edge_only(edges)?;
    mesh.translate_verts(&extruded.verts, &(-normal * distance));
    let mut faces = Vec::with_capacity(1 + extruded.faces.len());
    faces.push(bar);
    faces.extend(extruded.faces);
    Ok(faces)
}
