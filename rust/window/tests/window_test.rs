// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole window passes run through the public API.

use approx::assert_relative_eq;
use fenestra_mesh::{FaceKey, Mesh};
use fenestra_window::{
    generate, split, FaceSelection, FillMode, FillReport, GenerationReport, MaterialLibrary,
    MaterialRole, WindowConfig, WindowError, WindowProperties, WindowRecord, WindowStyle,
};
use nalgebra::Vector3;

/// A 2x2 wall quad facing -Y.
fn wall() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_face_by_coords(&[
        [0.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [2.0, 0.0, 2.0],
        [0.0, 0.0, 2.0],
    ])
    .unwrap();
    mesh
}

fn unsplit() -> WindowConfig {
    WindowConfig {
        has_split: false,
        frame_thickness: 0.1,
        frame_depth: 0.1,
        ..Default::default()
    }
}

fn run(
    mesh: &mut Mesh,
    style: WindowStyle,
    config: &WindowConfig,
) -> (GenerationReport, MaterialLibrary, WindowProperties) {
    let mut library = MaterialLibrary::new();
    let mut properties = WindowProperties::default();
    let report = generate(
        mesh,
        style,
        &FaceSelection::Create(vec![0]),
        config,
        &mut properties,
        &mut library,
    )
    .unwrap();
    (report, library, properties)
}

fn panes(report: &GenerationReport) -> &[FaceKey] {
    match &report.completed[0].fill {
        FillReport::Panes(panes) => &panes.cells,
        other => panic!("expected panes, got {other:?}"),
    }
}

#[test]
fn flat_window_with_one_by_one_panes() {
    let mut mesh = wall();
    let (report, library, properties) = run(&mut mesh, WindowStyle::Flat, &unsplit());

    let cells = panes(&report);
    assert_eq!(cells.len(), 4);
    for &cell in cells {
        // 0.9 x 0.9 quarters of the 1.8 opening, inset by 0.05
        assert_relative_eq!(mesh.face_area(cell).unwrap(), 0.64, epsilon = 1e-9);
        // frame depth 0.1 plus pane depth 0.05, away from the -Y front
        assert_relative_eq!(mesh.face_center(cell).unwrap().y, 0.15, epsilon = 1e-9);
    }

    let glass = properties.glass.unwrap();
    for &cell in cells {
        assert_eq!(mesh.face_material(cell), Some(glass));
    }
    assert_eq!(
        library.names(),
        &[
            MaterialRole::Glass.name(),
            MaterialRole::Frame.name(),
            MaterialRole::Pane.name()
        ]
    );
    assert_eq!(mesh.faces_with_material(properties.pane.unwrap()).len(), 16);
}

#[test]
fn flat_window_with_horizontal_bars() {
    let mut mesh = wall();
    let config = WindowConfig {
        fill_mode: FillMode::Bar,
        pane_count_x: 2,
        pane_count_y: 0,
        ..unsplit()
    };
    let (report, _, properties) = run(&mut mesh, WindowStyle::Flat, &config);

    let FillReport::Bars(bars) = &report.completed[0].fill else {
        panic!("expected bars");
    };
    assert_eq!((bars.horizontal, bars.vertical), (2, 0));
    assert_eq!(mesh.faces_with_material(properties.bar.unwrap()).len(), bars.faces.len());
}

#[test]
fn bar_size_follows_pane_thickness() {
    let mut mesh = wall();
    let config = WindowConfig {
        fill_mode: FillMode::Bar,
        pane_count_x: 1,
        pane_count_y: 0,
        pane_thickness: 0.2,
        ..unsplit()
    };
    let (report, _, _) = run(&mut mesh, WindowStyle::Flat, &config);

    let FillReport::Bars(bars) = &report.completed[0].fill else {
        panic!("expected bars");
    };
    let front = bars.faces[0];
    let frame = mesh.face_frame(front).unwrap();
    let (w, h) = mesh.face_dimensions(front, &frame).unwrap();
    assert_relative_eq!(w, 1.8, epsilon = 1e-9);
    assert_relative_eq!(h, 0.2, epsilon = 1e-9);
}

#[test]
fn bars_on_a_floor_are_skipped() {
    let mut mesh = Mesh::new();
    mesh.add_face_by_coords(&[
        [0.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [2.0, 2.0, 0.0],
        [0.0, 2.0, 0.0],
    ])
    .unwrap();
    let config = WindowConfig {
        fill_mode: FillMode::Bar,
        ..Default::default()
    };
    let (report, _, _) = run(&mut mesh, WindowStyle::Flat, &config);

    assert!(report.completed.is_empty());
    assert!(matches!(
        report.failed[0].error,
        WindowError::UnsupportedOrientation(_)
    ));
}

#[test]
fn arched_window_profile() {
    let mut mesh = wall();
    let config = WindowConfig {
        arch_segments: 4,
        arch_offset: 0.5,
        arch_height: 0.4,
        ..unsplit()
    };
    let (report, _, _) = run(&mut mesh, WindowStyle::Arched, &config);

    let arch = report.completed[0].arch.as_ref().unwrap();
    let zs: Vec<f64> = arch
        .vertices
        .iter()
        .map(|&v| mesh.vertex_point(v).unwrap().z)
        .collect();
    assert_eq!(zs.len(), 5);
    // the top edge sat at z = 2
    assert_relative_eq!(zs[0], 1.5, epsilon = 1e-9);
    assert_relative_eq!(zs[2], 1.9, epsilon = 1e-9);
    for k in 0..zs.len() {
        assert_relative_eq!(zs[k], zs[zs.len() - 1 - k], epsilon = 1e-9);
    }
    assert_eq!(panes(&report).len(), 4);
}

#[test]
fn arched_window_without_segments_keeps_a_square_cap() {
    let mut mesh = wall();
    let config = WindowConfig {
        arch_segments: 0,
        ..unsplit()
    };
    let (report, _, _) = run(&mut mesh, WindowStyle::Arched, &config);

    let arch = report.completed[0].arch.as_ref().unwrap();
    assert!(arch.vertices.is_empty());
    assert_eq!(arch.detail.triangles.len(), 4);
}

#[test]
fn disabled_split_is_identity() {
    let mut mesh = wall();
    let face = mesh.face_keys().next().unwrap();
    let before = mesh.commit();

    let out = split::split(&mut mesh, face, [0.3, 0.3], &Vector3::new(0.2, 0.0, 0.1), false).unwrap();

    assert_eq!(out, face);
    assert_eq!(mesh.commit(), before);
}

#[test]
fn barriers_are_idempotent_after_a_pass() {
    let mut mesh = wall();
    run(&mut mesh, WindowStyle::Arched, &WindowConfig::default());

    mesh.merge_duplicate_vertices(1e-4).unwrap();
    mesh.recalc_normals();
    let settled = mesh.commit();

    assert_eq!(mesh.merge_duplicate_vertices(1e-4).unwrap(), 0);
    assert_eq!(mesh.recalc_normals(), 0);
    assert_eq!(mesh.commit(), settled);
}

#[test]
fn update_pass_refinds_recorded_faces() {
    let original = wall().commit();

    let mut first = Mesh::load(&original).unwrap();
    let config = WindowConfig::default();
    let (report, library, properties) = run(&mut first, WindowStyle::Flat, &config);
    let record = WindowRecord::new(WindowStyle::Flat, config.clone(), &report, properties);

    let mut doc = original.clone();
    doc.materials = library.names().to_vec();
    record.store(&mut doc).unwrap();

    // a later pass starts from the stored record and the unwindowed mesh
    let stored = WindowRecord::load(&doc).unwrap().unwrap();
    let mut second = Mesh::load(&doc).unwrap();
    let mut library = MaterialLibrary::from_names(doc.materials.clone());
    let mut properties = stored.properties;
    let again = generate(
        &mut second,
        stored.style,
        &stored.selection(),
        &stored.config,
        &mut properties,
        &mut library,
    )
    .unwrap();

    assert_eq!(again.completed.len(), 1);
    assert_eq!(second.face_count(), first.face_count());
    // ids were reused, not recreated
    assert_eq!(properties, stored.properties);
    assert_eq!(library.names().len(), 3);
}
