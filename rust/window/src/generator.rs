// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window pass orchestration.
//!
//! A pass resolves its face selection once, then runs every face through the
//! split, frame and fill stages in mesh order. Arched windows additionally
//! cut the opening into an upper half that becomes the arch and a lower half
//! that takes the fill.

use std::str::FromStr;

use fenestra_mesh::{Error as MeshError, FaceKey, MeshDocument, Mesh, VertexKey};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::arch;
use crate::bars::{self, BarReport};
use crate::config::{BatchPolicy, FillMode, WindowConfig};
use crate::detail::{self, DetailReport};
use crate::error::{Result, WindowError};
use crate::frame;
use crate::locator::{FaceLocator, FaceSelection};
use crate::materials::{MaterialAssigner, WindowMaterials, WindowProperties};
use crate::panes::{self, PaneReport};
use crate::split;

/// Window style of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStyle {
    #[default]
    Flat,
    Arched,
}

impl FromStr for WindowStyle {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(WindowStyle::Flat),
            "arched" => Ok(WindowStyle::Arched),
            other => Err(WindowError::InvalidConfiguration(format!(
                "unknown window style '{other}'"
            ))),
        }
    }
}

/// Fill geometry of one window.
#[derive(Debug, Clone)]
pub enum FillReport {
    Panes(PaneReport),
    Bars(BarReport),
}

/// Arch geometry of one arched window.
#[derive(Debug, Clone, Default)]
pub struct ArchReport {
    /// Top vertices ordered along the face's side axis.
    pub vertices: Vec<VertexKey>,
    pub detail: DetailReport,
}

/// A face that was turned into a window.
#[derive(Debug, Clone)]
pub struct WindowOutcome {
    /// The selected face.
    pub face: FaceKey,
    /// The framed opening that received the fill.
    pub opening: FaceKey,
    pub fill: FillReport,
    pub arch: Option<ArchReport>,
}

/// A face that was skipped under [`BatchPolicy::SkipFailed`].
#[derive(Debug)]
pub struct FaceFailure {
    pub face: FaceKey,
    pub error: WindowError,
}

/// Result of a window pass.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub completed: Vec<WindowOutcome>,
    pub failed: Vec<FaceFailure>,
    /// Locators of the selected faces, captured before any change.
    pub locators: Vec<FaceLocator>,
}

/// Runs a window pass in the given style.
pub fn generate(
    mesh: &mut Mesh,
    style: WindowStyle,
    selection: &FaceSelection,
    config: &WindowConfig,
    properties: &mut WindowProperties,
    assigner: &mut dyn MaterialAssigner,
) -> Result<GenerationReport> {
    config.validate()?;

    let faces = selection.resolve(mesh);
    let locators = faces
        .iter()
        .filter_map(|&fk| FaceLocator::capture(mesh, fk))
        .collect();
    tracing::info!(?style, faces = faces.len(), "Generating windows");

    let mut materials = WindowMaterials::new(assigner, config.material_overrides, properties);
    let mut report = GenerationReport {
        locators,
        ..Default::default()
    };

    for face in faces {
        let outcome = match style {
            WindowStyle::Flat => flat_window(mesh, face, config, &mut materials),
            WindowStyle::Arched => arched_window(mesh, face, config, &mut materials),
        };
        match outcome {
            Ok(outcome) => {
                tracing::info!(?face, opening = ?outcome.opening, "Window created");
                report.completed.push(outcome);
            }
            Err(error) => match config.batch_policy {
                BatchPolicy::AbortBatch => {
                    tracing::error!(?face, %error, "Window failed, aborting batch");
                    return Err(error);
                }
                BatchPolicy::SkipFailed => {
                    tracing::warn!(?face, %error, "Window failed, skipping face");
                    report.failed.push(FaceFailure { face, error });
                }
            },
        }
    }

    tracing::info!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        "Window pass finished"
    );
    Ok(report)
}

/// Runs a pass of flat windows.
pub fn generate_flat(
    mesh: &mut Mesh,
    selection: &FaceSelection,
    config: &WindowConfig,
    properties: &mut WindowProperties,
    assigner: &mut dyn MaterialAssigner,
) -> Result<GenerationReport> {
    generate(mesh, WindowStyle::Flat, selection, config, properties, assigner)
}

/// Runs a pass of arched windows.
pub fn generate_arched(
    mesh: &mut Mesh,
    selection: &FaceSelection,
    config: &WindowConfig,
    properties: &mut WindowProperties,
    assigner: &mut dyn MaterialAssigner,
) -> Result<GenerationReport> {
    generate(mesh, WindowStyle::Arched, selection, config, properties, assigner)
}

fn split_face(mesh: &mut Mesh, face: FaceKey, config: &WindowConfig) -> Result<FaceKey> {
    let offset = Vector3::from(config.split_offset);
    split::split(mesh, face, config.split_size, &offset, config.has_split)
}

fn frame_face(
    mesh: &mut Mesh,
    face: FaceKey,
    config: &WindowConfig,
    materials: &mut WindowMaterials<'_>,
) -> Result<FaceKey> {
    frame::build(
        mesh,
        face,
        config.frame_thickness,
        config.frame_depth,
        config.merge_tolerance,
        materials,
    )
}

fn fill_opening(
    mesh: &mut Mesh,
    opening: FaceKey,
    config: &WindowConfig,
    materials: &mut WindowMaterials<'_>,
) -> Result<FillReport> {
    match config.fill_mode {
        FillMode::Pane => panes::fill(
            mesh,
            opening,
            config.pane_count_x,
            config.pane_count_y,
            config.pane_thickness,
            config.pane_depth,
            materials,
        )
        .map(FillReport::Panes),
        FillMode::Bar => bars::fill(
            mesh,
            opening,
            config.bar_standoff(),
            config.pane_count_x,
            config.pane_count_y,
            config.bar_thickness(),
            materials,
        )
        .map(FillReport::Bars),
    }
}

fn flat_window(
    mesh: &mut Mesh,
    face: FaceKey,
    config: &WindowConfig,
    materials: &mut WindowMaterials<'_>,
) -> Result<WindowOutcome> {
    let target = split_face(mesh, face, config)?;
    let opening = frame_face(mesh, target, config, materials)?;
    let fill = fill_opening(mesh, opening, config, materials)?;
    Ok(WindowOutcome {
        face,
        opening,
        fill,
        arch: None,
    })
}

fn arched_window(
    mesh: &mut Mesh,
    face: FaceKey,
    config: &WindowConfig,
    materials: &mut WindowMaterials<'_>,
) -> Result<WindowOutcome> {
    let target = split_face(mesh, face, config)?;
    let (upper, lower) = split_upper_lower(mesh, target)?;

    let vertices = arch::build(
        mesh,
        upper,
        config.arch_segments,
        config.arch_offset,
        config.arch_height,
    )?;
    let cap = frame_face(mesh, upper, config, materials)?;
    let detail = detail::build(
        mesh,
        cap,
        config.arch_detail_enabled,
        config.arch_detail_thickness,
        config.arch_detail_depth,
        materials,
    )?;

    let opening = frame_face(mesh, lower, config, materials)?;
    let fill = fill_opening(mesh, opening, config, materials)?;
    Ok(WindowOutcome {
        face,
        opening,
        fill,
        arch: Some(ArchReport { vertices, detail }),
    })
}

/// Cuts a face across its vertical edges and returns `(upper, lower)`.
fn split_upper_lower(mesh: &mut Mesh, face: FaceKey) -> Result<(FaceKey, FaceKey)> {
    let frame = mesh
        .face_frame_or_fallback(face)
        .ok_or_else(|| WindowError::degenerate(face, "face has no normal"))?;
    let edges = mesh.face_edges(face).ok_or(MeshError::FaceNotFound(face))?.to_vec();
    let vertical = mesh.classify_edges(&edges, &frame).vertical;

    let cut = mesh.subdivide_edges(&vertical, 1)?;
    let &[a, b] = cut
        .inner_edges
        .last()
        .map(|&ek| mesh.edge_faces(ek))
        .unwrap_or_default()
    else {
        return Err(WindowError::degenerate(face, "face could not be cut into upper and lower halves"));
    };

    let height = |fk: FaceKey| mesh.face_center(fk).map(|c| c.coords.dot(&frame.up));
    match (height(a), height(b)) {
        (Some(ha), Some(hb)) if ha >= hb => Ok((a, b)),
        (Some(_), Some(_)) => Ok((b, a)),
        _ => Err(WindowError::degenerate(face, "halves have no center")),
    }
}

/// Everything needed to repeat a window pass on the same faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub style: WindowStyle,
    pub config: WindowConfig,
    pub locators: Vec<FaceLocator>,
    #[serde(default)]
    pub properties: WindowProperties,
}

impl WindowRecord {
    /// Key under which the record lives in a document's extras.
    pub const EXTRAS_KEY: &'static str = "fenestra_window";

    pub fn new(
        style: WindowStyle,
        config: WindowConfig,
        report: &GenerationReport,
        properties: WindowProperties,
    ) -> Self {
        Self {
            style,
            config,
            locators: report.locators.clone(),
            properties,
        }
    }

    /// Record of an update pass run from `self`. When the pass re-found fewer
    /// faces than were recorded, the recorded locators are kept so a later
    /// pass on the right mesh can still find every face.
    pub fn updated(
        &self,
        style: WindowStyle,
        config: WindowConfig,
        report: &GenerationReport,
        properties: WindowProperties,
    ) -> Self {
        let mut record = Self::new(style, config, report, properties);
        if record.locators.len() < self.locators.len() {
            tracing::warn!(
                recorded = self.locators.len(),
                found = record.locators.len(),
                "Update pass missed recorded faces, keeping the recorded locators"
            );
            record.locators = self.locators.clone();
        }
        record
    }

    /// Selection that re-finds the recorded faces.
    pub fn selection(&self) -> FaceSelection {
        FaceSelection::Update(self.locators.clone())
    }

    /// Reads the record from a document, if one is stored.
    pub fn load(doc: &MeshDocument) -> Result<Option<Self>> {
        doc.extras
            .get(Self::EXTRAS_KEY)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| WindowError::InvalidConfiguration(format!("window record: {e}")))
            })
            .transpose()
    }

    /// Writes the record into a document's extras.
    pub fn store(&self, doc: &mut MeshDocument) -> Result<()> {
        let value = serde_json::to_value(self)
            .map_err(|e| WindowError::InvalidConfiguration(format!("window record: {e}")))?;
        doc.extras.insert(Self::EXTRAS_KEY.to_string(), value);
        Ok(())
    }
}
