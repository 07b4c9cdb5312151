// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fenestra CLI - window generation on JSON mesh documents.
//!
//! Loads a mesh document, turns the selected faces into windows and writes
//! the result to a new document:
//!
//! ```text
//! fenestra <mesh.json> <window.json> <out.json> [FACE]...
//! ```
//!
//! Faces are picked by index. Without indices, the faces recorded by an
//! earlier run are re-found by their center and normal and regenerated with
//! the new window configuration. An update pass runs on the base mesh and
//! reads the record from an earlier output given with `--record`; the output
//! itself no longer holds the faces the record points at.
//!
//! # Environment
//!
//! - `FENESTRA_STYLE` - `flat` (default) or `arched`
//! - `FENESTRA_MERGE_TOLERANCE` - vertex welding tolerance
//! - `RUST_LOG` - log filter

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fenestra_mesh::{Mesh, MeshDocument};
use fenestra_window::{
    generate, FaceSelection, GenerationReport, MaterialLibrary, WindowConfig, WindowProperties,
    WindowRecord, WindowStyle,
};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "fenestra")]
#[command(about = "Generate windows on faces of a JSON mesh document", long_about = None)]
struct Cli {
    /// Input mesh document
    mesh: PathBuf,
    /// Window configuration; missing fields take their defaults
    window: PathBuf,
    /// Where to write the resulting document
    output: PathBuf,
    /// Face indices to turn into windows (default: faces of the `--record` document)
    faces: Vec<usize>,
    /// Window style, `flat` or `arched` (overrides FENESTRA_STYLE)
    #[arg(long)]
    style: Option<String>,
    /// Document holding the window record for an update pass
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,fenestra_window=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    run(&cli, &config)
}

/// A stored window record and the material table its ids index into.
struct RecordSource {
    record: WindowRecord,
    materials: Vec<String>,
}

/// What a pass works on and the state it starts from.
struct PassPlan {
    selection: FaceSelection,
    properties: WindowProperties,
    material_names: Vec<String>,
    previous: Option<WindowRecord>,
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let style = resolve_style(cli.style.as_deref(), config)?;

    let doc = read_document(&cli.mesh)?;
    let mut window = read_window_config(&cli.window)?;
    if let Some(tolerance) = config.merge_tolerance {
        window.merge_tolerance = tolerance;
    }
    let source = cli.record.as_deref().map(read_record).transpose()?;
    let plan = plan_pass(&cli.faces, &doc, source)?;

    tracing::info!(
        mesh = %cli.mesh.display(),
        ?style,
        vertices = doc.vertices.len(),
        faces = doc.faces.len(),
        "Loaded mesh document"
    );

    let (doc, report) = window_pass(doc, plan, style, window)?;

    let json = doc.to_json()?;
    fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    tracing::info!(
        output = %cli.output.display(),
        windows = report.completed.len(),
        skipped = report.failed.len(),
        "Wrote mesh document"
    );
    Ok(())
}

/// The `--style` flag wins over the environment.
fn resolve_style(flag: Option<&str>, config: &Config) -> Result<WindowStyle> {
    match flag {
        Some(s) => Ok(s.parse::<WindowStyle>()?),
        None => Ok(config.style),
    }
}

/// Picks the faces of a pass. Indices create new windows; without them the
/// faces of the record source are regenerated. The base document's own
/// record is never used, since its recorded faces were already replaced.
fn plan_pass(faces: &[usize], base: &MeshDocument, source: Option<RecordSource>) -> Result<PassPlan> {
    let mut material_names = base.materials.clone();
    let record = source.map(|source| {
        // recorded material ids index into the record document's table
        if source.materials.starts_with(&material_names) {
            material_names = source.materials;
        }
        source.record
    });

    if !faces.is_empty() {
        return Ok(PassPlan {
            selection: FaceSelection::Create(faces.to_vec()),
            properties: WindowProperties::default(),
            material_names,
            previous: None,
        });
    }
    let Some(record) = record else {
        bail!("no face indices given; pass --record <doc> with an earlier output to update its windows");
    };
    tracing::info!(faces = record.locators.len(), "Updating recorded windows");
    Ok(PassPlan {
        selection: record.selection(),
        properties: record.properties,
        material_names,
        previous: Some(record),
    })
}

/// Runs the pass on `doc` and stores the resulting record in it.
fn window_pass(
    mut doc: MeshDocument,
    plan: PassPlan,
    style: WindowStyle,
    window: WindowConfig,
) -> Result<(MeshDocument, GenerationReport)> {
    let PassPlan {
        selection,
        mut properties,
        material_names,
        previous,
    } = plan;

    let mut mesh = Mesh::load(&doc).context("Failed to build mesh from document")?;
    let mut library = MaterialLibrary::from_names(material_names);
    let report = generate(
        &mut mesh,
        style,
        &selection,
        &window,
        &mut properties,
        &mut library,
    )?;
    if report.completed.is_empty() {
        tracing::warn!("No windows were created");
    }

    mesh.commit_into(&mut doc);
    doc.materials = library.into_names();
    let record = match &previous {
        Some(previous) => previous.updated(style, window, &report, properties),
        None => WindowRecord::new(style, window, &report, properties),
    };
    record.store(&mut doc)?;
    Ok((doc, report))
}

fn record_source(doc: MeshDocument) -> Result<Option<RecordSource>> {
    Ok(WindowRecord::load(&doc)?.map(|record| RecordSource {
        record,
        materials: doc.materials,
    }))
}

fn read_record(path: &Path) -> Result<RecordSource> {
    record_source(read_document(path)?)?
        .with_context(|| format!("{} holds no window record", path.display()))
}

fn read_document(path: &Path) -> Result<MeshDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    MeshDocument::from_json(&json).with_context(|| format!("Invalid mesh document {}", path.display()))
}

fn read_window_config(path: &Path) -> Result<WindowConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    WindowConfig::from_json(&json)
        .with_context(|| format!("Invalid window configuration {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MeshDocument {
        let mut mesh = Mesh::new();
        mesh.add_face_by_coords(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 0.0, 2.0],
            [0.0, 0.0, 2.0],
        ])
        .unwrap();
        mesh.commit()
    }

    fn first_pass(base: &MeshDocument) -> MeshDocument {
        let plan = plan_pass(&[0], base, None).unwrap();
        window_pass(base.clone(), plan, WindowStyle::Flat, WindowConfig::default())
            .unwrap()
            .0
    }

    fn stored(doc: &MeshDocument) -> WindowRecord {
        WindowRecord::load(doc).unwrap().unwrap()
    }

    #[test]
    fn style_flag_wins_over_environment() {
        let config = Config {
            style: WindowStyle::Arched,
            ..Default::default()
        };
        assert_eq!(resolve_style(Some("flat"), &config).unwrap(), WindowStyle::Flat);
        assert_eq!(resolve_style(None, &config).unwrap(), WindowStyle::Arched);
        assert!(resolve_style(Some("gothic"), &config).is_err());
    }

    #[test]
    fn indices_create_windows() {
        let base = base();
        let output = first_pass(&base);

        let record = stored(&output);
        assert_eq!(record.locators.len(), 1);
        assert!(output.faces.len() > base.faces.len());
        assert_eq!(output.materials.len(), 3);
    }

    #[test]
    fn update_needs_a_record_document() {
        let base = base();
        let output = first_pass(&base);

        assert!(plan_pass(&[], &base, None).is_err());
        // an earlier output's own record is not picked up
        assert!(plan_pass(&[], &output, None).is_err());
    }

    #[test]
    fn update_regenerates_the_base_mesh() {
        let base = base();
        let output = first_pass(&base);
        let first = stored(&output);

        let source = record_source(output.clone()).unwrap().unwrap();
        let plan = plan_pass(&[], &base, Some(source)).unwrap();
        assert!(matches!(plan.selection, FaceSelection::Update(_)));
        let window = WindowConfig {
            pane_count_x: 2,
            ..Default::default()
        };
        let (updated, report) = window_pass(base.clone(), plan, WindowStyle::Flat, window).unwrap();

        assert_eq!(report.completed.len(), 1);
        assert_eq!(updated.materials, output.materials);
        let record = stored(&updated);
        assert_eq!(record.config.pane_count_x, 2);
        assert_eq!(record.locators.len(), 1);
        assert_eq!(record.properties, first.properties);

        // the new output works as the record of the next update
        let source = record_source(updated).unwrap().unwrap();
        let plan = plan_pass(&[], &base, Some(source)).unwrap();
        let (_, report) = window_pass(base, plan, WindowStyle::Flat, WindowConfig::default()).unwrap();
        assert_eq!(report.completed.len(), 1);
    }

    #[test]
    fn missed_update_keeps_the_recorded_faces() {
        let base = base();
        let output = first_pass(&base);
        let first = stored(&output);

        // updating the windowed output itself finds none of the recorded faces
        let source = record_source(output.clone()).unwrap().unwrap();
        let plan = plan_pass(&[], &output, Some(source)).unwrap();
        let (again, report) =
            window_pass(output.clone(), plan, WindowStyle::Flat, WindowConfig::default()).unwrap();

        assert!(report.completed.is_empty());
        assert_eq!(again.faces.len(), output.faces.len());
        assert_eq!(stored(&again).locators, first.locators);
    }

    #[test]
    fn record_materials_replace_a_prefix_table() {
        let mut base = base();
        base.materials = vec!["brick".to_string()];
        let output = first_pass(&base);
        assert_eq!(output.materials[0], "brick");
        assert_eq!(output.materials.len(), 4);

        let source = record_source(output.clone()).unwrap().unwrap();
        let plan = plan_pass(&[], &base, Some(source)).unwrap();
        assert_eq!(plan.material_names, output.materials);

        // an unrelated table is left alone
        let mut other = base.clone();
        other.materials = vec!["stone".to_string()];
        let source = record_source(output).unwrap().unwrap();
        let plan = plan_pass(&[], &other, Some(source)).unwrap();
        assert_eq!(plan.material_names, vec!["stone".to_string()]);
    }
}
