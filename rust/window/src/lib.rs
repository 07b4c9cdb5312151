// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Fenestra Window
//!
//! Procedural windows on top of [`fenestra_mesh`].
//!
//! A window pass takes a set of wall faces and turns each into a window:
//!
//! 1. **Split**: shrink the face to leave a margin of wall around it.
//! 2. **Frame**: inset and recess the opening.
//! 3. **Fill**: cut the opening into recessed glass panes, or lay crossing
//!    bars in front of it.
//!
//! Arched windows cut the split face in two. The upper half gets a sine
//! shaped top, its own frame and a poked fan of small panes; the lower half
//! is framed and filled like a flat window.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use fenestra_mesh::Mesh;
//! use fenestra_window::{generate, FaceSelection, MaterialLibrary, WindowConfig, WindowProperties, WindowStyle};
//!
//! let mut mesh = Mesh::new();
//! mesh.add_face_by_coords(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 0.0, 2.0], [0.0, 0.0, 2.0]])?;
//!
//! let mut library = MaterialLibrary::new();
//! let mut properties = WindowProperties::default();
//! let report = generate(
//!     &mut mesh,
//!     WindowStyle::Flat,
//!     &FaceSelection::Create(vec![0]),
//!     &WindowConfig::default(),
//!     &mut properties,
//!     &mut library,
//! )?;
//! println!("{} windows", report.completed.len());
//! ```

pub mod arch;
pub mod bars;
pub mod config;
pub mod detail;
pub mod error;
pub mod frame;
pub mod generator;
pub mod locator;
pub mod materials;
pub mod panes;
pub mod split;

pub use bars::BarReport;
pub use config::{BatchPolicy, FillMode, WindowConfig};
pub use detail::DetailReport;
pub use error::{Result, WindowError};
pub use generator::{
    generate, generate_arched, generate_flat, ArchReport, FaceFailure, FillReport,
    GenerationReport, WindowOutcome, WindowRecord, WindowStyle,
};
pub use locator::{FaceLocator, FaceSelection, LOCATOR_TOLERANCE};
pub use materials::{
    MaterialAssigner, MaterialLibrary, MaterialOverrides, MaterialRole, WindowMaterials,
    WindowProperties,
};
pub use panes::PaneReport;
