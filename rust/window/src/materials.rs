// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window materials.
//!
//! Each window uses four material roles. Identifiers are resolved lazily on
//! first use, in order of precedence: a configuration override, the id
//! persisted in the window's [`WindowProperties`], or a freshly created
//! material whose id is then persisted.

use fenestra_mesh::{FaceKey, MaterialId, Mesh};
use serde::{Deserialize, Serialize};

/// Material roles of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRole {
    Frame,
    Glass,
    Pane,
    Bar,
}

impl MaterialRole {
    /// Name under which the material is created.
    pub fn name(&self) -> &'static str {
        match self {
            MaterialRole::Frame => "window_frame",
            MaterialRole::Glass => "window_glass",
            MaterialRole::Pane => "window_pane",
            MaterialRole::Bar => "window_bars",
        }
    }
}

/// Creates materials and applies them to faces.
pub trait MaterialAssigner {
    /// Returns the material for a role, creating it if needed.
    fn get_or_create(&mut self, role: MaterialRole) -> MaterialId;

    /// Assigns a material to faces.
    fn assign(&mut self, mesh: &mut Mesh, material: MaterialId, faces: &[FaceKey]) {
        mesh.set_face_material(faces, material);
    }
}

/// In-memory material table; a material's id is its index in the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    names: Vec<String>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing name table, such as the one of a mesh document.
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| MaterialId(i as u32))
    }

    /// Returns the id of the named material, appending it if it is new.
    pub fn get_or_insert(&mut self, name: &str) -> MaterialId {
        if let Some(id) = self.find(name) {
            return id;
        }
        self.names.push(name.to_string());
        MaterialId((self.names.len() - 1) as u32)
    }
}

impl MaterialAssigner for MaterialLibrary {
    fn get_or_create(&mut self, role: MaterialRole) -> MaterialId {
        self.get_or_insert(role.name())
    }
}

/// Per-role material ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<MaterialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glass: Option<MaterialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane: Option<MaterialId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<MaterialId>,
}

impl MaterialSlots {
    pub fn get(&self, role: MaterialRole) -> Option<MaterialId> {
        match role {
            MaterialRole::Frame => self.frame,
            MaterialRole::Glass => self.glass,
            MaterialRole::Pane => self.pane,
            MaterialRole::Bar => self.bar,
        }
    }

    pub fn set(&mut self, role: MaterialRole, id: MaterialId) {
        let slot = match role {
            MaterialRole::Frame => &mut self.frame,
            MaterialRole::Glass => &mut self.glass,
            MaterialRole::Pane => &mut self.pane,
            MaterialRole::Bar => &mut self.bar,
        };
        *slot = Some(id);
    }
}

/// Materials supplied by the caller, taking precedence over everything else.
pub type MaterialOverrides = MaterialSlots;

/// Persisted per-window record of resolved material ids.
pub type WindowProperties = MaterialSlots;

/// Resolves and applies materials for one window pass.
pub struct WindowMaterials<'a> {
    assigner: &'a mut dyn MaterialAssigner,
    overrides: MaterialOverrides,
    properties: &'a mut WindowProperties,
}

impl<'a> WindowMaterials<'a> {
    pub fn new(
        assigner: &'a mut dyn MaterialAssigner,
        overrides: MaterialOverrides,
        properties: &'a mut WindowProperties,
    ) -> Self {
        Self {
            assigner,
            overrides,
            properties,
        }
    }

    /// Returns the id for a role, creating and persisting it on first use.
    pub fn resolve(&mut self, role: MaterialRole) -> MaterialId {
        if let Some(id) = self.overrides.get(role).or_else(|| self.properties.get(role)) {
            return id;
        }
        let id = self.assigner.get_or_create(role);
        self.properties.set(role, id);
        tracing::debug!(role = role.name(), id = id.0, "Created window material");
        id
    }

    /// Assigns the role's material to faces. Empty face lists still resolve
    /// the material.
    pub fn apply(&mut self, mesh: &mut Mesh, role: MaterialRole, faces: &[FaceKey]) {
        let id = self.resolve(role);
        if !faces.is_empty() {
            self.assigner.assign(mesh, id, faces);
        }
    }
}
