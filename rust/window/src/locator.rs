// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face selection.
//!
//! A window pass runs either on faces picked by index ("create") or on faces
//! re-found from locators persisted by an earlier pass ("update"). Both
//! resolve to face keys in mesh storage order.

use fenestra_mesh::{FaceKey, Mesh};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Distance and normal deviation under which a face matches a locator.
pub const LOCATOR_TOLERANCE: f64 = 1e-3;

/// Center + normal signature of a face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLocator {
    pub center: [f64; 3],
    pub normal: [f64; 3],
}

impl FaceLocator {
    /// Records the signature of a face; `None` for missing or zero-area faces.
    pub fn capture(mesh: &Mesh, face: FaceKey) -> Option<Self> {
        let center = mesh.face_center(face)?;
        let normal = mesh.face_normal(face)?;
        Some(Self {
            center: center.coords.into(),
            normal: normal.into(),
        })
    }

    pub fn matches(&self, mesh: &Mesh, face: FaceKey, tolerance: f64) -> bool {
        let (Some(center), Some(normal)) = (mesh.face_center(face), mesh.face_normal(face)) else {
            return false;
        };
        (center - Point3::from(self.center)).norm() <= tolerance
            && normal.dot(&Vector3::from(self.normal)) >= 1.0 - tolerance
    }

    /// Returns the first face (in storage order) matching this locator.
    pub fn resolve(&self, mesh: &Mesh, tolerance: f64) -> Option<FaceKey> {
        mesh.face_keys().find(|&fk| self.matches(mesh, fk, tolerance))
    }
}

/// Which faces a window pass operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSelection {
    /// Faces by position in storage order.
    Create(Vec<usize>),
    /// Faces re-found from persisted locators.
    Update(Vec<FaceLocator>),
}

impl FaceSelection {
    /// Resolves the selection to face keys in storage order. Indices out of
    /// range and locators without a match are dropped.
    pub fn resolve(&self, mesh: &Mesh) -> Vec<FaceKey> {
        match self {
            FaceSelection::Create(indices) => {
                let wanted: FxHashSet<usize> = indices.iter().copied().collect();
                mesh.face_keys()
                    .enumerate()
                    .filter(|(i, _)| wanted.contains(i))
                    .map(|(_, fk)| fk)
                    .collect()
            }
            FaceSelection::Update(locators) => {
                let found: FxHashSet<FaceKey> = locators
                    .iter()
                    .filter_map(|loc| {
                        let face = loc.resolve(mesh, LOCATOR_TOLERANCE);
                        if face.is_none() {
                            tracing::warn!(center = ?loc.center, "No face matches stored locator");
                        }
                        face
                    })
                    .collect();
                mesh.face_keys().filter(|fk| found.contains(fk)).collect()
            }
        }
    }
}
