// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial hash for tolerance-based vertex lookup.
//!
//! A grid of cubic cells keyed by integer coordinates. Queries scan the 3x3x3
//! neighbourhood of the query cell, which is exact as long as the tolerance
//! does not exceed the cell size.

use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::arena::Mesh;
use crate::keys::VertexKey;

/// Smallest cell size; keeps zero tolerances from dividing by zero.
const MIN_CELL_SIZE: f64 = 1e-10;

/// A spatial hash grid over vertex positions.
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64, i64), Vec<VertexKey>>,
}

impl SpatialIndex {
    /// Creates an empty index. `cell_size` should be >= the query tolerance.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            grid: FxHashMap::default(),
        }
    }

    /// Indexes every vertex of the mesh, in storage order.
    pub fn from_mesh(mesh: &Mesh, cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (key, v) in mesh.vertices.iter() {
            index.insert(key, &Point3::new(v.x, v.y, v.z));
        }
        index
    }

    pub fn insert(&mut self, key: VertexKey, p: &Point3<f64>) {
        let cell = self.cell_coords(p);
        self.grid.entry(cell).or_default().push(key);
    }

    /// Returns the first indexed vertex within `tolerance` of `p`.
    pub fn find_near(&self, mesh: &Mesh, p: &Point3<f64>, tolerance: f64) -> Option<VertexKey> {
        self.candidates(p)
            .find(|&vk| within(mesh, vk, p, tolerance))
    }

    /// Returns every indexed vertex within `tolerance` of `p`.
    pub fn find_all_near(&self, mesh: &Mesh, p: &Point3<f64>, tolerance: f64) -> Vec<VertexKey> {
        self.candidates(p)
            .filter(|&vk| within(mesh, vk, p, tolerance))
            .collect()
    }

    fn candidates<'a>(&'a self, p: &Point3<f64>) -> impl Iterator<Item = VertexKey> + 'a {
        let (cx, cy, cz) = self.cell_coords(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (dx, dy, dz))))
            .filter_map(move |(dx, dy, dz)| self.grid.get(&(cx + dx, cy + dy, cz + dz)))
            .flat_map(|keys| keys.iter().copied())
    }

    fn cell_coords(&self, p: &Point3<f64>) -> (i64, i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        )
    }
}

fn within(mesh: &Mesh, vk: VertexKey, p: &Point3<f64>, tolerance: f64) -> bool {
    mesh.vertex_point(vk)
        .is_some_and(|q| (q - p).norm_squared() <= tolerance * tolerance)
}

impl Mesh {
    /// Returns an existing vertex within `tolerance` of `p`, or creates one
    /// and adds it to the index.
    pub fn find_or_add_vertex(
        &mut self,
        index: &mut SpatialIndex,
        p: &Point3<f64>,
        tolerance: f64,
    ) -> VertexKey {
        if let Some(existing) = index.find_near(self, p, tolerance) {
            return existing;
        }
        let key = self.add_vertex_at(p);
        index.insert(key, p);
        key
    }
}
