// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Winding consistency across connected faces.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::arena::Mesh;
use crate::keys::*;

impl Mesh {
    /// Makes face windings consistent within each connected component.
    ///
    /// Walks faces breadth-first across edges shared by exactly two faces,
    /// starting from the first face (in storage order) of every component. A
    /// neighbour traversing the shared edge in the same direction as the
    /// current face is flipped. Returns the number of flipped faces; a
    /// second call always returns 0.
    pub fn recalc_normals(&mut self) -> usize {
        let mut visited: FxHashSet<FaceKey> = FxHashSet::default();
        let mut flipped = 0;
        let seeds: Vec<FaceKey> = self.faces.keys().collect();

        for seed in seeds {
            if !visited.insert(seed) {
                continue;
            }
            let mut queue = VecDeque::from([seed]);
            while let Some(face) = queue.pop_front() {
                let edges = self.face_edges(face).map(|e| e.to_vec()).unwrap_or_default();
                for ek in edges {
                    let linked = self.edge_faces(ek);
                    if linked.len() != 2 {
                        continue;
                    }
                    let other = if linked[0] == face { linked[1] } else { linked[0] };
                    if !visited.insert(other) {
                        continue;
                    }
                    if self.face_traverses_forward(face, ek) == self.face_traverses_forward(other, ek) {
                        self.flip_face(other);
                        flipped += 1;
                    }
                    queue.push_back(other);
                }
            }
        }
        flipped
    }

    /// Reverses the winding of a face. The edge loop is permuted to match;
    /// no edges are created.
    pub fn flip_face(&mut self, face: FaceKey) {
        if let Some(data) = self.faces.get_mut(face) {
            let n = data.verts.len();
            data.verts.reverse();
            // edges[i] joined verts[i]..verts[i+1]; after reversal the last
            // edge (closing the loop) stays last
            data.edges[..n - 1].reverse();
        }
    }
}
