// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge subdivision and face splitting.
//!
//! Subdividing an edge inserts evenly spaced vertices into the edge and into
//! every face loop that uses it. When a face has exactly two selected edges
//! that share no vertex, the matching cut vertices are connected across the
//! face, which splits it into strips. This is how grids are cut into quads.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::Mesh;
use crate::error::{Error, Result};
use crate::keys::*;

/// Result of [`Mesh::subdivide_edges`].
#[derive(Debug, Clone, Default)]
pub struct SubdivideResult {
    /// Pieces of the subdivided edges, per input edge from start to end.
    pub split_edges: Vec<EdgeKey>,
    /// Edges created across faces to connect opposite cuts.
    pub inner_edges: Vec<EdgeKey>,
    /// New cut vertices, per input edge from start to end.
    pub verts: Vec<VertexKey>,
    /// Faces created by connecting cuts.
    pub faces: Vec<FaceKey>,
}

/// A selected edge as seen from one face, recorded before any splitting.
#[derive(Debug, Clone, Copy)]
struct FaceSide {
    edge: EdgeKey,
    ends: (VertexKey, VertexKey),
    forward: bool,
}

impl FaceSide {
    fn shares_vertex(&self, other: &FaceSide) -> bool {
        let (a0, a1) = self.ends;
        let (b0, b1) = other.ends;
        a0 == b0 || a0 == b1 || a1 == b0 || a1 == b1
    }
}

impl Mesh {
    /// Splits every edge into `cuts + 1` equal pieces.
    ///
    /// With `cuts == 0` nothing changes and `split_edges` echoes the input.
    /// Duplicate input edges are subdivided once.
    pub fn subdivide_edges(&mut self, edges: &[EdgeKey], cuts: usize) -> Result<SubdivideResult> {
        let mut seen = FxHashSet::default();
        let edges: Vec<EdgeKey> = edges.iter().copied().filter(|ek| seen.insert(*ek)).collect();
        if let Some(&missing) = edges.iter().find(|&&ek| !self.edges.contains_key(ek)) {
            return Err(Error::EdgeNotFound(missing));
        }
        if cuts == 0 {
            return Ok(SubdivideResult {
                split_edges: edges,
                ..Default::default()
            });
        }

        // Which selected edges each face holds, in loop order
        let selected: FxHashSet<EdgeKey> = edges.iter().copied().collect();
        let faces = self.faces_of_edges(&edges);
        let sides: Vec<(FaceKey, Vec<FaceSide>)> = faces
            .iter()
            .map(|&fk| {
                let list = self
                    .face_edges(fk)
                    .unwrap_or_default()
                    .iter()
                    .filter(|ek| selected.contains(*ek))
                    .filter_map(|&edge| {
                        Some(FaceSide {
                            edge,
                            ends: self.edge_vertices(edge)?,
                            forward: self.face_traverses_forward(fk, edge)?,
                        })
                    })
                    .collect();
                (fk, list)
            })
            .collect();

        let mut result = SubdivideResult::default();
        let mut cut_map: FxHashMap<EdgeKey, Vec<VertexKey>> = FxHashMap::default();
        for &ek in &edges {
            let (cut_verts, pieces) = self.cut_edge(ek, cuts)?;
            result.verts.extend_from_slice(&cut_verts);
            result.split_edges.extend(pieces);
            cut_map.insert(ek, cut_verts);
        }

        for (fk, list) in sides {
            let [a, b] = list.as_slice() else {
                continue;
            };
            if a.shares_vertex(b) {
                continue;
            }
            let ordered = |side: &FaceSide| -> Vec<VertexKey> {
                let mut verts = cut_map.get(&side.edge).cloned().unwrap_or_default();
                if !side.forward {
                    verts.reverse();
                }
                verts
            };
            let (cuts_a, cuts_b) = (ordered(a), ordered(b));

            let mut current = fk;
            for (k, &va) in cuts_a.iter().enumerate() {
                let vb = cuts_b[cuts_b.len() - 1 - k];
                let (kept, piece, edge) = self.split_face(current, va, vb)?;
                result.inner_edges.push(edge);
                result.faces.push(piece);
                current = kept;
            }
        }

        Ok(result)
    }

    /// Connects two non-adjacent vertices of a face loop.
    ///
    /// The face keeps its key for the loop walking forward from `a` to `b`;
    /// the walk from `b` back to `a` becomes a new face with the same
    /// material. Returns `(kept, new, connecting edge)`.
    pub fn split_face(
        &mut self,
        face: FaceKey,
        a: VertexKey,
        b: VertexKey,
    ) -> Result<(FaceKey, FaceKey, EdgeKey)> {
        let data = self.face(face).ok_or(Error::FaceNotFound(face))?;
        let verts = data.verts.clone();
        let material = data.material;
        let n = verts.len();

        let ia = verts
            .iter()
            .position(|&v| v == a)
            .ok_or(Error::InvalidSplit { face, reason: "vertex not in face" })?;
        let ib = verts
            .iter()
            .position(|&v| v == b)
            .ok_or(Error::InvalidSplit { face, reason: "vertex not in face" })?;
        let gap = (ib + n - ia) % n;
        if gap < 2 || gap > n - 2 {
            return Err(Error::InvalidSplit { face, reason: "vertices are adjacent" });
        }

        let walk = |from: usize, len: usize| -> Vec<VertexKey> {
            (0..=len).map(|i| verts[(from + i) % n]).collect()
        };
        let kept_loop = walk(ia, gap);
        let new_loop = walk(ib, n - gap);

        self.replace_face_loop(face, kept_loop)?;
        let piece = self.add_face_by_vertices(&new_loop)?;
        if let Some(m) = material {
            self.set_face_material(&[piece], m);
        }
        let edge = self
            .find_edge(a, b)
            .ok_or(Error::InvalidSplit { face, reason: "connecting edge missing" })?;
        Ok((face, piece, edge))
    }

    /// Inserts `cuts` vertices into an edge and all face loops using it, then
    /// replaces the edge by its pieces. Returns the cut vertices and the
    /// pieces, both ordered from the edge's start to its end.
    fn cut_edge(&mut self, edge: EdgeKey, cuts: usize) -> Result<(Vec<VertexKey>, Vec<EdgeKey>)> {
        let data = self.edge(edge).cloned().ok_or(Error::EdgeNotFound(edge))?;
        let p0 = self.vertex_point(data.start).ok_or(Error::VertexNotFound(data.start))?;
        let p1 = self.vertex_point(data.end).ok_or(Error::VertexNotFound(data.end))?;

        let cut_verts: Vec<VertexKey> = (1..=cuts)
            .map(|k| {
                let t = k as f64 / (cuts + 1) as f64;
                self.add_vertex_at(&(p0 + (p1 - p0) * t))
            })
            .collect();

        let faces = self.edge_faces(edge).to_vec();
        let mut loops = Vec::with_capacity(faces.len());
        for &fk in &faces {
            let face = self.face(fk).ok_or(Error::FaceNotFound(fk))?;
            let Some(i) = face.edges.iter().position(|&ek| ek == edge) else {
                continue;
            };
            let mut inserted = cut_verts.clone();
            if face.verts[i] != data.start {
                inserted.reverse();
            }
            let mut verts = face.verts.clone();
            verts.splice(i + 1..i + 1, inserted);
            loops.push((fk, verts));
        }

        self.remove_edge_raw(edge);
        let chain: Vec<VertexKey> = std::iter::once(data.start)
            .chain(cut_verts.iter().copied())
            .chain(std::iter::once(data.end))
            .collect();
        let pieces = chain
            .windows(2)
            .map(|w| self.add_edge(w[0], w[1]))
            .collect::<Result<Vec<_>>>()?;
        for (fk, verts) in loops {
            self.replace_face_loop(fk, verts)?;
        }
        Ok((cut_verts, pieces))
    }
}
