//! Vertex sequences with per-vertex segment lengths.
//!
//! The stroke and dash generators both need each vertex paired with the
//! distance to its successor, and both need coincident points dropped so
//! that segment directions are always defined.

use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

/// A vertex with the distance to the next vertex in its sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexDist {
    pub x: f64,
    pub y: f64,
    pub dist: f64,
}

impl VertexDist {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, dist: 0.0 }
    }

    /// Store the distance to `next`; returns `false` when the two points
    /// coincide.
    pub fn calc_dist(&mut self, next: &VertexDist) -> bool {
        self.dist = calc_distance(self.x, self.y, next.x, next.y);
        self.dist > VERTEX_DIST_EPSILON
    }
}

/// An ordered run of vertices with coincident neighbours removed.
///
/// After [`VertexSequence::close`], every vertex's `dist` holds the length
/// of the segment that starts at it. For closed sequences that includes the
/// closing segment from the last vertex back to the first.
#[derive(Debug, Clone, Default)]
pub struct VertexSequence {
    vertices: Vec<VertexDist>,
}

impl VertexSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex, dropping it if it coincides with the current last one.
    pub fn add(&mut self, x: f64, y: f64) {
        let v = VertexDist::new(x, y);
        if let Some(last) = self.vertices.last_mut() {
            if !last.calc_dist(&v) {
                return;
            }
        }
        self.vertices.push(v);
    }

    pub fn remove_all(&mut self) {
        self.vertices.clear();
    }

    /// Finish the sequence and compute every segment length.
    pub fn close(&mut self, closed: bool) {
        if closed {
            while self.vertices.len() > 1 {
                let first = self.vertices[0];
                let n = self.vertices.len();
                if self.vertices[n - 1].calc_dist(&first) {
                    break;
                }
                self.vertices.pop();
            }
        }

        let n = self.vertices.len();
        for i in 0..n {
            let next = if i + 1 < n {
                self.vertices[i + 1]
            } else if closed {
                self.vertices[0]
            } else {
                self.vertices[i].dist = 0.0;
                continue;
            };
            self.vertices[i].calc_dist(&next);
        }
    }

    /// Vertex `i`, wrapping around the sequence.
    #[inline]
    pub fn get(&self, i: usize) -> &VertexDist {
        &self.vertices[i % self.vertices.len()]
    }

    /// Vertex before `i`, wrapping around the sequence.
    #[inline]
    pub fn prev(&self, i: usize) -> &VertexDist {
        let n = self.vertices.len();
        &self.vertices[(i + n - 1) % n]
    }

    pub fn as_slice(&self) -> &[VertexDist] {
        &self.vertices
    }
}

impl std::ops::Index<usize> for VertexSequence {
    type Output = VertexDist;

    fn index(&self, i: usize) -> &VertexDist {
        &self.vertices[i]
    }
}
