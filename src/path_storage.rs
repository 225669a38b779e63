//! Path storage: the vertex container behind a drawing surface's current
//! path.
//!
//! Vertices are stored with their path commands. Sub-paths begin with
//! `move_to` and may end with a close command. A `line_to` with no current
//! point starts a new sub-path, and a `line_to` after a close continues
//! from the closed sub-path's first point, as in the 2D canvas model.

use crate::basics::{
    is_move_to, is_stop, is_vertex, VertexD, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO,
    PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CLOSE,
};
use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

/// An ordered list of vertices with path commands.
#[derive(Debug, Clone, Default)]
pub struct PathStorage {
    vertices: Vec<VertexD>,
    /// First point of the current sub-path, if any.
    start: Option<(f64, f64)>,
    /// Whether the current sub-path has just been closed.
    closed: bool,
    iterator: usize,
}

impl PathStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all vertices and forget the current point.
    pub fn remove_all(&mut self) {
        self.vertices.clear();
        self.start = None;
        self.closed = false;
        self.iterator = 0;
    }

    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[VertexD] {
        &self.vertices
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push(VertexD::new(x, y, PATH_CMD_MOVE_TO));
        self.start = Some((x, y));
        self.closed = false;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        match self.start {
            None => {
                self.move_to(x, y);
                return;
            }
            Some((sx, sy)) if self.closed => self.move_to(sx, sy),
            Some(_) => {}
        }
        self.vertices.push(VertexD::new(x, y, PATH_CMD_LINE_TO));
    }

    /// Close the current sub-path. Does nothing without one.
    pub fn close_polygon(&mut self) {
        if self.closed || !self.last_command().is_some_and(is_vertex) {
            return;
        }
        self.vertices
            .push(VertexD::new(0.0, 0.0, PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        self.closed = true;
    }

    pub fn last_command(&self) -> Option<u32> {
        self.vertices.last().map(|v| v.cmd)
    }

    /// Coordinates of the most recent vertex-carrying command.
    pub fn last_vertex(&self) -> Option<(f64, f64)> {
        self.vertices
            .iter()
            .rev()
            .find(|v| is_vertex(v.cmd))
            .map(|v| (v.x, v.y))
    }

    /// Append `vs` to the current sub-path, keeping the pen down: a leading
    /// move_to becomes a line_to when a current point exists, and is
    /// dropped when it coincides with that point.
    pub fn join_path<VS: VertexSource + ?Sized>(&mut self, vs: &mut VS, path_id: u32) {
        let (mut x, mut y) = (0.0, 0.0);
        vs.rewind(path_id);
        let mut first = true;
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            if !is_vertex(cmd) {
                if cmd & PATH_FLAGS_CLOSE != 0 {
                    self.close_polygon();
                }
                continue;
            }
            if first && is_move_to(cmd) {
                first = false;
                match self.current_point() {
                    Some((x0, y0)) if calc_distance(x, y, x0, y0) <= VERTEX_DIST_EPSILON => {}
                    _ => self.line_to(x, y),
                }
                continue;
            }
            first = false;
            self.line_to(x, y);
        }
    }

    /// The point the next `line_to` continues from.
    fn current_point(&self) -> Option<(f64, f64)> {
        if self.closed {
            self.start
        } else {
            self.start.and(self.last_vertex())
        }
    }
}

impl VertexSource for PathStorage {
    fn rewind(&mut self, path_id: u32) {
        self.iterator = path_id as usize;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        let Some(v) = self.vertices.get(self.iterator) else {
            return PATH_CMD_STOP;
        };
        *x = v.x;
        *y = v.y;
        self.iterator += 1;
        v.cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::Arc;
    use crate::basics::is_close;
    use std::f64::consts::PI;

    fn commands(path: &mut PathStorage) -> Vec<u32> {
        let (mut x, mut y) = (0.0, 0.0);
        path.rewind(0);
        std::iter::from_fn(|| {
            let cmd = path.vertex(&mut x, &mut y);
            (!is_stop(cmd)).then_some(cmd)
        })
        .collect()
    }

    #[test]
    fn test_first_line_to_starts_subpath() {
        let mut path = PathStorage::new();
        path.line_to(1.0, 2.0);
        path.line_to(3.0, 4.0);
        assert_eq!(commands(&mut path), vec![PATH_CMD_MOVE_TO, PATH_CMD_LINE_TO]);
        assert_eq!(path.last_vertex(), Some((3.0, 4.0)));
    }

    #[test]
    fn test_close_polygon() {
        let mut path = PathStorage::new();
        path.close_polygon();
        assert!(path.is_empty());
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.close_polygon();
        path.close_polygon();
        let cmds = commands(&mut path);
        assert_eq!(cmds.len(), 4);
        assert!(is_close(cmds[3]));
    }

    #[test]
    fn test_line_to_after_close_restarts_at_subpath_start() {
        let mut path = PathStorage::new();
        path.move_to(1.0, 1.0);
        path.line_to(5.0, 1.0);
        path.close_polygon();
        path.line_to(5.0, 5.0);
        let v = path.vertices();
        assert_eq!(v[3], VertexD::new(1.0, 1.0, PATH_CMD_MOVE_TO));
        assert_eq!(v[4], VertexD::new(5.0, 5.0, PATH_CMD_LINE_TO));
    }

    #[test]
    fn test_join_arc_on_empty_path() {
        let mut path = PathStorage::new();
        let mut arc = Arc::new(0.0, 0.0, 10.0, 0.0, 2.0 * PI, true);
        path.join_path(&mut arc, 0);
        let cmds = commands(&mut path);
        assert_eq!(cmds[0], PATH_CMD_MOVE_TO);
        assert!(cmds[1..].iter().all(|&c| c == PATH_CMD_LINE_TO));
    }

    #[test]
    fn test_join_arc_connects_to_current_point() {
        let mut path = PathStorage::new();
        path.move_to(-5.0, 0.0);
        let mut arc = Arc::new(0.0, 0.0, 10.0, 0.0, PI, false);
        path.join_path(&mut arc, 0);
        let v = path.vertices();
        assert_eq!(v[0].cmd, PATH_CMD_MOVE_TO);
        assert_eq!(v[1], VertexD::new(10.0, 0.0, PATH_CMD_LINE_TO));
    }

    #[test]
    fn test_remove_all() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 1.0);
        path.remove_all();
        assert_eq!(path.total_vertices(), 0);
        path.line_to(2.0, 2.0);
        assert_eq!(path.vertices()[0].cmd, PATH_CMD_MOVE_TO);
    }
}
