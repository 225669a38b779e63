//! Stroke generation: caps, joins, and the outline of a stroked path.
//!
//! [`MathStroke`] computes the offset vertices around a single cap or join.
//! [`StrokeGenerator`] walks every sub-path of a source path and emits one
//! closed polygon per open sub-path (or two for a closed one), ready to be
//! filled with the nonzero rule.

use crate::basics::{
    is_close, is_end_poly, is_move_to, is_stop, is_vertex, PointD, VertexSource, PI,
};
use crate::math::{calc_distance, calc_intersection, cross_product};
use crate::path_storage::PathStorage;
use crate::vertex_sequence::{VertexDist, VertexSequence};

/// Line cap style for open path ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style at path corners.
///
/// A miter join whose length would exceed the miter limit is drawn as a
/// bevel instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl std::fmt::Display for LineCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        })
    }
}

impl std::fmt::Display for LineJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        })
    }
}

// ============================================================================
// MathStroke
// ============================================================================

/// Cap and join geometry for a stroke of a given width.
#[derive(Debug, Clone)]
pub struct MathStroke {
    /// Half the line width.
    width: f64,
    width_eps: f64,
    miter_limit: f64,
    inner_miter_limit: f64,
    approx_scale: f64,
    line_cap: LineCap,
    line_join: LineJoin,
}

impl Default for MathStroke {
    fn default() -> Self {
        Self::new()
    }
}

impl MathStroke {
    pub fn new() -> Self {
        Self {
            width: 0.5,
            width_eps: 0.5 / 1024.0,
            miter_limit: 10.0,
            inner_miter_limit: 1.01,
            approx_scale: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
        }
    }

    /// Set the full line width; the sign is ignored.
    pub fn set_width(&mut self, w: f64) {
        self.width = w.abs() * 0.5;
        self.width_eps = self.width / 1024.0;
    }

    pub fn width(&self) -> f64 {
        self.width * 2.0
    }

    pub fn set_line_cap(&mut self, lc: LineCap) {
        self.line_cap = lc;
    }
    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn set_line_join(&mut self, lj: LineJoin) {
        self.line_join = lj;
    }
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.miter_limit = ml;
    }
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.approx_scale = s;
    }

    /// Angular step for round caps and joins.
    fn arc_step(&self) -> f64 {
        (self.width / (self.width + 0.125 / self.approx_scale)).acos() * 2.0
    }

    /// Cap vertices at endpoint `v0`, whose neighbour is `v1` at distance `len`.
    pub fn calc_cap(&self, vc: &mut Vec<PointD>, v0: &VertexDist, v1: &VertexDist, len: f64) {
        vc.clear();

        let dx1 = (v1.y - v0.y) / len * self.width;
        let dy1 = (v1.x - v0.x) / len * self.width;

        match self.line_cap {
            LineCap::Butt | LineCap::Square => {
                let (dx2, dy2) = if self.line_cap == LineCap::Square {
                    (dy1, dx1)
                } else {
                    (0.0, 0.0)
                };
                vc.push(PointD::new(v0.x - dx1 - dx2, v0.y + dy1 - dy2));
                vc.push(PointD::new(v0.x + dx1 - dx2, v0.y - dy1 - dy2));
            }
            LineCap::Round => {
                let n = (PI / self.arc_step()) as i32;
                let da = PI / (n + 1) as f64;

                vc.push(PointD::new(v0.x - dx1, v0.y + dy1));
                let mut a1 = dy1.atan2(-dx1) + da;
                for _ in 0..n {
                    vc.push(PointD::new(
                        v0.x + a1.cos() * self.width,
                        v0.y + a1.sin() * self.width,
                    ));
                    a1 += da;
                }
                vc.push(PointD::new(v0.x + dx1, v0.y - dy1));
            }
        }
    }

    /// Join vertices at `v1` between segments `v0→v1` (length `len1`) and
    /// `v1→v2` (length `len2`).
    #[allow(clippy::too_many_arguments)]
    pub fn calc_join(
        &self,
        vc: &mut Vec<PointD>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        len1: f64,
        len2: f64,
    ) {
        let dx1 = self.width * (v1.y - v0.y) / len1;
        let dy1 = self.width * (v1.x - v0.x) / len1;
        let dx2 = self.width * (v2.y - v1.y) / len2;
        let dy2 = self.width * (v2.x - v1.x) / len2;

        vc.clear();

        let cp = cross_product(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
        if cp > 0.0 {
            // Inner side of the corner.
            let limit = (len1.min(len2) / self.width).max(self.inner_miter_limit);
            self.calc_miter(vc, v0, v1, v2, [dx1, dy1, dx2, dy2], limit);
            return;
        }

        let dx = (dx1 + dx2) / 2.0;
        let dy = (dy1 + dy2) / 2.0;
        let dbevel = (dx * dx + dy * dy).sqrt();

        if self.line_join != LineJoin::Miter
            && self.approx_scale * (self.width - dbevel) < self.width_eps
        {
            // Nearly straight: a single point is indistinguishable.
            let p = calc_intersection(
                v0.x + dx1,
                v0.y - dy1,
                v1.x + dx1,
                v1.y - dy1,
                v1.x + dx2,
                v1.y - dy2,
                v2.x + dx2,
                v2.y - dy2,
            )
            .unwrap_or((v1.x + dx1, v1.y - dy1));
            vc.push(PointD::new(p.0, p.1));
            return;
        }

        match self.line_join {
            LineJoin::Miter => {
                self.calc_miter(vc, v0, v1, v2, [dx1, dy1, dx2, dy2], self.miter_limit)
            }
            LineJoin::Round => self.calc_arc(vc, v1.x, v1.y, dx1, -dy1, dx2, -dy2),
            LineJoin::Bevel => {
                vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
                vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn calc_arc(
        &self,
        vc: &mut Vec<PointD>,
        x: f64,
        y: f64,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
    ) {
        let mut a1 = dy1.atan2(dx1);
        let mut a2 = dy2.atan2(dx2);
        if a1 > a2 {
            a2 += 2.0 * PI;
        }
        let n = ((a2 - a1) / self.arc_step()) as i32;
        let da = (a2 - a1) / (n + 1) as f64;

        vc.push(PointD::new(x + dx1, y + dy1));
        a1 += da;
        for _ in 0..n {
            vc.push(PointD::new(x + a1.cos() * self.width, y + a1.sin() * self.width));
            a1 += da;
        }
        vc.push(PointD::new(x + dx2, y + dy2));
    }

    /// Miter point at `v1`, or a bevel when the miter is longer than
    /// `mlimit` half-widths.
    fn calc_miter(
        &self,
        vc: &mut Vec<PointD>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        [dx1, dy1, dx2, dy2]: [f64; 4],
        mlimit: f64,
    ) {
        let lim = self.width * mlimit;

        match calc_intersection(
            v0.x + dx1,
            v0.y - dy1,
            v1.x + dx1,
            v1.y - dy1,
            v1.x + dx2,
            v1.y - dy2,
            v2.x + dx2,
            v2.y - dy2,
        ) {
            Some((xi, yi)) if calc_distance(v1.x, v1.y, xi, yi) <= lim => {
                vc.push(PointD::new(xi, yi));
                return;
            }
            Some(_) => {}
            None => {
                // Collinear segments: the offset point itself is the join
                // unless the path folds back on itself.
                let x2 = v1.x + dx1;
                let y2 = v1.y - dy1;
                if (cross_product(v0.x, v0.y, v1.x, v1.y, x2, y2) < 0.0)
                    == (cross_product(v1.x, v1.y, v2.x, v2.y, x2, y2) < 0.0)
                {
                    vc.push(PointD::new(x2, y2));
                    return;
                }
            }
        }

        vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
        vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
    }
}

// ============================================================================
// StrokeGenerator
// ============================================================================

/// Converts a center-line path into stroke outline polygons.
#[derive(Debug, Clone, Default)]
pub struct StrokeGenerator {
    stroker: MathStroke,
}

impl StrokeGenerator {
    pub fn new(stroker: MathStroke) -> Self {
        Self { stroker }
    }

    pub fn stroker(&self) -> &MathStroke {
        &self.stroker
    }

    /// Stroke every sub-path of `src` into a new path of closed polygons.
    pub fn generate<VS: VertexSource + ?Sized>(&self, src: &mut VS) -> PathStorage {
        let mut out = PathStorage::new();
        let mut seq = VertexSequence::new();
        let mut closed = false;
        let (mut x, mut y) = (0.0, 0.0);

        src.rewind(0);
        loop {
            let cmd = src.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            if is_move_to(cmd) {
                self.emit(&mut seq, closed, &mut out);
                closed = false;
                seq.add(x, y);
            } else if is_vertex(cmd) {
                seq.add(x, y);
            } else if is_end_poly(cmd) {
                closed |= is_close(cmd);
            }
        }
        self.emit(&mut seq, closed, &mut out);
        out
    }

    fn emit(&self, seq: &mut VertexSequence, closed: bool, out: &mut PathStorage) {
        seq.close(closed);
        let closed = closed && seq.len() >= 3;
        if !closed {
            // Closing a two-point run re-measures the closing segment.
            seq.close(false);
        }
        match (closed, seq.len()) {
            (true, _) => self.emit_closed(seq, out),
            (false, n) if n >= 2 => self.emit_open(seq, out),
            _ => {}
        }
        seq.remove_all();
    }

    fn emit_closed(&self, seq: &VertexSequence, out: &mut PathStorage) {
        let n = seq.len();
        let mut vc = Vec::new();

        let mut first = true;
        for i in 0..n {
            let (prev, cur, next) = (seq.prev(i), &seq[i], seq.get(i + 1));
            self.stroker
                .calc_join(&mut vc, prev, cur, next, prev.dist, cur.dist);
            push_points(out, &vc, &mut first);
        }
        out.close_polygon();

        let mut first = true;
        for i in (0..n).rev() {
            let (prev, cur, next) = (seq.prev(i), &seq[i], seq.get(i + 1));
            self.stroker
                .calc_join(&mut vc, next, cur, prev, cur.dist, prev.dist);
            push_points(out, &vc, &mut first);
        }
        out.close_polygon();
    }

    fn emit_open(&self, seq: &VertexSequence, out: &mut PathStorage) {
        let n = seq.len();
        let mut vc = Vec::new();
        let mut first = true;

        self.stroker.calc_cap(&mut vc, &seq[0], &seq[1], seq[0].dist);
        push_points(out, &vc, &mut first);

        for i in 1..n - 1 {
            let (prev, cur, next) = (&seq[i - 1], &seq[i], &seq[i + 1]);
            self.stroker
                .calc_join(&mut vc, prev, cur, next, prev.dist, cur.dist);
            push_points(out, &vc, &mut first);
        }

        self.stroker
            .calc_cap(&mut vc, &seq[n - 1], &seq[n - 2], seq[n - 2].dist);
        push_points(out, &vc, &mut first);

        for i in (1..n - 1).rev() {
            let (prev, cur, next) = (&seq[i - 1], &seq[i], &seq[i + 1]);
            self.stroker
                .calc_join(&mut vc, next, cur, prev, cur.dist, prev.dist);
            push_points(out, &vc, &mut first);
        }
        out.close_polygon();
    }
}

fn push_points(out: &mut PathStorage, pts: &[PointD], first: &mut bool) {
    for p in pts {
        if *first {
            out.move_to(p.x, p.y);
            *first = false;
        } else {
            out.line_to(p.x, p.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{PATH_CMD_MOVE_TO, VertexD};
    use approx::assert_relative_eq;

    fn vd(x: f64, y: f64) -> VertexDist {
        VertexDist::new(x, y)
    }

    fn stroker(width: f64, cap: LineCap, join: LineJoin) -> MathStroke {
        let mut ms = MathStroke::new();
        ms.set_width(width);
        ms.set_line_cap(cap);
        ms.set_line_join(join);
        ms
    }

    fn polygons(path: &PathStorage) -> Vec<Vec<VertexD>> {
        let mut out: Vec<Vec<VertexD>> = Vec::new();
        for v in path.vertices() {
            if v.cmd == PATH_CMD_MOVE_TO {
                out.push(vec![*v]);
            } else if is_vertex(v.cmd) {
                if let Some(last) = out.last_mut() {
                    last.push(*v);
                }
            }
        }
        out
    }

    #[test]
    fn test_butt_cap() {
        let ms = stroker(2.0, LineCap::Butt, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0), &vd(10.0, 0.0), 10.0);
        assert_eq!(vc.len(), 2);
        assert_relative_eq!(vc[0].x, 0.0);
        assert_relative_eq!(vc[0].y, 1.0);
        assert_relative_eq!(vc[1].y, -1.0);
    }

    #[test]
    fn test_square_cap_extends_by_half_width() {
        let ms = stroker(2.0, LineCap::Square, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0), &vd(10.0, 0.0), 10.0);
        assert_relative_eq!(vc[0].x, -1.0);
        assert_relative_eq!(vc[1].x, -1.0);
    }

    #[test]
    fn test_round_cap_stays_on_circle() {
        let ms = stroker(4.0, LineCap::Round, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0), &vd(10.0, 0.0), 10.0);
        assert!(vc.len() > 2);
        for p in &vc {
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 2.0, epsilon = 1e-9);
            assert!(p.x <= 1e-9);
        }
    }

    #[test]
    fn test_miter_join_right_angle() {
        let ms = stroker(2.0, LineCap::Butt, LineJoin::Miter);
        let mut vc = Vec::new();
        // Turning right in y-down space puts the outer corner at (11, -1).
        ms.calc_join(
            &mut vc,
            &vd(0.0, 0.0),
            &vd(10.0, 0.0),
            &vd(10.0, 10.0),
            10.0,
            10.0,
        );
        let outer = stroker(2.0, LineCap::Butt, LineJoin::Miter);
        let mut vc2 = Vec::new();
        outer.calc_join(
            &mut vc2,
            &vd(10.0, 10.0),
            &vd(10.0, 0.0),
            &vd(0.0, 0.0),
            10.0,
            10.0,
        );
        let all: Vec<PointD> = vc.into_iter().chain(vc2).collect();
        assert!(all
            .iter()
            .any(|p| (p.x - 11.0).abs() < 1e-9 && (p.y + 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_sharp_miter_falls_back_to_bevel() {
        let mut vc = Vec::new();
        let (a, b, c) = (vd(0.0, 0.0), vd(100.0, 0.0), vd(0.0, 1.0));
        let len1 = 100.0;
        let len2 = calc_distance(100.0, 0.0, 0.0, 1.0);

        let mut ms = stroker(2.0, LineCap::Butt, LineJoin::Miter);
        ms.calc_join(&mut vc, &a, &b, &c, len1, len2);
        assert_eq!(vc.len(), 2, "bevel expected with the default limit");

        ms.set_miter_limit(1000.0);
        ms.calc_join(&mut vc, &a, &b, &c, len1, len2);
        assert_eq!(vc.len(), 1, "miter expected with a generous limit");
    }

    #[test]
    fn test_open_line_makes_one_polygon() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        let gen = StrokeGenerator::new(stroker(2.0, LineCap::Butt, LineJoin::Miter));
        let out = gen.generate(&mut path);
        let polys = polygons(&out);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 4);
        for v in &polys[0] {
            assert_relative_eq!(v.y.abs(), 1.0);
        }
    }

    #[test]
    fn test_closed_path_makes_two_polygons() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.line_to(0.0, 10.0);
        path.close_polygon();
        let gen = StrokeGenerator::new(stroker(2.0, LineCap::Butt, LineJoin::Miter));
        let polys = polygons(&gen.generate(&mut path));
        assert_eq!(polys.len(), 2);
        let xs: Vec<f64> = polys.iter().flatten().map(|v| v.x).collect();
        assert_relative_eq!(xs.iter().cloned().fold(f64::MAX, f64::min), -1.0);
        assert_relative_eq!(xs.iter().cloned().fold(f64::MIN, f64::max), 11.0);
    }

    #[test]
    fn test_degenerate_subpaths_are_skipped() {
        let mut path = PathStorage::new();
        path.move_to(5.0, 5.0);
        path.move_to(1.0, 1.0);
        path.line_to(1.0, 1.0);
        let gen = StrokeGenerator::default();
        assert!(gen.generate(&mut path).is_empty());
    }
}
