//! Line dashing.
//!
//! [`DashPattern`] validates and normalizes a dash array the way the 2D
//! canvas does. [`DashGenerator`] cuts each sub-path of a center line into
//! the open "on" pieces of the pattern, which are then stroked normally.

use crate::basics::{is_close, is_end_poly, is_move_to, is_stop, is_vertex, VertexSource};
use crate::path_storage::PathStorage;
use crate::vertex_sequence::VertexSequence;

/// A normalized, non-empty dash array: alternating dash and gap lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    segments: Vec<f64>,
    total: f64,
}

impl DashPattern {
    /// Normalize a dash array.
    ///
    /// Returns `None` when the array is empty or sums to zero (solid line)
    /// and when any entry is negative or not finite (the array is rejected).
    /// An odd-length array is repeated to make it even.
    pub fn new(segments: &[f64]) -> Option<Self> {
        if !Self::is_valid(segments) {
            return None;
        }
        let mut segments = segments.to_vec();
        if segments.len() % 2 == 1 {
            segments.extend_from_within(..);
        }
        let total: f64 = segments.iter().sum();
        (total > 0.0 && total.is_finite()).then_some(Self { segments, total })
    }

    /// Whether every entry is a finite, non-negative length.
    pub fn is_valid(segments: &[f64]) -> bool {
        segments.iter().all(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn segments(&self) -> &[f64] {
        &self.segments
    }

    /// Length of one full period of the pattern.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Pattern index and remaining length at distance `offset` into the
    /// pattern. Negative offsets wrap.
    fn phase(&self, offset: f64) -> (usize, f64) {
        let mut pos = if offset.is_finite() {
            offset.rem_euclid(self.total)
        } else {
            0.0
        };
        for (i, &len) in self.segments.iter().enumerate() {
            if pos < len {
                return (i, len - pos);
            }
            pos -= len;
        }
        (0, self.segments[0])
    }
}

/// Cuts a path into dashes.
#[derive(Debug, Clone)]
pub struct DashGenerator {
    pattern: DashPattern,
    offset: f64,
}

impl DashGenerator {
    pub fn new(pattern: DashPattern, offset: f64) -> Self {
        Self { pattern, offset }
    }

    /// Dash every sub-path of `src`. The pattern restarts at `offset` at the
    /// beginning of each sub-path.
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
                self.dash_subpath(&mut seq, closed, &mut out);
                closed = false;
                seq.add(x, y);
            } else if is_vertex(cmd) {
                seq.add(x, y);
            } else if is_end_poly(cmd) {
                closed |= is_close(cmd);
            }
        }
        self.dash_subpath(&mut seq, closed, &mut out);
        out
    }

    fn dash_subpath(&self, seq: &mut VertexSequence, closed: bool, out: &mut PathStorage) {
        seq.close(closed);
        let n = seq.len();
        if n >= 2 {
            let segments = if closed { n } else { n - 1 };
            let (mut idx, mut rest) = self.pattern.phase(self.offset);
            let mut drawing = false;

            for i in 0..segments {
                let a = seq[i];
                let b = *seq.get(i + 1);
                let len = a.dist;
                let (ux, uy) = ((b.x - a.x) / len, (b.y - a.y) / len);
                let at = |t: f64| (a.x + ux * t, a.y + uy * t);
                let mut t = 0.0;
                while t < len {
                    let step = rest.min(len - t);
                    if idx % 2 == 0 && step > 0.0 {
                        if !drawing {
                            let (x, y) = at(t);
                            out.move_to(x, y);
                            drawing = true;
                        }
                        let (x, y) = if t + step >= len { (b.x, b.y) } else { at(t + step) };
                        out.line_to(x, y);
                    }
                    t += step;
                    rest -= step;
                    if rest <= 0.0 {
                        drawing = false;
                        idx = (idx + 1) % self.pattern.segments.len();
                        rest = self.pattern.segments[idx];
                    }
                }
            }
        }
        seq.remove_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{VertexD, PATH_CMD_MOVE_TO};
    use approx::assert_relative_eq;

    fn dashes(out: &PathStorage) -> Vec<Vec<(f64, f64)>> {
        let mut result: Vec<Vec<(f64, f64)>> = Vec::new();
        for &VertexD { x, y, cmd } in out.vertices() {
            if cmd == PATH_CMD_MOVE_TO {
                result.push(vec![(x, y)]);
            } else if let Some(last) = result.last_mut() {
                last.push((x, y));
            }
        }
        result
    }

    fn line(x0: f64, x1: f64) -> PathStorage {
        let mut p = PathStorage::new();
        p.move_to(x0, 0.0);
        p.line_to(x1, 0.0);
        p
    }

    #[test]
    fn test_odd_pattern_is_doubled() {
        let p = DashPattern::new(&[5.0, 10.0, 15.0]).unwrap();
        assert_eq!(p.segments(), &[5.0, 10.0, 15.0, 5.0, 10.0, 15.0]);
        assert_relative_eq!(p.total(), 60.0);
    }

    #[test]
    fn test_invalid_and_empty_patterns() {
        assert!(DashPattern::new(&[]).is_none());
        assert!(DashPattern::new(&[0.0, 0.0]).is_none());
        assert!(DashPattern::new(&[5.0, -1.0]).is_none());
        assert!(DashPattern::new(&[5.0, f64::NAN]).is_none());
        assert!(!DashPattern::is_valid(&[f64::INFINITY]));
        assert!(DashPattern::is_valid(&[0.0, 3.0]));
    }

    #[test]
    fn test_simple_dashes() {
        let gen = DashGenerator::new(DashPattern::new(&[4.0, 2.0]).unwrap(), 0.0);
        let d = dashes(&gen.generate(&mut line(0.0, 14.0)));
        assert_eq!(d.len(), 3);
        assert_eq!(d[0], vec![(0.0, 0.0), (4.0, 0.0)]);
        assert_eq!(d[1], vec![(6.0, 0.0), (10.0, 0.0)]);
        assert_eq!(d[2], vec![(12.0, 0.0), (14.0, 0.0)]);
    }

    #[test]
    fn test_offset_shifts_pattern() {
        let gen = DashGenerator::new(DashPattern::new(&[4.0, 2.0]).unwrap(), 3.0);
        let d = dashes(&gen.generate(&mut line(0.0, 10.0)));
        assert_eq!(d[0], vec![(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(d[1], vec![(3.0, 0.0), (7.0, 0.0)]);

        let neg = DashGenerator::new(DashPattern::new(&[4.0, 2.0]).unwrap(), -3.0);
        let d = dashes(&neg.generate(&mut line(0.0, 10.0)));
        // -3 wraps to 3 within a 6-long period.
        assert_eq!(d[0], vec![(0.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_dash_continues_around_corner() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.line_to(3.0, 0.0);
        p.line_to(3.0, 3.0);
        let gen = DashGenerator::new(DashPattern::new(&[5.0, 1.0]).unwrap(), 0.0);
        let d = dashes(&gen.generate(&mut p));
        assert_eq!(d[0], vec![(0.0, 0.0), (3.0, 0.0), (3.0, 2.0)]);
    }

    #[test]
    fn test_closed_path_dashes_closing_segment() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.0, 10.0);
        p.line_to(0.0, 10.0);
        p.close_polygon();
        let gen = DashGenerator::new(DashPattern::new(&[5.0, 5.0]).unwrap(), 0.0);
        let d = dashes(&gen.generate(&mut p));
        assert_eq!(d.len(), 4);
        assert_eq!(d[3], vec![(0.0, 10.0), (0.0, 5.0)]);
    }
}
