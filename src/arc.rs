//! Circular arc vertex generator with 2D-canvas angle semantics.
//!
//! Angles are in radians, measured clockwise from the positive x axis in a
//! y-down space. `anticlockwise` selects decreasing angles. A sweep of at
//! least a full turn in the chosen direction draws the whole circle, and so
//! does the `(0, 2π, anticlockwise)` form that is commonly used to mean
//! "full circle".

use crate::basics::{VertexSource, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PI};

const TWO_PI: f64 = PI * 2.0;

/// Resolve the end angle the way browsers do for `arc(start, end, anticlockwise)`.
pub fn adjust_end_angle(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise && end - start >= TWO_PI {
        start + TWO_PI
    } else if anticlockwise && start - end >= TWO_PI {
        start - TWO_PI
    } else if !anticlockwise && start > end {
        start + (TWO_PI - (start - end) % TWO_PI)
    } else if anticlockwise && start < end {
        start - (TWO_PI - (end - start) % TWO_PI)
    } else {
        end
    }
}

/// Vertices along a circular arc.
///
/// The first vertex is a move_to at the start angle, the last one lies
/// exactly on the end angle.
#[derive(Debug, Clone)]
pub struct Arc {
    x: f64,
    y: f64,
    r: f64,
    start: f64,
    sweep: f64,
    steps: u32,
    step: u32,
    scale: f64,
}

impl Arc {
    pub fn new(x: f64, y: f64, r: f64, start: f64, end: f64, anticlockwise: bool) -> Self {
        let mut arc = Self {
            x,
            y,
            r,
            start,
            sweep: adjust_end_angle(start, end, anticlockwise) - start,
            steps: 0,
            step: 0,
            scale: 1.0,
        };
        arc.compute_steps();
        arc
    }

    /// Approximation scale: the ratio of device pixels to path units.
    pub fn set_approximation_scale(&mut self, s: f64) {
        self.scale = if s > 0.0 && s.is_finite() { s } else { 1.0 };
        self.compute_steps();
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// Number of line segments the arc is split into.
    pub fn num_steps(&self) -> u32 {
        self.steps
    }

    fn compute_steps(&mut self) {
        let r = self.r.abs();
        if r == 0.0 || self.sweep == 0.0 {
            self.steps = 0;
            return;
        }
        let da = (r / (r + 0.125 / self.scale)).acos() * 2.0;
        self.steps = ((self.sweep.abs() / da).ceil() as u32).clamp(1, 4096);
    }

    fn point_at(&self, i: u32) -> (f64, f64) {
        let a = if i == self.steps {
            self.start + self.sweep
        } else {
            self.start + self.sweep * i as f64 / self.steps as f64
        };
        (self.x + a.cos() * self.r, self.y + a.sin() * self.r)
    }
}

impl VertexSource for Arc {
    fn rewind(&mut self, _path_id: u32) {
        self.step = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.step > self.steps {
            return PATH_CMD_STOP;
        }
        let (px, py) = self.point_at(self.step);
        *x = px;
        *y = py;
        let cmd = if self.step == 0 {
            PATH_CMD_MOVE_TO
        } else {
            PATH_CMD_LINE_TO
        };
        self.step += 1;
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::is_stop;
    use approx::assert_relative_eq;

    fn collect(arc: &mut Arc) -> Vec<(f64, f64, u32)> {
        let mut out = Vec::new();
        let (mut x, mut y) = (0.0, 0.0);
        arc.rewind(0);
        loop {
            let cmd = arc.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            out.push((x, y, cmd));
        }
        out
    }

    #[test]
    fn test_adjust_end_angle() {
        assert_relative_eq!(adjust_end_angle(0.0, TWO_PI, true), -TWO_PI);
        assert_relative_eq!(adjust_end_angle(0.0, 3.0 * TWO_PI, false), TWO_PI);
        assert_relative_eq!(adjust_end_angle(1.0, 0.5, false), 1.0 + TWO_PI - 0.5);
        assert_relative_eq!(adjust_end_angle(0.0, PI, false), PI);
        assert_relative_eq!(adjust_end_angle(0.0, PI / 2.0, true), -1.5 * PI);
    }

    #[test]
    fn test_full_circle_anticlockwise() {
        let mut arc = Arc::new(5.0, 5.0, 10.0, 0.0, TWO_PI, true);
        assert_relative_eq!(arc.sweep(), -TWO_PI);
        let pts = collect(&mut arc);
        assert_eq!(pts[0].2, PATH_CMD_MOVE_TO);
        assert!(pts[1..].iter().all(|p| p.2 == PATH_CMD_LINE_TO));
        assert!(pts.len() > 8);
        for (x, y, _) in &pts {
            assert_relative_eq!(((x - 5.0).powi(2) + (y - 5.0).powi(2)).sqrt(), 10.0, epsilon = 1e-9);
        }
        // Anticlockwise in y-down space: the second point is above the first.
        assert!(pts[1].1 < 5.0);
        let last = pts[pts.len() - 1];
        assert_relative_eq!(last.0, 15.0, epsilon = 1e-9);
        assert_relative_eq!(last.1, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quarter_circle_ends_on_end_angle() {
        let mut arc = Arc::new(0.0, 0.0, 10.0, 0.0, PI / 2.0, false);
        let pts = collect(&mut arc);
        let last = pts[pts.len() - 1];
        assert_relative_eq!(last.0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(last.1, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_radius_is_single_point() {
        let mut arc = Arc::new(3.0, 4.0, 0.0, 0.0, PI, false);
        let pts = collect(&mut arc);
        assert_eq!(pts, vec![(3.0, 4.0, PATH_CMD_MOVE_TO)]);
    }

    #[test]
    fn test_approximation_scale_adds_steps() {
        let mut arc = Arc::new(0.0, 0.0, 10.0, 0.0, TWO_PI, false);
        let coarse = arc.num_steps();
        arc.set_approximation_scale(4.0);
        assert!(arc.num_steps() > coarse);
    }
}
