//! Shape geometry: circles, regular polygons, stars and bursts.
//!
//! A shape has `points` sectors around its center. Each sector carries one
//! vertex per radius; with two radii the vertices alternate between an
//! outer and an inner ring, giving a star. Angle ratios move each vertex
//! within its sector, in units of one sector.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::basics::PointD;
use crate::error::{Error, Result};
use crate::surface::DrawingSurface;

/// Largest number of outline vertices (points times radii) a shape may have.
pub const MAX_VERTICES: usize = 1 << 16;

/// Number of points of a shape, or a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Points {
    Regular(u32),
    Circle,
}

impl Points {
    pub fn is_circle(&self) -> bool {
        matches!(self, Points::Circle)
    }

    /// Point count of a polygon or star; `None` for a circle.
    pub fn count(&self) -> Option<u32> {
        match self {
            Points::Regular(n) => Some(*n),
            Points::Circle => None,
        }
    }
}

impl From<u32> for Points {
    fn from(n: u32) -> Self {
        Points::Regular(n)
    }
}

/// Validated geometry of a regular shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    points: Points,
    radii: Vec<f64>,
    angle_ratios: Option<Vec<f64>>,
    angle: f64,
}

impl ShapeSpec {
    /// Validate and build a shape.
    ///
    /// Fails when `radii` is empty or holds a non-positive or non-finite
    /// value, when `angle_ratios` does not have one entry per radius, and when
    /// a non-circle shape has fewer than 3 points or more than
    /// [`MAX_VERTICES`] vertices.
    pub fn new(
        points: Points,
        radii: Vec<f64>,
        angle_ratios: Option<Vec<f64>>,
        angle: f64,
    ) -> Result<Self> {
        if radii.is_empty() {
            return Err(Error::EmptyRadii);
        }
        if let Some(&r) = radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(Error::InvalidRadius(r));
        }
        if let Some(ratios) = &angle_ratios {
            if ratios.len() != radii.len() {
                return Err(Error::AngleRatioMismatch {
                    radii: radii.len(),
                    angle_ratios: ratios.len(),
                });
            }
        }
        if let Points::Regular(n) = points {
            if n < 3 {
                return Err(Error::TooFewPoints(n));
            }
            let vertices = (n as usize).checked_mul(radii.len());
            if vertices.map_or(true, |v| v > MAX_VERTICES) {
                return Err(Error::TooManyVertices {
                    points: n,
                    radii: radii.len(),
                    max: MAX_VERTICES,
                });
            }
        }
        Ok(Self {
            points,
            radii,
            angle_ratios,
            angle: if angle.is_finite() { angle } else { 0.0 },
        })
    }

    /// A circle of radius `radius`.
    pub fn circle(radius: f64) -> Result<Self> {
        Self::new(Points::Circle, vec![radius], None, 0.0)
    }

    /// A regular polygon with `points` corners.
    pub fn polygon(points: u32, radius: f64, angle: f64) -> Result<Self> {
        Self::new(Points::Regular(points), vec![radius], None, angle)
    }

    /// A star alternating between `outer` and `inner` radii.
    pub fn star(points: u32, outer: f64, inner: f64, angle: f64) -> Result<Self> {
        Self::new(Points::Regular(points), vec![outer, inner], None, angle)
    }

    pub fn points(&self) -> Points {
        self.points
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn angle_ratios(&self) -> Option<&[f64]> {
        self.angle_ratios.as_deref()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The largest radius.
    pub fn max_radius(&self) -> f64 {
        self.radii.iter().copied().fold(0.0, f64::max)
    }

    /// Angle ratio of radius `j` within a sector.
    fn ratio(&self, j: usize) -> f64 {
        match &self.angle_ratios {
            Some(ratios) => ratios[j],
            None => j as f64 / self.radii.len() as f64,
        }
    }
}

/// Vertices of a polygon or star centered at (cx, cy), in drawing order.
/// Empty for circles.
pub fn outline_vertices(spec: &ShapeSpec, cx: f64, cy: f64) -> Vec<PointD> {
    let Points::Regular(n) = spec.points else {
        return Vec::new();
    };
    let sector = 2.0 * PI / n as f64;
    let mut out = Vec::with_capacity(n as usize * spec.radii.len());
    for i in 0..n {
        let angle0 = i as f64 * sector - FRAC_PI_2 + spec.angle;
        for (j, &r) in spec.radii.iter().enumerate() {
            let a = angle0 + sector * spec.ratio(j);
            out.push(PointD::new(cx + r * a.cos(), cy + r * a.sin()));
        }
    }
    out
}

/// Add the outline of `spec` centered at (cx, cy) to the current path of
/// `surface`. Polygons and stars are closed; a circle is a full arc.
pub fn trace_outline<S: DrawingSurface + ?Sized>(
    spec: &ShapeSpec,
    cx: f64,
    cy: f64,
    surface: &mut S,
) {
    if spec.points.is_circle() {
        surface.arc(cx, cy, spec.radii[0], 0.0, 2.0 * PI, true);
        return;
    }
    for p in outline_vertices(spec, cx, cy) {
        surface.line_to(p.x, p.y);
    }
    surface.close_path();
}
