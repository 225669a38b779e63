//! Geometric math utilities used by the stroke and dash generators.

/// Points closer than this are treated as coincident.
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

/// Denominators below this make two lines parallel for intersection purposes.
pub const INTERSECTION_EPSILON: f64 = 1.0e-30;

/// Cross product of (x2-x1, y2-y1) and (x-x2, y-y2). The sign tells which
/// side of the directed line (x1,y1)→(x2,y2) the point (x,y) lies on.
#[inline]
pub fn cross_product(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    (x - x2) * (y2 - y1) - (y - y2) * (x2 - x1)
}

#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Intersection of the infinite lines AB and CD, or `None` when parallel.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn calc_intersection(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    dx: f64,
    dy: f64,
) -> Option<(f64, f64)> {
    let num = (ay - cy) * (dx - cx) - (ax - cx) * (dy - cy);
    let den = (bx - ax) * (dy - cy) - (by - ay) * (dx - cx);
    if den.abs() < INTERSECTION_EPSILON {
        return None;
    }
    let r = num / den;
    Some((ax + r * (bx - ax), ay + r * (by - ay)))
}
