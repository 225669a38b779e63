//! Error type shared by shape validation, color parsing, and surface
//! allocation.

use thiserror::Error;

/// Errors produced while building or rendering a regular shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("a regular shape needs at least one radius")]
    EmptyRadii,
    #[error("radius must be finite and greater than zero, got {0}")]
    InvalidRadius(f64),
    #[error("angle ratios must match radii: {radii} radii but {angle_ratios} angle ratios")]
    AngleRatioMismatch { radii: usize, angle_ratios: usize },
    #[error("a polygon needs at least 3 points, got {0}")]
    TooFewPoints(u32),
    #[error("{points} points with {radii} radii exceed the {max} vertex limit")]
    TooManyVertices { points: u32, radii: usize, max: usize },
    #[error("cannot allocate a {width}x{height} drawing surface: {reason}")]
    SurfaceAllocation {
        width: f64,
        height: f64,
        reason: String,
    },
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
