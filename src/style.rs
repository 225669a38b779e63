//! Fill and stroke descriptors, their defaults, and the resolved render
//! options derived from them.

use crate::color::Rgba8;
use crate::paint::Paint;
use crate::shape::ShapeSpec;
use crate::stroke::{LineCap, LineJoin};

pub const DEFAULT_STROKE_COLOR: Rgba8 = Rgba8::BLACK;
pub const DEFAULT_FILL_COLOR: Rgba8 = Rgba8::BLACK;
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
pub const DEFAULT_LINE_CAP: LineCap = LineCap::Round;
pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Round;
pub const DEFAULT_MITER_LIMIT: f64 = 10.0;
pub const DEFAULT_LINE_DASH_OFFSET: f64 = 0.0;

/// Stroke descriptor. Every unset field falls back to its default when
/// the shape is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrokeSpec {
    pub color: Option<Paint>,
    pub width: Option<f64>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub miter_limit: Option<f64>,
    pub line_dash: Option<Vec<f64>>,
    pub line_dash_offset: Option<f64>,
}

impl StrokeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<Paint>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = Some(cap);
        self
    }

    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = Some(join);
        self
    }

    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = Some(limit);
        self
    }

    pub fn with_line_dash(mut self, dash: Vec<f64>, offset: f64) -> Self {
        self.line_dash = Some(dash);
        self.line_dash_offset = Some(offset);
        self
    }
}

/// Fill descriptor. A missing color fills with [`DEFAULT_FILL_COLOR`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FillSpec {
    pub color: Option<Paint>,
}

impl FillSpec {
    pub fn new(color: impl Into<Paint>) -> Self {
        Self {
            color: Some(color.into()),
        }
    }

    /// The paint to fill with.
    pub fn paint(&self) -> Paint {
        self.color
            .clone()
            .unwrap_or(Paint::Solid(DEFAULT_FILL_COLOR))
    }

    /// Whether the fill is a solid color with zero alpha. A missing color
    /// counts as opaque.
    pub fn is_transparent(&self) -> bool {
        self.color.as_ref().is_some_and(Paint::is_transparent_solid)
    }
}

/// Stroke parameters with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStroke {
    pub paint: Paint,
    pub width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Option<Vec<f64>>,
    pub line_dash_offset: f64,
}

impl ResolvedStroke {
    pub fn resolve(stroke: &StrokeSpec) -> Self {
        Self {
            paint: stroke
                .color
                .clone()
                .unwrap_or(Paint::Solid(DEFAULT_STROKE_COLOR)),
            width: stroke.width.unwrap_or(DEFAULT_LINE_WIDTH),
            line_cap: stroke.line_cap.unwrap_or(DEFAULT_LINE_CAP),
            line_join: stroke.line_join.unwrap_or(DEFAULT_LINE_JOIN),
            miter_limit: stroke.miter_limit.unwrap_or(DEFAULT_MITER_LIMIT),
            line_dash: stroke.line_dash.clone(),
            line_dash_offset: stroke.line_dash_offset.unwrap_or(DEFAULT_LINE_DASH_OFFSET),
        }
    }
}

/// Everything needed to draw one shape: the resolved stroke (if any) and
/// the requested surface side length.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub stroke: Option<ResolvedStroke>,
    pub stroke_width: f64,
    pub size: f64,
}

impl RenderOptions {
    pub fn resolve(spec: &ShapeSpec, stroke: Option<&StrokeSpec>) -> Self {
        let stroke = stroke.map(ResolvedStroke::resolve);
        let stroke_width = stroke.as_ref().map_or(0.0, |s| s.width);
        Self {
            size: 2.0 * (spec.max_radius() + stroke_width) + 1.0,
            stroke,
            stroke_width,
        }
    }
}
