//! Paint sources for fills and strokes.
//!
//! A [`Paint`] is either a solid color or a shared handle to a gradient or a
//! pattern. Non-solid paints are rendered through span generators that map
//! every pixel center back through the inverse of the surface transform.

use std::str::FromStr;
use std::sync::Arc;

use crate::color::{parse_color, Rgba8};
use crate::error::{Error, Result};
use crate::renderer_scanline::SpanGenerator;
use crate::rendering_buffer::Bitmap;
use crate::trans_affine::TransAffine;

/// Number of entries in a gradient color lookup table.
pub const GRADIENT_LUT_SIZE: usize = 256;

// ============================================================================
// Paint
// ============================================================================

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    Pattern(Arc<Pattern>),
    Gradient(Arc<Gradient>),
}

impl Paint {
    /// Parse a CSS color string into a solid paint.
    pub fn parse(s: &str) -> Result<Self> {
        parse_color(s).map(Paint::Solid)
    }

    pub fn solid_color(&self) -> Option<Rgba8> {
        match self {
            Paint::Solid(c) => Some(*c),
            _ => None,
        }
    }

    /// Whether this is a solid color with zero alpha. Gradients and patterns
    /// are never considered transparent.
    pub fn is_transparent_solid(&self) -> bool {
        matches!(self, Paint::Solid(c) if c.is_transparent())
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Rgba8::BLACK)
    }
}

impl From<Rgba8> for Paint {
    fn from(c: Rgba8) -> Self {
        Paint::Solid(c)
    }
}

impl From<[u8; 4]> for Paint {
    fn from(c: [u8; 4]) -> Self {
        Paint::Solid(c.into())
    }
}

impl From<Gradient> for Paint {
    fn from(g: Gradient) -> Self {
        Paint::Gradient(Arc::new(g))
    }
}

impl From<Pattern> for Paint {
    fn from(p: Pattern) -> Self {
        Paint::Pattern(Arc::new(p))
    }
}

impl FromStr for Paint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Paint::parse(s)
    }
}

/// Solid paints serialize as `#rrggbbaa` strings and deserialize from any
/// CSS color. Gradients and patterns are not serializable.
#[cfg(feature = "serde")]
impl serde::Serialize for Paint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Paint::Solid(c) => serializer.serialize_str(&c.to_hex()),
            _ => Err(serde::ser::Error::custom(
                "only solid color paints can be serialized",
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Paint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Paint::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Gradient
// ============================================================================

/// Geometry of a gradient, in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    Radial { cx: f64, cy: f64, r: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba8,
}

/// A linear or radial gradient with color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    kind: GradientKind,
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Gradient along the line from (x0, y0) to (x1, y1).
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: GradientKind::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    /// Gradient from the center (cx, cy) out to radius `r`.
    pub fn radial(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            kind: GradientKind::Radial { cx, cy, r },
            stops: Vec::new(),
        }
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Add a color stop. The offset is clamped to [0, 1]; a non-finite
    /// offset is ignored. Stops with equal offsets keep insertion order.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba8) -> &mut Self {
        if !offset.is_finite() {
            return self;
        }
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        self
    }

    /// Color at gradient position `t`, padding with the end colors.
    pub fn color_at(&self, t: f64) -> Rgba8 {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba8::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let i = self.stops.partition_point(|s| s.offset <= t);
        let (a, b) = (&self.stops[i - 1], &self.stops[i]);
        a.color.gradient(&b.color, (t - a.offset) / (b.offset - a.offset))
    }

    /// Build the color lookup table used while rendering.
    pub fn build_lut(&self) -> Vec<Rgba8> {
        (0..GRADIENT_LUT_SIZE)
            .map(|i| self.color_at(i as f64 / (GRADIENT_LUT_SIZE - 1) as f64))
            .collect()
    }

    /// Gradient position of the user-space point (x, y), or `None` when the
    /// gradient geometry is degenerate and paints nothing.
    pub fn position(&self, x: f64, y: f64) -> Option<f64> {
        match self.kind {
            GradientKind::Linear { x0, y0, x1, y1 } => {
                let (dx, dy) = (x1 - x0, y1 - y0);
                let len2 = dx * dx + dy * dy;
                (len2 > 0.0).then(|| ((x - x0) * dx + (y - y0) * dy) / len2)
            }
            GradientKind::Radial { cx, cy, r } => {
                (r > 0.0).then(|| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / r)
            }
        }
    }
}

/// Span generator for a [`Gradient`].
pub struct SpanGradient<'a> {
    gradient: &'a Gradient,
    lut: Vec<Rgba8>,
    inverse: TransAffine,
}

impl<'a> SpanGradient<'a> {
    /// `inverse` maps device space back to the gradient's user space.
    pub fn new(gradient: &'a Gradient, inverse: TransAffine) -> Self {
        Self {
            gradient,
            lut: Vec::new(),
            inverse,
        }
    }
}

impl SpanGenerator for SpanGradient<'_> {
    type Color = Rgba8;

    fn prepare(&mut self) {
        if self.lut.is_empty() {
            self.lut = self.gradient.build_lut();
        }
    }

    fn generate(&mut self, span: &mut [Rgba8], x: i32, y: i32, len: u32) {
        let max = (GRADIENT_LUT_SIZE - 1) as f64;
        for (i, c) in span.iter_mut().take(len as usize).enumerate() {
            let mut px = x as f64 + i as f64 + 0.5;
            let mut py = y as f64 + 0.5;
            self.inverse.transform(&mut px, &mut py);
            *c = match self.gradient.position(px, py) {
                Some(t) if !self.lut.is_empty() => {
                    self.lut[(t.clamp(0.0, 1.0) * max).round() as usize]
                }
                _ => Rgba8::TRANSPARENT,
            };
        }
    }
}

// ============================================================================
// Pattern
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repetition {
    #[default]
    Repeat,
    NoRepeat,
}

/// An image tiled over the paint area.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    image: Arc<Bitmap>,
    repetition: Repetition,
}

impl Pattern {
    pub fn new(image: impl Into<Arc<Bitmap>>, repetition: Repetition) -> Self {
        Self {
            image: image.into(),
            repetition,
        }
    }

    pub fn image(&self) -> &Arc<Bitmap> {
        &self.image
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// Nearest pattern pixel at user-space point (x, y).
    pub fn sample(&self, x: f64, y: f64) -> Rgba8 {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        if w == 0 || h == 0 || !x.is_finite() || !y.is_finite() {
            return Rgba8::TRANSPARENT;
        }
        let (mut ix, mut iy) = (x.floor() as i64, y.floor() as i64);
        match self.repetition {
            Repetition::Repeat => {
                ix = ix.rem_euclid(w);
                iy = iy.rem_euclid(h);
            }
            Repetition::NoRepeat => {
                if ix < 0 || iy < 0 || ix >= w || iy >= h {
                    return Rgba8::TRANSPARENT;
                }
            }
        }
        self.image
            .pixel(ix as u32, iy as u32)
            .unwrap_or(Rgba8::TRANSPARENT)
    }
}

/// Span generator for a [`Pattern`].
pub struct SpanPattern<'a> {
    pattern: &'a Pattern,
    inverse: TransAffine,
}

impl<'a> SpanPattern<'a> {
    pub fn new(pattern: &'a Pattern, inverse: TransAffine) -> Self {
        Self { pattern, inverse }
    }
}

impl SpanGenerator for SpanPattern<'_> {
    type Color = Rgba8;

    fn generate(&mut self, span: &mut [Rgba8], x: i32, y: i32, len: u32) {
        for (i, c) in span.iter_mut().take(len as usize).enumerate() {
            let mut px = x as f64 + i as f64 + 0.5;
            let mut py = y as f64 + 0.5;
            self.inverse.transform(&mut px, &mut py);
            *c = self.pattern.sample(px, py);
        }
    }
}
