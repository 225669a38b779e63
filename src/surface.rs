//! Drawing surfaces.
//!
//! [`SurfaceFactory`] and [`DrawingSurface`] describe the 2D immediate-mode
//! context the shape renderer draws on. [`RasterSurface`] is the built-in
//! implementation: paths are kept in device space and filled or stroked
//! through the anti-aliased scanline pipeline into an RGBA buffer.

use log::debug;

use crate::arc::Arc;
use crate::basics::{is_move_to, is_stop, FillingRule, VertexSource};
use crate::color::Rgba8;
use crate::dash::{DashGenerator, DashPattern};
use crate::error::{Error, Result};
use crate::paint::{Paint, SpanGradient, SpanPattern};
use crate::path_storage::PathStorage;
use crate::pixfmt_rgba::PixfmtRgba32;
use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
use crate::renderer_base::RendererBase;
use crate::renderer_scanline::{render_scanlines_aa, render_scanlines_aa_solid};
use crate::rendering_buffer::{Bitmap, RenderingBuffer};
use crate::scanline_u::ScanlineU8;
use crate::stroke::{LineCap, LineJoin, MathStroke, StrokeGenerator};
use crate::trans_affine::TransAffine;

/// Largest side, in pixels, the default factory will allocate.
pub const DEFAULT_MAX_SIDE: u32 = 8192;

// ============================================================================
// Traits
// ============================================================================

/// Allocates drawing surfaces.
pub trait SurfaceFactory {
    type Surface: DrawingSurface;

    /// Allocate a surface of at least `width` x `height` pixels. The realized
    /// size may be rounded and must be read back from the surface.
    fn create_surface(&self, width: f64, height: f64) -> Result<Self::Surface>;
}

/// A 2D immediate-mode drawing context over a pixel buffer.
///
/// Path coordinates are transformed by the current transform when they are
/// added. Fills use the nonzero winding rule.
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn reset_transform(&mut self);
    fn set_transform(&mut self, transform: TransAffine);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    fn close_path(&mut self);

    fn set_fill_style(&mut self, paint: Paint);
    fn fill(&mut self);

    fn set_stroke_style(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_miter_limit(&mut self, limit: f64);

    /// Whether `set_line_dash` has any effect.
    fn supports_line_dash(&self) -> bool {
        false
    }
    fn set_line_dash(&mut self, _segments: &[f64]) {}
    fn set_line_dash_offset(&mut self, _offset: f64) {}

    fn stroke(&mut self);

    /// Finish drawing and take the pixels.
    fn into_bitmap(self) -> Bitmap;
}

// ============================================================================
// RasterSurfaceFactory
// ============================================================================

/// Factory for [`RasterSurface`]s. Requested sizes are rounded up to whole
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSurfaceFactory {
    pub max_side: u32,
}

impl Default for RasterSurfaceFactory {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
        }
    }
}

impl RasterSurfaceFactory {
    pub fn new(max_side: u32) -> Self {
        Self { max_side }
    }

    /// Whole-pixel side length for a requested size.
    fn realize(&self, side: f64, width: f64, height: f64) -> Result<u32> {
        let fail = |reason: String| Error::SurfaceAllocation {
            width,
            height,
            reason,
        };
        if !side.is_finite() {
            return Err(fail(format!("size {side} is not finite")));
        }
        if side <= 0.0 {
            return Err(fail(format!("size {side} is not positive")));
        }
        let px = side.ceil();
        if px > self.max_side as f64 {
            return Err(fail(format!("size {px} exceeds the limit of {}", self.max_side)));
        }
        Ok(px as u32)
    }
}

impl SurfaceFactory for RasterSurfaceFactory {
    type Surface = RasterSurface;

    fn create_surface(&self, width: f64, height: f64) -> Result<RasterSurface> {
        let w = self.realize(width, width, height)?;
        let h = self.realize(height, width, height)?;
        debug!("allocating {w}x{h} raster surface for requested {width}x{height}");
        Ok(RasterSurface::new(w, h))
    }
}

// ============================================================================
// RasterSurface
// ============================================================================

/// CPU drawing surface backed by an RGBA buffer, initially transparent.
pub struct RasterSurface {
    buffer: RenderingBuffer,
    ras: RasterizerScanlineAa,
    sl: ScanlineU8,
    path: PathStorage,
    transform: TransAffine,
    fill_style: Paint,
    stroke_style: Paint,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
    line_dash: Option<DashPattern>,
    line_dash_offset: f64,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RenderingBuffer::new(width, height),
            ras: RasterizerScanlineAa::new(),
            sl: ScanlineU8::new(),
            path: PathStorage::new(),
            transform: TransAffine::new(),
            fill_style: Paint::default(),
            stroke_style: Paint::default(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            line_dash: None,
            line_dash_offset: 0.0,
        }
    }

    pub fn transform(&self) -> &TransAffine {
        &self.transform
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    /// The active dash segments, normalized to even length. Empty when
    /// drawing solid lines.
    pub fn line_dash(&self) -> &[f64] {
        self.line_dash.as_ref().map(DashPattern::segments).unwrap_or(&[])
    }

    pub fn line_dash_offset(&self) -> f64 {
        self.line_dash_offset
    }

    /// The current path in device coordinates.
    pub fn path(&self) -> &PathStorage {
        &self.path
    }

    /// Pixel at (x, y), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.buffer.width() || y >= self.buffer.height() {
            return None;
        }
        let p = &self.buffer.row_slice(y)[x as usize * 4..x as usize * 4 + 4];
        Some(Rgba8::new(p[0], p[1], p[2], p[3]))
    }

    fn device_point(&self, x: f64, y: f64) -> (f64, f64) {
        let (mut x, mut y) = (x, y);
        self.transform.transform(&mut x, &mut y);
        (x, y)
    }
}

/// Rasterize `vs` with the nonzero rule and blend it into `buffer` with
/// `paint`.
fn paint_path<VS: VertexSource + ?Sized>(
    buffer: &mut RenderingBuffer,
    ras: &mut RasterizerScanlineAa,
    sl: &mut ScanlineU8,
    vs: &mut VS,
    paint: &Paint,
    transform: &TransAffine,
) {
    ras.reset();
    ras.filling_rule(FillingRule::NonZero);
    ras.add_path(vs, 0);

    let mut ren = RendererBase::new(PixfmtRgba32::new(buffer));
    match paint {
        Paint::Solid(c) => render_scanlines_aa_solid(ras, sl, &mut ren, c),
        Paint::Gradient(g) => {
            let mut inverse = *transform;
            if inverse.invert() {
                render_scanlines_aa(ras, sl, &mut ren, &mut SpanGradient::new(g, inverse));
            }
        }
        Paint::Pattern(p) => {
            let mut inverse = *transform;
            if inverse.invert() {
                render_scanlines_aa(ras, sl, &mut ren, &mut SpanPattern::new(p, inverse));
            }
        }
    }
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn reset_transform(&mut self) {
        self.transform = TransAffine::new();
    }

    fn set_transform(&mut self, transform: TransAffine) {
        self.transform = transform;
    }

    fn begin_path(&mut self) {
        self.path.remove_all();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.device_point(x, y);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.device_point(x, y);
        self.path.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        if radius < 0.0 || !radius.is_finite() {
            return;
        }
        let mut arc = Arc::new(x, y, radius, start, end, anticlockwise);
        arc.set_approximation_scale(self.transform.get_scale());

        let mut device = PathStorage::new();
        let (mut vx, mut vy) = (0.0, 0.0);
        arc.rewind(0);
        loop {
            let cmd = arc.vertex(&mut vx, &mut vy);
            if is_stop(cmd) {
                break;
            }
            let (dx, dy) = self.device_point(vx, vy);
            if is_move_to(cmd) {
                device.move_to(dx, dy);
            } else {
                device.line_to(dx, dy);
            }
        }
        self.path.join_path(&mut device, 0);
    }

    fn close_path(&mut self) {
        self.path.close_polygon();
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.fill_style = paint;
    }

    fn fill(&mut self) {
        paint_path(
            &mut self.buffer,
            &mut self.ras,
            &mut self.sl,
            &mut self.path,
            &self.fill_style,
            &self.transform,
        );
    }

    fn set_stroke_style(&mut self, paint: Paint) {
        self.stroke_style = paint;
    }

    /// Zero, negative and non-finite widths are ignored.
    fn set_line_width(&mut self, width: f64) {
        if width > 0.0 && width.is_finite() {
            self.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f64) {
        if limit > 0.0 && limit.is_finite() {
            self.miter_limit = limit;
        }
    }

    fn supports_line_dash(&self) -> bool {
        true
    }

    /// Patterns with negative or non-finite entries are ignored; an empty or
    /// all-zero pattern turns dashing off.
    fn set_line_dash(&mut self, segments: &[f64]) {
        if !DashPattern::is_valid(segments) {
            debug!("ignoring invalid line dash {segments:?}");
            return;
        }
        self.line_dash = DashPattern::new(segments);
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.line_dash_offset = offset;
        }
    }

    fn stroke(&mut self) {
        let scale = self.transform.get_scale();
        let mut stroker = MathStroke::new();
        stroker.set_width(self.line_width * scale);
        stroker.set_line_cap(self.line_cap);
        stroker.set_line_join(self.line_join);
        stroker.set_miter_limit(self.miter_limit);
        let generator = StrokeGenerator::new(stroker);

        let mut outline = match &self.line_dash {
            Some(pattern) => {
                let scaled: Vec<f64> = pattern.segments().iter().map(|s| s * scale).collect();
                match DashPattern::new(&scaled) {
                    Some(p) => {
                        let mut dashed = DashGenerator::new(p, self.line_dash_offset * scale)
                            .generate(&mut self.path);
                        generator.generate(&mut dashed)
                    }
                    None => generator.generate(&mut self.path),
                }
            }
            None => generator.generate(&mut self.path),
        };

        paint_path(
            &mut self.buffer,
            &mut self.ras,
            &mut self.sl,
            &mut outline,
            &self.stroke_style,
            &self.transform,
        );
    }

    fn into_bitmap(self) -> Bitmap {
        self.buffer.into_bitmap()
    }
}
