//! Base renderer with clipping.
//!
//! Wraps a pixel format and clips every span to the buffer before handing
//! it down, so the rasterizer may produce cells outside the surface.

use crate::basics::CoverType;
use crate::pixfmt_rgba::PixelFormat;

/// Clip-and-delegate renderer over a pixel format.
pub struct RendererBase<PF: PixelFormat> {
    ren: PF,
    xmax: i32,
    ymax: i32,
}

impl<PF: PixelFormat> RendererBase<PF> {
    pub fn new(ren: PF) -> Self {
        let xmax = ren.width() as i32 - 1;
        let ymax = ren.height() as i32 - 1;
        Self { ren, xmax, ymax }
    }

    pub fn width(&self) -> u32 {
        self.ren.width()
    }

    pub fn height(&self) -> u32 {
        self.ren.height()
    }

    #[inline]
    pub fn inbox(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x <= self.xmax && y <= self.ymax
    }

    pub fn ren(&self) -> &PF {
        &self.ren
    }

    pub fn clear(&mut self, c: &PF::ColorType) {
        let w = self.ren.width();
        for y in 0..=self.ymax {
            self.ren.copy_hline(0, y, w, c);
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> PF::ColorType
    where
        PF::ColorType: Default,
    {
        if self.inbox(x, y) {
            self.ren.pixel(x, y)
        } else {
            PF::ColorType::default()
        }
    }

    /// Blend a horizontal line (clipped). `x1`, `x2` are inclusive.
    pub fn blend_hline(
        &mut self,
        mut x1: i32,
        y: i32,
        mut x2: i32,
        c: &PF::ColorType,
        cover: CoverType,
    ) {
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        if y > self.ymax || y < 0 || x1 > self.xmax || x2 < 0 {
            return;
        }
        x1 = x1.max(0);
        x2 = x2.min(self.xmax);
        self.ren.blend_hline(x1, y, (x2 - x1 + 1) as u32, c, cover);
    }

    /// Clip `[x, x + len)` on row `y`; returns the new start, length and
    /// the number of leading entries dropped.
    fn clip_span(&self, x: i32, y: i32, len: i32) -> Option<(i32, i32, usize)> {
        if y > self.ymax || y < 0 {
            return None;
        }
        let (mut x, mut len, mut skipped) = (x, len, 0usize);
        if x < 0 {
            len += x;
            skipped = (-x) as usize;
            x = 0;
        }
        if x + len > self.xmax + 1 {
            len = self.xmax - x + 1;
        }
        (len > 0).then_some((x, len, skipped))
    }

    /// Blend a solid span with per-pixel coverage (clipped).
    pub fn blend_solid_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: i32,
        c: &PF::ColorType,
        covers: &[CoverType],
    ) {
        if let Some((x, len, skipped)) = self.clip_span(x, y, len) {
            self.ren
                .blend_solid_hspan(x, y, len as u32, c, &covers[skipped..]);
        }
    }

    /// Blend a span of per-pixel colors (clipped).
    ///
    /// If `covers` is empty, all pixels use the uniform `cover` value.
    pub fn blend_color_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: i32,
        colors: &[PF::ColorType],
        covers: &[CoverType],
        cover: CoverType,
    ) {
        if let Some((x, len, skipped)) = self.clip_span(x, y, len) {
            let covers = if covers.is_empty() {
                covers
            } else {
                &covers[skipped..]
            };
            self.ren
                .blend_color_hspan(x, y, len as u32, &colors[skipped..], covers, cover);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
