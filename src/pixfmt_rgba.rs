//! RGBA pixel format with source-over alpha blending.
//!
//! Reads and writes RGBA32 pixels (4 bytes per pixel, non-premultiplied
//! alpha). The destination alpha takes part in blending, so shapes drawn on
//! a transparent surface keep transparent surroundings and partially
//! covered edge pixels get partial alpha.

use crate::basics::CoverType;
use crate::color::Rgba8;
use crate::rendering_buffer::{RenderingBuffer, BPP};

// ============================================================================
// PixelFormat trait
// ============================================================================

/// Trait for pixel formats that blend colors into a rendering buffer.
///
/// Coordinates passed to these methods are already clipped by the caller.
pub trait PixelFormat {
    type ColorType;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blend a single pixel at (x, y) with color `c` and coverage `cover`.
    fn blend_pixel(&mut self, x: i32, y: i32, c: &Self::ColorType, cover: CoverType);

    /// Blend `len` pixels at (x, y) with a uniform color and coverage.
    fn blend_hline(&mut self, x: i32, y: i32, len: u32, c: &Self::ColorType, cover: CoverType);

    /// Blend `len` pixels with a uniform color and per-pixel coverage.
    fn blend_solid_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: u32,
        c: &Self::ColorType,
        covers: &[CoverType],
    );

    /// Blend `len` pixels with per-pixel colors. `covers` is either per-pixel
    /// or empty, in which case `cover` applies to every pixel.
    fn blend_color_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: u32,
        colors: &[Self::ColorType],
        covers: &[CoverType],
        cover: CoverType,
    );

    /// Overwrite a single pixel.
    fn copy_pixel(&mut self, x: i32, y: i32, c: &Self::ColorType);

    /// Overwrite `len` pixels at (x, y).
    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Self::ColorType);

    fn pixel(&self, x: i32, y: i32) -> Self::ColorType;
}

// ============================================================================
// PixfmtRgba32
// ============================================================================

/// Pixel format for non-premultiplied RGBA32, component order R, G, B, A.
pub struct PixfmtRgba32<'a> {
    rbuf: &'a mut RenderingBuffer,
}

impl<'a> PixfmtRgba32<'a> {
    pub fn new(rbuf: &'a mut RenderingBuffer) -> Self {
        Self { rbuf }
    }

    pub fn clear(&mut self, c: &Rgba8) {
        self.rbuf.clear(c);
    }

    /// Source-over blend of (cr, cg, cb) at `alpha` onto pixel `p`.
    #[inline]
    fn blend_pix(p: &mut [u8], c: &Rgba8, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            p[0] = c.r;
            p[1] = c.g;
            p[2] = c.b;
            p[3] = 255;
            return;
        }
        let sa = alpha as u32;
        let da = Rgba8::multiply(p[3], 255 - alpha) as u32;
        let out_a = sa + da;
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da + out_a / 2) / out_a) as u8;
        p[0] = mix(c.r, p[0]);
        p[1] = mix(c.g, p[1]);
        p[2] = mix(c.b, p[2]);
        p[3] = out_a.min(255) as u8;
    }

    #[inline]
    fn pix_mut(&mut self, x: i32, y: i32) -> &mut [u8] {
        let off = x as usize * BPP;
        &mut self.rbuf.row_slice_mut(y as u32)[off..off + BPP]
    }
}

impl<'a> PixelFormat for PixfmtRgba32<'a> {
    type ColorType = Rgba8;

    fn width(&self) -> u32 {
        self.rbuf.width()
    }

    fn height(&self) -> u32 {
        self.rbuf.height()
    }

    fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        let off = x as usize * BPP;
        let p = &self.rbuf.row_slice(y as u32)[off..off + BPP];
        Rgba8::new(p[0], p[1], p[2], p[3])
    }

    fn copy_pixel(&mut self, x: i32, y: i32, c: &Rgba8) {
        self.pix_mut(x, y).copy_from_slice(&c.to_array());
    }

    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8) {
        let start = x as usize * BPP;
        let row = self.rbuf.row_slice_mut(y as u32);
        for p in row[start..start + len as usize * BPP].chunks_exact_mut(BPP) {
            p.copy_from_slice(&c.to_array());
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        Self::blend_pix(self.pix_mut(x, y), c, alpha);
    }

    fn blend_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        let start = x as usize * BPP;
        let row = self.rbuf.row_slice_mut(y as u32);
        for p in row[start..start + len as usize * BPP].chunks_exact_mut(BPP) {
            Self::blend_pix(p, c, alpha);
        }
    }

    fn blend_solid_hspan(&mut self, x: i32, y: i32, len: u32, c: &Rgba8, covers: &[CoverType]) {
        let start = x as usize * BPP;
        let row = self.rbuf.row_slice_mut(y as u32);
        let pixels = row[start..start + len as usize * BPP].chunks_exact_mut(BPP);
        for (p, &cov) in pixels.zip(covers) {
            Self::blend_pix(p, c, Rgba8::mult_cover(c.a, cov));
        }
    }

    fn blend_color_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: u32,
        colors: &[Rgba8],
        covers: &[CoverType],
        cover: CoverType,
    ) {
        let start = x as usize * BPP;
        let row = self.rbuf.row_slice_mut(y as u32);
        let pixels = row[start..start + len as usize * BPP].chunks_exact_mut(BPP);
        for (i, (p, c)) in pixels.zip(colors).enumerate() {
            let cov = covers.get(i).copied().unwrap_or(cover);
            Self::blend_pix(p, c, Rgba8::mult_cover(c.a, cov));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let mut rb = RenderingBuffer::new(100, 50);
        let pf = PixfmtRgba32::new(&mut rb);
        assert_eq!(pf.width(), 100);
        assert_eq!(pf.height(), 50);
    }

    #[test]
    fn test_copy_pixel_and_hline() {
        let mut rb = RenderingBuffer::new(20, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        let green = Rgba8::new(0, 255, 0, 255);
        pf.copy_hline(5, 3, 10, &green);
        pf.copy_pixel(0, 0, &Rgba8::new(42, 128, 200, 180));
        for x in 5..15 {
            assert_eq!(pf.pixel(x, 3), green);
        }
        assert_eq!(pf.pixel(4, 3), Rgba8::TRANSPARENT);
        assert_eq!(pf.pixel(0, 0), Rgba8::new(42, 128, 200, 180));
    }

    #[test]
    fn test_blend_opaque_over_transparent() {
        let mut rb = RenderingBuffer::new(10, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        pf.blend_pixel(3, 3, &Rgba8::new(0, 0, 255, 255), 255);
        assert_eq!(pf.pixel(3, 3), Rgba8::new(0, 0, 255, 255));
    }

    #[test]
    fn test_partial_cover_on_transparent_keeps_color() {
        let mut rb = RenderingBuffer::new(10, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        pf.blend_pixel(0, 0, &Rgba8::new(255, 0, 0, 255), 128);
        let p = pf.pixel(0, 0);
        assert_eq!((p.r, p.g, p.b), (255, 0, 0));
        assert!((p.a as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_blend_semi_transparent_over_white() {
        let mut rb = RenderingBuffer::new(10, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        pf.copy_pixel(3, 3, &Rgba8::WHITE);
        pf.blend_pixel(3, 3, &Rgba8::new(255, 0, 0, 255), 128);
        let p = pf.pixel(3, 3);
        assert_eq!(p.r, 255);
        assert!((p.g as i32 - 127).abs() <= 2);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_transparent_color_is_noop() {
        let mut rb = RenderingBuffer::new(4, 4);
        let mut pf = PixfmtRgba32::new(&mut rb);
        pf.copy_pixel(1, 1, &Rgba8::WHITE);
        pf.blend_hline(0, 1, 4, &Rgba8::new(255, 0, 0, 0), 255);
        assert_eq!(pf.pixel(1, 1), Rgba8::WHITE);
        assert_eq!(pf.pixel(0, 1), Rgba8::TRANSPARENT);
    }

    #[test]
    fn test_blend_solid_hspan() {
        let mut rb = RenderingBuffer::new(20, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        let green = Rgba8::new(0, 255, 0, 255);
        let covers = [255u8, 128, 64, 0, 255];
        pf.blend_solid_hspan(5, 3, 5, &green, &covers);
        assert_eq!(pf.pixel(5, 3), green);
        assert_eq!(pf.pixel(8, 3).a, 0);
        assert!(pf.pixel(6, 3).a > pf.pixel(7, 3).a);
    }

    #[test]
    fn test_blend_color_hspan_uniform_cover() {
        let mut rb = RenderingBuffer::new(4, 1);
        let mut pf = PixfmtRgba32::new(&mut rb);
        let colors = [Rgba8::BLACK, Rgba8::WHITE];
        pf.blend_color_hspan(1, 0, 2, &colors, &[], 255);
        assert_eq!(pf.pixel(1, 0), Rgba8::BLACK);
        assert_eq!(pf.pixel(2, 0), Rgba8::WHITE);
        assert_eq!(pf.pixel(3, 0), Rgba8::TRANSPARENT);
    }
}
