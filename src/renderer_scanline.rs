//! Scanline rendering drivers.
//!
//! Tie the pipeline together: sweep the rasterizer into a scanline and blend
//! each span through the base renderer, either in one solid color or with
//! per-pixel colors from a [`SpanGenerator`].

use crate::pixfmt_rgba::PixelFormat;
use crate::rasterizer_scanline_aa::{RasterizerScanlineAa, Scanline};
use crate::renderer_base::RendererBase;
use crate::scanline_u::ScanlineU8;

/// Render every scanline of `ras` in a single color.
pub fn render_scanlines_aa_solid<PF: PixelFormat>(
    ras: &mut RasterizerScanlineAa,
    sl: &mut ScanlineU8,
    ren: &mut RendererBase<PF>,
    color: &PF::ColorType,
) {
    if !ras.rewind_scanlines() {
        return;
    }
    sl.reset(ras.min_x(), ras.max_x());
    while ras.sweep_scanline(sl) {
        let y = sl.y();
        for span in sl.spans() {
            ren.blend_solid_hspan(span.x, y, span.len, color, sl.span_covers(span));
        }
    }
}

// ============================================================================
// SpanGenerator
// ============================================================================

/// Produces per-pixel colors for a span of a scanline.
pub trait SpanGenerator {
    type Color;

    /// Called once before rendering begins.
    fn prepare(&mut self) {}

    /// Fill `span[..len]` with colors for pixels `x..x + len` on row `y`.
    fn generate(&mut self, span: &mut [Self::Color], x: i32, y: i32, len: u32);
}

/// Render every scanline of `ras` with colors from `span_gen`.
pub fn render_scanlines_aa<PF, SG>(
    ras: &mut RasterizerScanlineAa,
    sl: &mut ScanlineU8,
    ren: &mut RendererBase<PF>,
    span_gen: &mut SG,
) where
    PF: PixelFormat,
    PF::ColorType: Default + Clone,
    SG: SpanGenerator<Color = PF::ColorType>,
{
    if !ras.rewind_scanlines() {
        return;
    }
    sl.reset(ras.min_x(), ras.max_x());
    span_gen.prepare();

    let mut colors: Vec<PF::ColorType> = Vec::new();
    while ras.sweep_scanline(sl) {
        let y = sl.y();
        for span in sl.spans() {
            let len = span.len as usize;
            if colors.len() < len {
                colors.resize(len, PF::ColorType::default());
            }
            span_gen.generate(&mut colors[..len], span.x, y, len as u32);
            ren.blend_color_hspan(span.x, y, span.len, &colors[..len], sl.span_covers(span), 0);
        }
    }
}
