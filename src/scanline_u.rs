//! Unpacked scanline container.
//!
//! Stores one coverage byte per pixel in a flat array; spans index into it.

use crate::rasterizer_scanline_aa::Scanline;

/// A horizontal run of pixels within a scanline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanlineSpan {
    pub x: i32,
    pub len: i32,
    pub cover_offset: usize,
}

/// Scanline with per-pixel u8 coverage.
///
/// Cells must be added with increasing x. Adjacent cells merge into one
/// span.
#[derive(Debug, Default)]
pub struct ScanlineU8 {
    min_x: i32,
    last_x: Option<i32>,
    y: i32,
    covers: Vec<u8>,
    spans: Vec<ScanlineSpan>,
}

impl ScanlineU8 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for scanlines covering `min_x..=max_x`.
    pub fn reset(&mut self, min_x: i32, max_x: i32) {
        let max_len = (max_x - min_x + 2).max(0) as usize;
        if max_len > self.covers.len() {
            self.covers.resize(max_len, 0);
        }
        self.min_x = min_x;
        self.reset_spans();
    }

    pub fn spans(&self) -> &[ScanlineSpan] {
        &self.spans
    }

    /// Coverage values of one span.
    pub fn span_covers(&self, span: &ScanlineSpan) -> &[u8] {
        &self.covers[span.cover_offset..span.cover_offset + span.len as usize]
    }

    fn push(&mut self, xi: usize, x: i32, len: u32) {
        match self.spans.last_mut() {
            Some(span) if self.last_x == Some(xi as i32 - 1) => span.len += len as i32,
            _ => self.spans.push(ScanlineSpan {
                x,
                len: len as i32,
                cover_offset: xi,
            }),
        }
        self.last_x = Some(xi as i32 + len as i32 - 1);
    }
}

impl Scanline for ScanlineU8 {
    fn reset_spans(&mut self) {
        self.last_x = None;
        self.spans.clear();
    }

    fn add_cell(&mut self, x: i32, cover: u32) {
        let xi = (x - self.min_x) as usize;
        self.covers[xi] = cover as u8;
        self.push(xi, x, 1);
    }

    fn add_span(&mut self, x: i32, len: u32, cover: u32) {
        let xi = (x - self.min_x) as usize;
        self.covers[xi..xi + len as usize].fill(cover as u8);
        self.push(xi, x, len);
    }

    fn finalize(&mut self, y: i32) {
        self.y = y;
    }

    fn num_spans(&self) -> u32 {
        self.spans.len() as u32
    }

    fn y(&self) -> i32 {
        self.y
    }
}
