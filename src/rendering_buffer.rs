//! Rendering buffer: owned, row-oriented RGBA pixel storage.
//!
//! [`RenderingBuffer`] is the mutable target the pixel format writes into
//! while a surface is being drawn. Once drawing is finished it is frozen
//! into a [`Bitmap`], which is what the rest of the crate hands out.

use crate::color::Rgba8;

/// Bytes per RGBA pixel.
pub const BPP: usize = 4;

// ============================================================================
// RenderingBuffer
// ============================================================================

/// A top-down RGBA32 buffer with a stride of `width * 4` bytes.
#[derive(Debug, Clone)]
pub struct RenderingBuffer {
    buf: Vec<u8>,
    width: u32,
    height: u32,
}

impl RenderingBuffer {
    /// Allocate a zeroed (fully transparent) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: vec![0u8; width as usize * height as usize * BPP],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    /// Immutable bytes of row `y`.
    pub fn row_slice(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.buf[start..start + stride]
    }

    /// Mutable bytes of row `y`.
    pub fn row_slice_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.buf[start..start + stride]
    }

    /// Fill every pixel with `c`.
    pub fn clear(&mut self, c: &Rgba8) {
        for px in self.buf.chunks_exact_mut(BPP) {
            px.copy_from_slice(&c.to_array());
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Freeze the buffer into an immutable bitmap.
    pub fn into_bitmap(self) -> Bitmap {
        Bitmap {
            data: self.buf,
            width: self.width,
            height: self.height,
        }
    }
}

// ============================================================================
// Bitmap
// ============================================================================

/// An immutable RGBA8 image, alpha not premultiplied, rows top-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Bitmap {
    /// Wrap raw RGBA bytes. Returns `None` if `data` is not exactly
    /// `width * height * 4` bytes long.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * BPP).then_some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    /// Pixel at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * BPP;
        let p = &self.data[off..off + BPP];
        Some(Rgba8::new(p[0], p[1], p[2], p[3]))
    }

    /// The raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
