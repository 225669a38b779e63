//! Polygon scanline rasterizer with anti-aliasing.
//!
//! Accepts contours (move_to / line_to / close), feeds their edges to the
//! cell rasterizer, and sweeps the sorted cells row by row into a
//! [`Scanline`] with 0..=255 coverage values. No clipping happens here;
//! the renderer clips spans to the surface.

use crate::basics::{
    iround, is_close, is_move_to, is_stop, is_vertex, FillingRule, VertexSource,
    POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT,
};
use crate::rasterizer_cells_aa::RasterizerCellsAa;

const AA_SHIFT: u32 = 8;
const AA_SCALE: i32 = 1 << AA_SHIFT;
const AA_MASK: i32 = AA_SCALE - 1;
const AA_SCALE2: i32 = AA_SCALE * 2;
const AA_MASK2: i32 = AA_SCALE2 - 1;

/// Coordinates are clamped to this many pixels before conversion so that
/// fixed-point arithmetic cannot overflow.
const COORD_LIMIT: f64 = (1 << 22) as f64;

/// Convert a surface coordinate to 24.8 fixed point.
#[inline]
pub fn poly_coord(v: f64) -> i32 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(-COORD_LIMIT, COORD_LIMIT) };
    iround(v * POLY_SUBPIXEL_SCALE as f64)
}

// ============================================================================
// Scanline trait
// ============================================================================

/// Containers that receive coverage data from [`RasterizerScanlineAa::sweep_scanline`].
pub trait Scanline {
    /// Prepare for a new row, clearing all span data.
    fn reset_spans(&mut self);

    /// Add a single cell at `x` with coverage `cover`.
    fn add_cell(&mut self, x: i32, cover: u32);

    /// Add `len` pixels starting at `x`, all with coverage `cover`.
    fn add_span(&mut self, x: i32, len: u32, cover: u32);

    /// Finish the row at `y`.
    fn finalize(&mut self, y: i32);

    fn num_spans(&self) -> u32;

    fn y(&self) -> i32;
}

// ============================================================================
// RasterizerScanlineAa
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
    Closed,
}

/// Anti-aliased polygon rasterizer.
///
/// Contours are closed automatically on the next `move_to` and before
/// sweeping.
#[derive(Debug)]
pub struct RasterizerScanlineAa {
    outline: RasterizerCellsAa,
    filling_rule: FillingRule,
    start_x: i32,
    start_y: i32,
    last_x: i32,
    last_y: i32,
    status: Status,
    scan_y: i32,
}

impl Default for RasterizerScanlineAa {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerScanlineAa {
    pub fn new() -> Self {
        Self {
            outline: RasterizerCellsAa::new(),
            filling_rule: FillingRule::NonZero,
            start_x: 0,
            start_y: 0,
            last_x: 0,
            last_y: 0,
            status: Status::Initial,
            scan_y: 0,
        }
    }

    /// Discard all polygon data.
    pub fn reset(&mut self) {
        self.outline.reset();
        self.status = Status::Initial;
    }

    pub fn filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            self.edge_to(self.start_x, self.start_y);
            self.status = Status::Closed;
        }
    }

    fn edge_to(&mut self, x: i32, y: i32) {
        self.outline.line(self.last_x, self.last_y, x, y);
        self.last_x = x;
        self.last_y = y;
    }

    pub fn move_to_d(&mut self, x: f64, y: f64) {
        if self.outline.sorted() {
            self.reset();
        }
        self.close_polygon();
        self.start_x = poly_coord(x);
        self.start_y = poly_coord(y);
        self.last_x = self.start_x;
        self.last_y = self.start_y;
        self.status = Status::MoveTo;
    }

    pub fn line_to_d(&mut self, x: f64, y: f64) {
        if self.status == Status::Initial {
            self.move_to_d(x, y);
            return;
        }
        self.edge_to(poly_coord(x), poly_coord(y));
        self.status = Status::LineTo;
    }

    /// Dispatch a vertex by its path command.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        if is_move_to(cmd) {
            self.move_to_d(x, y);
        } else if is_vertex(cmd) {
            self.line_to_d(x, y);
        } else if is_close(cmd) {
            self.close_polygon();
        }
    }

    /// Add every vertex of `vs`, starting at sub-path `path_id`.
    pub fn add_path<VS: VertexSource + ?Sized>(&mut self, vs: &mut VS, path_id: u32) {
        let (mut x, mut y) = (0.0, 0.0);
        vs.rewind(path_id);
        if self.outline.sorted() {
            self.reset();
        }
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            self.add_vertex(x, y, cmd);
        }
    }

    pub fn min_x(&self) -> i32 {
        self.outline.min_x()
    }
    pub fn min_y(&self) -> i32 {
        self.outline.min_y()
    }
    pub fn max_x(&self) -> i32 {
        self.outline.max_x()
    }
    pub fn max_y(&self) -> i32 {
        self.outline.max_y()
    }

    /// Sort cells and prepare to sweep. Returns `false` if there is nothing
    /// to render.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        if self.outline.total_cells() == 0 {
            return false;
        }
        self.scan_y = self.outline.min_y();
        true
    }

    /// Coverage for an accumulated area, honoring the filling rule.
    #[inline]
    pub fn calculate_alpha(&self, area: i32) -> u32 {
        let mut cover = (area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT)).abs();
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= AA_MASK2;
            if cover > AA_SCALE {
                cover = AA_SCALE2 - cover;
            }
        }
        cover.min(AA_MASK) as u32
    }

    /// Fill `sl` with the next non-empty row. Returns `false` when every
    /// row has been consumed.
    pub fn sweep_scanline<SL: Scanline>(&mut self, sl: &mut SL) -> bool {
        loop {
            if self.scan_y > self.outline.max_y() {
                return false;
            }
            sl.reset_spans();

            let cells = self.outline.row_cells(self.scan_y);
            let mut cover = 0i32;
            let mut i = 0;
            while i < cells.len() {
                let x = cells[i].x;
                let mut area = 0;
                while i < cells.len() && cells[i].x == x {
                    area += cells[i].area;
                    cover += cells[i].cover;
                    i += 1;
                }

                let mut span_start = x;
                if area != 0 {
                    let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha != 0 {
                        sl.add_cell(x, alpha);
                    }
                    span_start = x + 1;
                }

                if let Some(next) = cells.get(i) {
                    if next.x > span_start {
                        let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                        if alpha != 0 {
                            sl.add_span(span_start, (next.x - span_start) as u32, alpha);
                        }
                    }
                }
            }

            if sl.num_spans() > 0 {
                break;
            }
            self.scan_y += 1;
        }

        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }
}
