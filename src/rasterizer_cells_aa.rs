//! Anti-aliased cell rasterizer.
//!
//! Converts edges in 24.8 fixed-point coordinates into pixel cells. Each
//! cell carries the net winding contribution (`cover`) and twice the signed
//! area of the edge fragments inside it (`area`); the scanline stage turns
//! those into per-pixel coverage.

use crate::basics::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

const SCALE: i32 = POLY_SUBPIXEL_SCALE as i32;
const MASK: i32 = POLY_SUBPIXEL_MASK as i32;

/// Edges wider than this are split before walking their cells.
const DX_LIMIT: i64 = 16384 << POLY_SUBPIXEL_SHIFT;

/// A pixel cell with accumulated coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub cover: i32,
    pub area: i32,
}

impl Cell {
    const EMPTY: Cell = Cell {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };

    #[inline]
    fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            cover: 0,
            area: 0,
        }
    }
}

/// Edge-to-cell conversion engine.
///
/// Cells accumulate in a flat vector while edges are added. After
/// [`sort_cells`](Self::sort_cells) they are ordered by row then column and
/// can be read back one row at a time.
#[derive(Debug)]
pub struct RasterizerCellsAa {
    cells: Vec<Cell>,
    /// Start offset into `cells` for each row in `min_y..=max_y`, plus an
    /// end sentinel.
    row_starts: Vec<usize>,
    curr: Cell,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    sorted: bool,
}

impl Default for RasterizerCellsAa {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerCellsAa {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            row_starts: Vec::new(),
            curr: Cell::EMPTY,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
            sorted: false,
        }
    }

    pub fn reset(&mut self) {
        self.cells.clear();
        self.row_starts.clear();
        self.curr = Cell::EMPTY;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
        self.sorted = false;
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }
    pub fn min_y(&self) -> i32 {
        self.min_y
    }
    pub fn max_x(&self) -> i32 {
        self.max_x
    }
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Cells of row `y`, ordered by x. Only valid after `sort_cells()`.
    pub fn row_cells(&self, y: i32) -> &[Cell] {
        if !self.sorted || y < self.min_y || y > self.max_y {
            return &[];
        }
        let i = (y - self.min_y) as usize;
        &self.cells[self.row_starts[i]..self.row_starts[i + 1]]
    }

    #[inline]
    fn flush_curr(&mut self) {
        if self.curr.area | self.curr.cover != 0 {
            self.cells.push(self.curr);
        }
    }

    #[inline]
    fn set_curr(&mut self, x: i32, y: i32) {
        if self.curr.x != x || self.curr.y != y {
            self.flush_curr();
            self.curr = Cell::at(x, y);
        }
    }

    #[inline]
    fn accumulate(&mut self, cover: i32, area: i32) {
        self.curr.cover += cover;
        self.curr.area += area;
    }

    fn extend_bounds(&mut self, ex: i32, ey: i32) {
        self.min_x = self.min_x.min(ex);
        self.max_x = self.max_x.max(ex);
        self.min_y = self.min_y.min(ey);
        self.max_y = self.max_y.max(ey);
    }

    /// Walk the cells of row `ey` between subpixel x1 and x2, where y1 and
    /// y2 are the fractional y values inside the row.
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & MASK;
        let fx2 = x2 & MASK;

        if y1 == y2 {
            self.set_curr(ex2, ey);
            return;
        }

        if ex1 == ex2 {
            let delta = y2 - y1;
            self.accumulate(delta, (fx1 + fx2) * delta);
            return;
        }

        let mut dx = x2 as i64 - x1 as i64;
        let (mut p, first, incr) = if dx < 0 {
            dx = -dx;
            (fx1 as i64 * (y2 - y1) as i64, 0, -1)
        } else {
            ((SCALE - fx1) as i64 * (y2 - y1) as i64, SCALE, 1)
        };

        let mut delta = p.div_euclid(dx) as i32;
        let mut modulo = p.rem_euclid(dx);
        self.accumulate(delta, (fx1 + first) * delta);

        let mut ex = ex1 + incr;
        self.set_curr(ex, ey);
        let mut y = y1 + delta;

        if ex != ex2 {
            p = SCALE as i64 * (y2 - y + delta) as i64;
            let lift = p.div_euclid(dx) as i32;
            let rem = p.rem_euclid(dx);
            modulo -= dx;

            while ex != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.accumulate(delta, SCALE * delta);
                y += delta;
                ex += incr;
                self.set_curr(ex, ey);
            }
        }
        delta = y2 - y;
        self.accumulate(delta, (fx2 + SCALE - first) * delta);
    }

    /// Add an edge in 24.8 fixed-point coordinates.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = x2 as i64 - x1 as i64;
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = y2 as i64 - y1 as i64;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & MASK;
        let fy2 = y2 & MASK;

        self.extend_bounds(ex1, ey1);
        self.extend_bounds(ex2, ey2);
        self.set_curr(ex1, ey1);

        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        let (first, incr) = if dy < 0 { (0, -1) } else { (SCALE, 1) };

        if dx == 0 {
            // Vertical edge: every row gets the same area share.
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;
            let mut delta = first - fy1;
            self.accumulate(delta, two_fx * delta);

            ey1 += incr;
            self.set_curr(ex1, ey1);

            delta = first + first - SCALE;
            while ey1 != ey2 {
                self.curr.cover = delta;
                self.curr.area = two_fx * delta;
                ey1 += incr;
                self.set_curr(ex1, ey1);
            }
            delta = fy2 - SCALE + first;
            self.accumulate(delta, two_fx * delta);
            return;
        }

        let dy_abs = dy.abs();
        let mut p = if dy < 0 {
            fy1 as i64 * dx
        } else {
            (SCALE - fy1) as i64 * dx
        };

        let mut delta = p.div_euclid(dy_abs) as i32;
        let mut modulo = p.rem_euclid(dy_abs);

        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);

        ey1 += incr;
        self.set_curr(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = SCALE as i64 * dx;
            let lift = p.div_euclid(dy_abs) as i32;
            let rem = p.rem_euclid(dy_abs);
            modulo -= dy_abs;

            while ey1 != ey2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, SCALE - first, x_to, first);
                x_from = x_to;

                ey1 += incr;
                self.set_curr(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, SCALE - first, x2, fy2);
    }

    /// Order cells by row then column and index the rows.
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.flush_curr();
        self.curr = Cell::EMPTY;
        if self.cells.is_empty() {
            return;
        }

        self.cells.sort_by_key(|c| (c.y, c.x));

        let rows = (self.max_y - self.min_y + 1) as usize;
        self.row_starts.clear();
        self.row_starts.reserve(rows + 1);
        let mut i = 0;
        for y in self.min_y..=self.max_y {
            self.row_starts.push(i);
            while i < self.cells.len() && self.cells[i].y == y {
                i += 1;
            }
        }
        self.row_starts.push(self.cells.len());
        self.sorted = true;
    }
}
