//! Text-mode drawing surface

use super::surface::{DrawSurface, Point};
use super::{ChartGeometry, PALETTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Background,
    Border,
    Leader,
    /// Palette index of the series that last touched the cell
    Series(u8),
}

impl Cell {
    fn glyph(self) -> char {
        match self {
            Cell::Background => ' ',
            Cell::Border => '#',
            Cell::Leader => '|',
            Cell::Series(index) => PALETTE.get(index as usize).map_or('*', |c| c.glyph()),
        }
    }
}

/// Cell grid of `(width + 1) x height`, row 0 at the top.
#[derive(Debug, Clone)]
pub struct Raster {
    geometry: ChartGeometry,
    cells: Vec<Cell>,
}

impl Raster {
    pub fn new(geometry: ChartGeometry) -> Self {
        let geometry = geometry.sanitized();
        let mut raster = Self { geometry, cells: Vec::new() };
        raster.clear(geometry);
        raster
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.geometry
    }

    fn columns(&self) -> usize {
        self.geometry.columns() as usize
    }

    fn rows(&self) -> usize {
        self.geometry.height as usize
    }

    /// Cell at `(x, y)`, `None` outside the grid.
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        let (x, y) = (x as usize, y as usize);
        if x < self.columns() && y < self.rows() {
            self.cells.get(y * self.columns() + x).copied()
        } else {
            None
        }
    }

    pub fn column(&self, x: u32) -> Vec<Cell> {
        (0..self.geometry.height).filter_map(|y| self.cell(x, y)).collect()
    }

    fn set(&mut self, x: i64, y: i64, cell: Cell) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        let columns = self.columns();
        if x < columns && y < self.rows() {
            self.cells[y * columns + x] = cell;
        }
    }

    fn fill_column(&mut self, x: u32, cell: Cell) {
        for y in 0..self.geometry.height {
            self.set(i64::from(x), i64::from(y), cell);
        }
    }

    /// One line per row, top row first.
    pub fn to_ascii(&self) -> String {
        let columns = self.columns();
        let mut out = String::with_capacity((columns + 1) * self.rows());
        for row in self.cells.chunks(columns) {
            out.extend(row.iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}

impl DrawSurface for Raster {
    fn clear(&mut self, geometry: ChartGeometry) {
        self.geometry = geometry.sanitized();
        let (columns, rows) = (self.columns(), self.rows());
        self.cells = vec![Cell::Background; columns * rows];

        let (right, bottom) = (columns as i64 - 1, rows as i64 - 1);
        for x in 0..=right {
            self.set(x, 0, Cell::Border);
            self.set(x, bottom, Cell::Border);
        }
        for y in 0..=bottom {
            self.set(0, y, Cell::Border);
            self.set(right, y, Cell::Border);
        }
    }

    fn erase_column(&mut self, x: u32) {
        self.fill_column(x, Cell::Background);
    }

    fn leader_column(&mut self, x: u32) {
        self.fill_column(x, Cell::Leader);
    }

    /// Bresenham line. Points off the grid are skipped.
    ///
    /// Rows are clamped to one past either edge first, so an out of range
    /// sample costs at most one column's worth of steps.
    fn segment(&mut self, series: usize, from: Point, to: Point) {
        let cell = Cell::Series(u8::try_from(series).unwrap_or(u8::MAX));
        let bottom = self.rows() as i64;
        let clip = |p: Point| (i64::from(p.x), i64::from(p.y).clamp(-1, bottom));
        let (mut x, mut y) = clip(from);
        let (x1, y1) = clip(to);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x, y, cell);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}
