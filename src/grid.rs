use std::fmt;

use error_chain::bail;
use itertools::iproduct;

use crate::cells::{CellState, CoordinateSmallVec, GridCoordinate, COMPASS_PRIMARIES};
use crate::errors::*;
use crate::grid_displays::GridDisplay;
use crate::units::{ColumnIndex, Height, RowIndex, Width};

/// Grids smaller than this in either dimension cannot hold a carved interior cell.
pub const MIN_DIMENSION: usize = 3;

/// A rectangular block maze: every cell is either a wall or an open path.
///
/// Cells are stored row-major. All queries taking a coordinate accept any coordinate, those
/// outside the grid behave as a wall.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, path cells: {:?}",
               self.width, self.height, self.path_cells_count())
    }
}

impl Grid {
    /// A grid of the given size with every cell a wall.
    pub fn walled(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w < MIN_DIMENSION || h < MIN_DIMENSION {
            bail!(ErrorKind::InvalidDimensions(w, h));
        }

        Ok(Grid {
            width: w,
            height: h,
            cells: vec![CellState::Wall; w * h],
        })
    }

    /// Build a grid from text rows, `#` marks a wall and anything else a path.
    /// Every row must be as long as the first.
    pub fn from_rows(rows: &[&str]) -> Result<Grid> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Grid::walled(Width(width), Height(height))?;

        for (y, row) in rows.iter().enumerate() {
            let length = row.chars().count();
            if length != width {
                bail!(ErrorKind::RaggedRows(y, length, width));
            }
            for (x, glyph) in row.chars().enumerate() {
                if glyph != '#' {
                    grid.set(GridCoordinate::new(x as isize, y as isize), CellState::Path);
                }
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_in_bounds(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0 && coord.y >= 0 &&
        (coord.x as usize) < self.width && (coord.y as usize) < self.height
    }

    /// Inside the grid and not on the outer ring.
    #[inline]
    pub fn is_interior(&self, coord: GridCoordinate) -> bool {
        coord.x >= 1 && coord.y >= 1 &&
        (coord.x as usize) < self.width - 1 && (coord.y as usize) < self.height - 1
    }

    #[inline]
    pub fn is_boundary(&self, coord: GridCoordinate) -> bool {
        self.is_in_bounds(coord) && !self.is_interior(coord)
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_in_bounds(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> GridCoordinate {
        GridCoordinate::from_row_column_indices(ColumnIndex(index % self.width),
                                                RowIndex(index / self.width))
    }

    /// The state of a cell, out of bounds cells are walls.
    #[inline]
    pub fn state(&self, coord: GridCoordinate) -> CellState {
        self.grid_coordinate_to_index(coord)
            .map_or(CellState::Wall, |index| self.cells[index])
    }

    #[inline]
    pub fn is_path(&self, coord: GridCoordinate) -> bool {
        self.state(coord) == CellState::Path
    }

    #[inline]
    pub fn is_wall(&self, coord: GridCoordinate) -> bool {
        self.state(coord) == CellState::Wall
    }

    /// Set the state of a cell. Returns true if the cell changed, setting an out of bounds cell is
    /// a no-op.
    pub fn set(&mut self, coord: GridCoordinate, state: CellState) -> bool {
        match self.grid_coordinate_to_index(coord) {
            Some(index) if self.cells[index] != state => {
                self.cells[index] = state;
                true
            }
            _ => false,
        }
    }

    /// The four axis aligned unit step neighbours, whether or not they are on the grid.
    pub fn neighbours4(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        COMPASS_PRIMARIES.iter()
                         .map(|dir| coord.offset(*dir))
                         .collect()
    }

    /// The neighbours of a cell that are open paths, in North, South, East, West order.
    pub fn open_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.neighbours4(coord)
            .into_iter()
            .filter(|neighbour| self.is_path(*neighbour))
            .collect()
    }

    pub fn open_neighbour_count(&self, coord: GridCoordinate) -> usize {
        self.neighbours4(coord)
            .iter()
            .filter(|neighbour| self.is_path(**neighbour))
            .count()
    }

    /// A path cell with exactly one open neighbour.
    #[inline]
    pub fn is_dead_end(&self, coord: GridCoordinate) -> bool {
        self.is_path(coord) && self.open_neighbour_count(coord) == 1
    }

    /// Turn the outer ring of the grid into walls.
    pub fn close_boundary(&mut self) {
        let (w, h) = (self.width as isize, self.height as isize);
        for x in 0..w {
            self.set(GridCoordinate::new(x, 0), CellState::Wall);
            self.set(GridCoordinate::new(x, h - 1), CellState::Wall);
        }
        for y in 0..h {
            self.set(GridCoordinate::new(0, y), CellState::Wall);
            self.set(GridCoordinate::new(w - 1, y), CellState::Wall);
        }
    }

    pub fn is_boundary_closed(&self) -> bool {
        self.iter()
            .filter(|coord| self.is_boundary(*coord))
            .all(|coord| self.is_wall(coord))
    }

    pub fn path_cells_count(&self) -> usize {
        self.cells.iter().filter(|state| **state == CellState::Path).count()
    }

    /// Every cell coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = GridCoordinate> {
        let (w, h) = (self.width as isize, self.height as isize);
        iproduct!(0..h, 0..w).map(|(y, x)| GridCoordinate::new(x, y))
    }

    /// Every cell coordinate not on the outer ring, in row-major order.
    pub fn iter_interior(&self) -> impl Iterator<Item = GridCoordinate> {
        let (w, h) = (self.width as isize, self.height as isize);
        iproduct!(1..h - 1, 1..w - 1).map(|(y, x)| GridCoordinate::new(x, y))
    }

    /// The interior cells a column at a time, top to bottom within each column.
    pub fn iter_interior_by_column(&self) -> impl Iterator<Item = GridCoordinate> {
        let (w, h) = (self.width as isize, self.height as isize);
        iproduct!(1..w - 1, 1..h - 1).map(|(x, y)| GridCoordinate::new(x, y))
    }

    pub fn iter_path(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        self.iter().filter(move |coord| self.is_path(*coord))
    }

    /// Render the grid as text with a custom cell body for path cells.
    pub fn display_with<'a>(&'a self, display: &'a dyn GridDisplay) -> GridRender<'a> {
        GridRender {
            grid: self,
            display: Some(display),
        }
    }
}

/// Text rendering of a grid, walls are two full blocks wide and path cells get their body from
/// an optional `GridDisplay`.
pub struct GridRender<'a> {
    grid: &'a Grid,
    display: Option<&'a dyn GridDisplay>,
}

impl<'a> fmt::Display for GridRender<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL: &str = "██";
        const OPEN: &str = "  ";

        let mut output = String::with_capacity(self.grid.size() * 2 + self.grid.height());
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let coord = GridCoordinate::new(x as isize, y as isize);
                if self.grid.is_wall(coord) {
                    output.push_str(WALL);
                } else if let Some(displayer) = self.display {
                    output.push_str(displayer.render_cell_body(coord).as_str());
                } else {
                    output.push_str(OPEN);
                }
            }
            output.push('\n');
        }
        write!(f, "{}", output)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&GridRender { grid: self, display: None }, f)
    }
}
