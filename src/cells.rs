use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex};

/// A cell position on a grid. Coordinates are signed so that probing just past the edge of the
/// grid is representable, the grid decides whether such a coordinate is valid.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub x: isize,
    pub y: isize,
}

impl GridCoordinate {
    pub fn new(x: isize, y: isize) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> GridCoordinate {
        GridCoordinate::new(col_index.0 as isize, row_index.0 as isize)
    }

    /// The coordinate one cell away in the given direction.
    #[inline]
    pub fn offset(&self, dir: CompassPrimary) -> GridCoordinate {
        self.offset_by(dir, 1)
    }

    /// The coordinate `steps` cells away in the given direction.
    #[inline]
    pub fn offset_by(&self, dir: CompassPrimary, steps: isize) -> GridCoordinate {
        let (dx, dy) = dir.unit_offset();
        GridCoordinate::new(self.x + dx * steps, self.y + dy * steps)
    }

    /// The cell halfway between two cells on the same row or column, e.g. the wall cell
    /// separating two odd lattice cells.
    #[inline]
    pub fn midpoint(&self, other: GridCoordinate) -> GridCoordinate {
        GridCoordinate::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    #[inline]
    pub fn manhattan_distance(&self, other: GridCoordinate) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Are the two cells exactly one axis aligned unit step apart.
    #[inline]
    pub fn is_adjacent(&self, other: GridCoordinate) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(isize, isize)> for GridCoordinate {
    fn from(x_y_pair: (isize, isize)) -> GridCoordinate {
        GridCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// North is towards y = 0, West is towards x = 0.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

/// Fixed enumeration order used anywhere neighbour order must be deterministic.
pub const COMPASS_PRIMARIES: [CompassPrimary; 4] = [CompassPrimary::North,
                                                    CompassPrimary::South,
                                                    CompassPrimary::East,
                                                    CompassPrimary::West];

impl CompassPrimary {
    #[inline]
    pub fn unit_offset(self) -> (isize, isize) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::South => (0, 1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum CellState {
    Wall,
    Path,
}

impl Default for CellState {
    fn default() -> CellState {
        CellState::Wall
    }
}
