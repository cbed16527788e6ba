use crate::cells::{CoordinateSmallVec, GridCoordinate};
use crate::pathing::{Distances, Path};
use crate::utils::FnvHashSet;

pub trait GridDisplay {
    /// Render the contents of an open grid cell as text.
    /// The String should be 2 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("  ")
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // right align, padding 2, lowercase hexadecimal, wrapping so wide mazes stay aligned
            format!("{:>2x}", d % 0x100)
        } else {
            String::from("  ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
    start: Option<GridCoordinate>,
    end: Option<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &Path) -> Self {
        PathDisplay {
            on_path_coordinates: path.iter().cloned().collect(),
            start: path.start(),
            end: path.goal(),
        }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if Some(coord) == self.start {
            String::from("S ")
        } else if Some(coord) == self.end {
            String::from("E ")
        } else if self.on_path_coordinates.contains(&coord) {
            String::from(". ")
        } else {
            String::from("  ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {

        let contains_coordinate =
            |coordinates: &CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            String::from("S ")

        } else if contains_coordinate(&self.end_coordinates) {

            String::from("E ")

        } else {
            String::from("  ")
        }
    }
}
