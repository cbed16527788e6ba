use std::cmp;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use rand::seq::SliceRandom;
use serde_derive::{Deserialize, Serialize};

use crate::cells::{CellState, GridCoordinate, COMPASS_PRIMARIES};
use crate::errors::*;
use crate::events::{EventSink, MazeEvent, NoEvents};
use crate::grid::Grid;
use crate::utils::MazeRng;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefineMode {
    /// Prune dead end spurs back to the nearest junction.
    Close,
    /// Knock through the wall at the end of a dead end into a neighbouring corridor.
    Open,
    /// Close a dead end, then open one of the dead ends left behind.
    CloseThenOpen,
}

impl Default for RefineMode {
    fn default() -> RefineMode {
        RefineMode::Close
    }
}

impl RefineMode {
    pub fn all() -> [RefineMode; 3] {
        [RefineMode::Close, RefineMode::Open, RefineMode::CloseThenOpen]
    }
}

impl FromStr for RefineMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<RefineMode> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Ok(RefineMode::Close),
            "open" => Ok(RefineMode::Open),
            "close-then-open" | "closethenopen" | "close_then_open" => Ok(RefineMode::CloseThenOpen),
            _ => Err(ErrorKind::UnknownSetting("refine mode", s.to_string()).into()),
        }
    }
}

impl fmt::Display for RefineMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            RefineMode::Close => "close",
            RefineMode::Open => "open",
            RefineMode::CloseThenOpen => "close-then-open",
        };
        write!(f, "{}", name)
    }
}

/// Interior dead ends in row major order, skipping any cell in `exclude`.
pub fn dead_ends(grid: &Grid, exclude: &[GridCoordinate]) -> Vec<GridCoordinate> {
    grid.iter_interior()
        .filter(|coord| grid.is_dead_end(*coord) && !exclude.contains(coord))
        .collect()
}

/// Interior dead ends a column at a time, skipping any cell in `exclude`.
pub fn dead_ends_by_column(grid: &Grid, exclude: &[GridCoordinate]) -> Vec<GridCoordinate> {
    grid.iter_interior_by_column()
        .filter(|coord| grid.is_dead_end(*coord) && !exclude.contains(coord))
        .collect()
}

/// Wall up a dead end and keep walking back along the corridor while each cell left behind is
/// itself a dead end. The walk never walls a `protected` cell.
///
/// Returns the number of cells walled.
pub fn close_dead_end(grid: &mut Grid,
                      from: GridCoordinate,
                      protected: &[GridCoordinate],
                      events: &mut dyn EventSink)
                      -> usize {
    let mut current = from;
    let mut walled = 0;

    while !protected.contains(&current) && grid.is_dead_end(current) {
        let next = match grid.open_neighbours(current).first() {
            Some(next) => *next,
            None => break,
        };
        events.record(MazeEvent::Visited(current));
        if grid.set(current, CellState::Wall) {
            events.record(MazeEvent::Walled(current));
            walled += 1;
        }
        trace!("closed {}", current);
        current = next;
    }
    walled
}

/// Walls next to `coord` that would join it to another corridor if carved.
fn openings(grid: &Grid, coord: GridCoordinate) -> Vec<GridCoordinate> {
    COMPASS_PRIMARIES.iter()
                     .filter_map(|dir| {
                         let wall = coord.offset(*dir);
                         let beyond = coord.offset_by(*dir, 2);
                         if grid.is_interior(wall) && grid.is_wall(wall) && grid.is_path(beyond) {
                             Some(wall)
                         } else {
                             None
                         }
                     })
                     .collect()
}

/// Carve a randomly chosen opening from a dead end into a neighbouring corridor, repeating from
/// the new opening while it is still a dead end.
///
/// Returns the number of cells carved, zero if no opening exists.
pub fn open_dead_end(grid: &mut Grid,
                     from: GridCoordinate,
                     rng: &mut MazeRng,
                     events: &mut dyn EventSink)
                     -> usize {
    let mut current = from;
    let mut carved = 0;

    while grid.is_dead_end(current) {
        events.record(MazeEvent::Visited(current));
        let opening = match openings(grid, current).choose(rng) {
            Some(opening) => *opening,
            None => break,
        };
        if grid.set(opening, CellState::Path) {
            events.record(MazeEvent::Carved(opening));
            carved += 1;
        }
        trace!("opened {} from {}", opening, current);
        current = opening;
    }
    carved
}

/// Sends agents to randomly chosen dead ends of a maze, each closing or opening the dead end it
/// lands on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Refiner {
    pub agent_count: usize,
    pub mode: RefineMode,
}

impl Refiner {
    pub fn new(agent_count: usize, mode: RefineMode) -> Refiner {
        Refiner { agent_count, mode }
    }

    pub fn refine(&self,
                  grid: Grid,
                  start: GridCoordinate,
                  goal: GridCoordinate,
                  rng: &mut MazeRng)
                  -> Grid {
        self.refine_with_events(grid, start, goal, rng, &mut NoEvents)
    }

    pub fn refine_with_events(&self,
                              mut grid: Grid,
                              start: GridCoordinate,
                              goal: GridCoordinate,
                              rng: &mut MazeRng,
                              events: &mut dyn EventSink)
                              -> Grid {
        if self.agent_count == 0 {
            return grid;
        }

        let protected = [start, goal];
        let mut candidates = dead_ends(&grid, &protected);
        candidates.shuffle(rng);

        let agents = cmp::min(self.agent_count, candidates.len());
        if agents < self.agent_count {
            debug!("{} refinement agents requested but only {} dead ends available",
                   self.agent_count, candidates.len());
        }

        let (mut walled, mut carved) = (0, 0);
        for (i, dead_end) in candidates.iter().take(agents).enumerate() {
            match self.mode {
                RefineMode::Close => {
                    walled += close_dead_end(&mut grid, *dead_end, &protected, events);
                }
                RefineMode::Open => {
                    carved += open_dead_end(&mut grid, *dead_end, rng, events);
                }
                RefineMode::CloseThenOpen => {
                    walled += close_dead_end(&mut grid, *dead_end, &protected, events);
                    // the i-th agent reopens the i-th dead end left, scanning by column
                    let secondary = dead_ends_by_column(&grid, &protected);
                    if let Some(reopen) = secondary.get(i) {
                        carved += open_dead_end(&mut grid, *reopen, rng, events);
                    }
                }
            }
        }

        debug!("{} refinement with {} agents over {} dead ends walled {} and carved {} cells",
               self.mode, agents, candidates.len(), walled, carved);
        grid
    }
}
