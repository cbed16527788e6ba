//! Discrete engine events for anything that wants to watch a maze being built, refined or solved.
//!
//! The engine only records events as they happen, pacing and presentation belong to whoever
//! consumes them.

use crate::cells::{CellState, GridCoordinate};
use crate::grid::Grid;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum MazeEvent {
    /// A wall cell became a path.
    Carved(GridCoordinate),
    /// A path cell became a wall.
    Walled(GridCoordinate),
    /// A solver or refinement walk stepped onto a cell.
    Visited(GridCoordinate),
}

impl MazeEvent {
    /// Apply a mutation event to a grid, `Visited` leaves the grid alone.
    pub fn apply(&self, grid: &mut Grid) {
        match *self {
            MazeEvent::Carved(coord) => {
                grid.set(coord, CellState::Path);
            }
            MazeEvent::Walled(coord) => {
                grid.set(coord, CellState::Wall);
            }
            MazeEvent::Visited(_) => {}
        }
    }

    pub fn is_mutation(&self) -> bool {
        match *self {
            MazeEvent::Visited(_) => false,
            _ => true,
        }
    }
}

pub trait EventSink {
    fn record(&mut self, event: MazeEvent);
}

/// Discards everything.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoEvents;

impl EventSink for NoEvents {
    #[inline(always)]
    fn record(&mut self, _: MazeEvent) {}
}

impl EventSink for Vec<MazeEvent> {
    fn record(&mut self, event: MazeEvent) {
        self.push(event);
    }
}

/// An ordered, replayable record of engine events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<MazeEvent>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog { events: vec![] }
    }

    pub fn events(&self) -> &[MazeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn mutations_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_mutation()).count()
    }

    pub fn visits(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        self.events.iter().filter_map(|e| match *e {
            MazeEvent::Visited(coord) => Some(coord),
            _ => None,
        })
    }

    /// Lazily replay the log over a copy of `initial`, yielding the grid after each mutation.
    /// Calling `replay` again starts over from `initial`.
    pub fn replay(&self, initial: &Grid) -> Replay<'_> {
        Replay {
            grid: initial.clone(),
            events: self.events.iter(),
        }
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: MazeEvent) {
        self.events.push(event);
    }
}

#[derive(Debug)]
pub struct Replay<'a> {
    grid: Grid,
    events: std::slice::Iter<'a, MazeEvent>,
}

impl<'a> Iterator for Replay<'a> {
    type Item = Grid;

    fn next(&mut self) -> Option<Grid> {
        for event in self.events.by_ref() {
            if event.is_mutation() {
                event.apply(&mut self.grid);
                return Some(self.grid.clone());
            }
        }
        None
    }
}
