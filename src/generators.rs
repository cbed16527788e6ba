//! Perfect maze generation over a block grid.
//!
//! All generators carve on the odd lattice `{1, 3, 5, ...}` of the grid: lattice cells become
//! rooms and the single cell between two neighbouring rooms is the connector carved when they are
//! joined. An even dimension is carved as if it were one smaller, leaving an extra wall row or
//! column along the far edge.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use crate::cells::{CellState, CompassPrimary, CoordinateSmallVec, GridCoordinate,
                   COMPASS_PRIMARIES};
use crate::disjoint_set::DisjointSet;
use crate::errors::*;
use crate::events::{EventSink, MazeEvent, NoEvents};
use crate::grid::Grid;
use crate::units::{Height, Width};
use crate::utils::{self, FnvHashSet, MazeRng};

/// Every generator starts its maze here and it is always carved.
pub const START: GridCoordinate = GridCoordinate { x: 1, y: 1 };

/// The rooms of a maze: interior cells with two odd coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OddLattice {
    carve_width: usize,
    carve_height: usize,
}

impl OddLattice {
    pub fn for_grid(grid: &Grid) -> OddLattice {
        let normalise = |dimension: usize| if dimension % 2 == 0 { dimension - 1 } else { dimension };
        OddLattice {
            carve_width: normalise(grid.width()),
            carve_height: normalise(grid.height()),
        }
    }

    pub fn contains(&self, coord: GridCoordinate) -> bool {
        let on_odd = |v: isize, carve_dimension: usize| {
            v >= 1 && v % 2 == 1 && (v as usize) <= carve_dimension - 2
        };
        on_odd(coord.x, self.carve_width) && on_odd(coord.y, self.carve_height)
    }

    /// Is the cell a connector between two rooms (interior, not a room, not a pillar).
    pub fn is_connector(&self, coord: GridCoordinate) -> bool {
        let x_odd = coord.x.rem_euclid(2) == 1;
        let y_odd = coord.y.rem_euclid(2) == 1;
        (x_odd != y_odd) &&
        COMPASS_PRIMARIES.iter().any(|dir| {
            self.contains(coord.offset(*dir)) && self.contains(coord.offset(dir.opposite()))
        })
    }

    pub fn columns(&self) -> usize {
        (self.carve_width - 1) / 2
    }

    pub fn rows(&self) -> usize {
        (self.carve_height - 1) / 2
    }

    pub fn len(&self) -> usize {
        self.columns() * self.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lattice cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCoordinate> {
        let columns = self.columns() as isize;
        let rows = self.rows() as isize;
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |column| GridCoordinate::new(column * 2 + 1, row * 2 + 1))
        })
    }

    /// The lattice cells two steps away, in North, South, East, West order.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        COMPASS_PRIMARIES.iter()
                         .map(|dir| coord.offset_by(*dir, 2))
                         .filter(|candidate| self.contains(*candidate))
                         .collect()
    }
}

/// Open a cell, recording the change if there was one.
fn carve(grid: &mut Grid, coord: GridCoordinate, events: &mut dyn EventSink) {
    if grid.set(coord, CellState::Path) {
        events.record(MazeEvent::Carved(coord));
    }
}

/// Join two neighbouring rooms through the connector between them.
fn carve_passage(grid: &mut Grid, from: GridCoordinate, to: GridCoordinate, events: &mut dyn EventSink) {
    carve(grid, from, events);
    carve(grid, from.midpoint(to), events);
    carve(grid, to, events);
}

pub trait MazeGenerator {
    fn name(&self) -> &'static str;

    /// Carve a spanning tree over the lattice of an all wall grid.
    fn carve(&self, grid: &mut Grid, lattice: &OddLattice, rng: &mut MazeRng, events: &mut dyn EventSink);

    fn generate(&self, width: usize, height: usize, rng: &mut MazeRng) -> Result<(Grid, GridCoordinate)> {
        self.generate_with_events(width, height, rng, &mut NoEvents)
    }

    fn generate_with_events(&self,
                            width: usize,
                            height: usize,
                            rng: &mut MazeRng,
                            events: &mut dyn EventSink)
                            -> Result<(Grid, GridCoordinate)> {
        let mut grid = Grid::walled(Width(width), Height(height))?;
        let lattice = OddLattice::for_grid(&grid);

        self.carve(&mut grid, &lattice, rng, events);
        grid.close_boundary();
        carve(&mut grid, START, events);

        debug!("{} generated a {}x{} maze with {} path cells",
               self.name(), width, height, grid.path_cells_count());
        Ok((grid, START))
    }
}

/// Randomised depth first search. Each room shuffles its own direction order and the search
/// backtracks through an explicit stack, so maze size is not limited by the call stack.
#[derive(Debug, Copy, Clone, Default)]
pub struct BacktrackGenerator;

struct BacktrackFrame {
    cell: GridCoordinate,
    directions: [CompassPrimary; 4],
    next: usize,
}

impl BacktrackFrame {
    fn new(cell: GridCoordinate, rng: &mut MazeRng) -> BacktrackFrame {
        let mut directions = COMPASS_PRIMARIES;
        directions.shuffle(rng);
        BacktrackFrame { cell, directions, next: 0 }
    }

    fn next_direction(&mut self) -> Option<CompassPrimary> {
        let dir = self.directions.get(self.next).cloned();
        self.next += 1;
        dir
    }
}

impl MazeGenerator for BacktrackGenerator {
    fn name(&self) -> &'static str {
        "backtrack"
    }

    fn carve(&self, grid: &mut Grid, lattice: &OddLattice, rng: &mut MazeRng, events: &mut dyn EventSink) {
        if !lattice.contains(START) {
            return;
        }
        carve(grid, START, events);
        let mut stack = vec![BacktrackFrame::new(START, rng)];

        while let Some(frame) = stack.last_mut() {
            let cell = frame.cell;
            let dir = match frame.next_direction() {
                Some(dir) => dir,
                None => {
                    stack.pop();
                    continue;
                }
            };

            let candidate = cell.offset_by(dir, 2);
            if lattice.contains(candidate) && grid.is_wall(candidate) {
                carve_passage(grid, cell, candidate, events);
                stack.push(BacktrackFrame::new(candidate, rng));
            }
        }
    }
}

/// Randomised Kruskal: every room starts in its own set and the walls between rooms are knocked
/// through in random order whenever they separate two different sets.
#[derive(Debug, Copy, Clone, Default)]
pub struct KruskalGenerator;

impl MazeGenerator for KruskalGenerator {
    fn name(&self) -> &'static str {
        "kruskal"
    }

    fn carve(&self, grid: &mut Grid, lattice: &OddLattice, rng: &mut MazeRng, events: &mut dyn EventSink) {
        let mut sets = DisjointSet::new(lattice.cells());

        let mut edges = Vec::with_capacity(lattice.len() * 2);
        for cell in lattice.cells() {
            carve(grid, cell, events);
            for dir in &[CompassPrimary::East, CompassPrimary::South] {
                let other = cell.offset_by(*dir, 2);
                if lattice.contains(other) {
                    edges.push((cell, other));
                }
            }
        }
        edges.shuffle(rng);

        let edges_count = edges.len();
        let mut processed = 0;
        for (a, b) in edges {
            if sets.sets_count() <= 1 {
                break;
            }
            processed += 1;
            if sets.union(a, b) {
                carve(grid, a.midpoint(b), events);
            }
        }
        debug!("kruskal processed {} of {} edges", processed, edges_count);
    }
}

/// The set of walled rooms waiting to be joined onto the maze by Prim's algorithm.
#[derive(Debug, Default)]
pub struct FrontierSet {
    cells: Vec<GridCoordinate>,
    members: FnvHashSet<GridCoordinate>,
}

impl FrontierSet {
    pub fn new() -> FrontierSet {
        FrontierSet {
            cells: vec![],
            members: utils::fnv_hashset(0),
        }
    }

    /// Returns false if the cell was already waiting.
    pub fn insert(&mut self, cell: GridCoordinate) -> bool {
        if self.members.insert(cell) {
            self.cells.push(cell);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, cell: GridCoordinate) -> bool {
        self.members.contains(&cell)
    }

    /// Remove and return a uniformly chosen cell.
    pub fn take_random(&mut self, rng: &mut MazeRng) -> Option<GridCoordinate> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        let cell = self.cells.swap_remove(index);
        self.members.remove(&cell);
        Some(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Randomised Prim: the maze grows outwards from one room, repeatedly joining a random walled
/// room on its frontier to one of the carved rooms next to it.
#[derive(Debug, Copy, Clone, Default)]
pub struct PrimGenerator;

impl PrimGenerator {
    fn extend_frontier(grid: &Grid, lattice: &OddLattice, frontier: &mut FrontierSet, from: GridCoordinate) {
        for neighbour in lattice.neighbours(from) {
            if grid.is_wall(neighbour) {
                frontier.insert(neighbour);
            }
        }
    }
}

impl MazeGenerator for PrimGenerator {
    fn name(&self) -> &'static str {
        "prim"
    }

    fn carve(&self, grid: &mut Grid, lattice: &OddLattice, rng: &mut MazeRng, events: &mut dyn EventSink) {
        let rooms = lattice.cells().collect::<Vec<_>>();
        let seed_room = match rooms.choose(rng) {
            Some(room) => *room,
            None => return,
        };

        let mut frontier = FrontierSet::new();
        carve(grid, seed_room, events);
        PrimGenerator::extend_frontier(grid, lattice, &mut frontier, seed_room);

        let mut dropped = 0;
        while let Some(cell) = frontier.take_random(rng) {
            if !grid.is_wall(cell) {
                dropped += 1;
                continue;
            }

            let carved_neighbours = lattice.neighbours(cell)
                                           .into_iter()
                                           .filter(|n| grid.is_path(*n))
                                           .collect::<CoordinateSmallVec>();
            let join = match carved_neighbours.choose(rng) {
                Some(neighbour) => *neighbour,
                None => {
                    dropped += 1;
                    continue;
                }
            };

            carve_passage(grid, join, cell, events);
            PrimGenerator::extend_frontier(grid, lattice, &mut frontier, cell);
        }
        debug!("prim dropped {} stale frontier cells", dropped);
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeAlgorithm {
    Backtrack,
    Kruskal,
    Prim,
}

impl Default for MazeAlgorithm {
    fn default() -> MazeAlgorithm {
        MazeAlgorithm::Backtrack
    }
}

impl MazeAlgorithm {
    pub fn generator(self) -> Box<dyn MazeGenerator> {
        match self {
            MazeAlgorithm::Backtrack => Box::new(BacktrackGenerator),
            MazeAlgorithm::Kruskal => Box::new(KruskalGenerator),
            MazeAlgorithm::Prim => Box::new(PrimGenerator),
        }
    }

    pub fn all() -> [MazeAlgorithm; 3] {
        [MazeAlgorithm::Backtrack, MazeAlgorithm::Kruskal, MazeAlgorithm::Prim]
    }
}

impl FromStr for MazeAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<MazeAlgorithm> {
        match s.to_ascii_lowercase().as_str() {
            "backtrack" | "dfs" => Ok(MazeAlgorithm::Backtrack),
            "kruskal" => Ok(MazeAlgorithm::Kruskal),
            "prim" => Ok(MazeAlgorithm::Prim),
            _ => Err(ErrorKind::UnknownSetting("maze algorithm", s.to_string()).into()),
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            MazeAlgorithm::Backtrack => "backtrack",
            MazeAlgorithm::Kruskal => "kruskal",
            MazeAlgorithm::Prim => "prim",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::utils::seeded_rng;
    use quickcheck::{quickcheck, TestResult};
    use std::collections::VecDeque;

    fn gc(x: isize, y: isize) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    fn flood_fill_count(grid: &Grid, from: GridCoordinate) -> usize {
        let mut seen = utils::fnv_hashset(grid.size());
        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);
        while let Some(cell) = queue.pop_front() {
            for n in grid.open_neighbours(cell) {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len()
    }

    /// Connected from the start, every room carved, and connectors == rooms - 1.
    fn is_perfect_maze(grid: &Grid, start: GridCoordinate) -> bool {
        let lattice = OddLattice::for_grid(grid);
        let rooms = grid.iter_path().filter(|c| lattice.contains(*c)).count();
        let connectors = grid.iter_path().filter(|c| !lattice.contains(*c)).count();
        let all_connectors_join_rooms = grid.iter_path()
                                            .filter(|c| !lattice.contains(*c))
                                            .all(|c| lattice.is_connector(c));

        grid.is_path(start) &&
        grid.is_boundary_closed() &&
        rooms == lattice.len() &&
        connectors + 1 == rooms &&
        all_connectors_join_rooms &&
        flood_fill_count(grid, start) == grid.path_cells_count()
    }

    #[test]
    fn lattice_normalises_even_dimensions() {
        let odd = OddLattice::for_grid(&Grid::walled(Width(7), Height(5)).unwrap());
        let even = OddLattice::for_grid(&Grid::walled(Width(8), Height(6)).unwrap());
        assert_eq!(odd, even);
        assert_eq!((odd.columns(), odd.rows()), (3, 2));
        assert_eq!(odd.cells().collect::<Vec<_>>(),
                   vec![gc(1, 1), gc(3, 1), gc(5, 1), gc(1, 3), gc(3, 3), gc(5, 3)]);
        assert!(!even.contains(gc(7, 1)));
        assert!(!even.contains(gc(0, 1)));
        assert!(!even.contains(gc(2, 1)));
    }

    #[test]
    fn lattice_neighbours_stay_on_lattice() {
        let lattice = OddLattice::for_grid(&Grid::walled(Width(7), Height(7)).unwrap());
        assert_eq!(lattice.neighbours(gc(1, 1)).to_vec(), vec![gc(1, 3), gc(3, 1)]);
        assert_eq!(lattice.neighbours(gc(3, 3)).len(), 4);
    }

    #[test]
    fn connectors() {
        let lattice = OddLattice::for_grid(&Grid::walled(Width(7), Height(7)).unwrap());
        assert!(lattice.is_connector(gc(2, 1)));
        assert!(lattice.is_connector(gc(1, 4)));
        assert!(!lattice.is_connector(gc(2, 2)));
        assert!(!lattice.is_connector(gc(0, 1)));
        assert!(!lattice.is_connector(gc(1, 1)));
    }

    #[test]
    fn every_generator_builds_a_perfect_maze() {
        for algorithm in MazeAlgorithm::all().iter() {
            for &(w, h) in &[(5, 5), (7, 7), (9, 13), (10, 6), (21, 21), (3, 3), (3, 9)] {
                let mut rng = seeded_rng(7);
                let (grid, start) = algorithm.generator().generate(w, h, &mut rng).unwrap();
                assert_eq!(start, START);
                assert!(is_perfect_maze(&grid, start), "{} {}x{}\n{}", algorithm, w, h, grid);
            }
        }
    }

    #[test]
    fn smallest_maze_is_a_single_room() {
        for algorithm in MazeAlgorithm::all().iter() {
            let mut rng = seeded_rng(3);
            let (grid, start) = algorithm.generator().generate(3, 3, &mut rng).unwrap();
            assert_eq!(grid.path_cells_count(), 1);
            assert!(grid.is_path(start));
        }
    }

    #[test]
    fn invalid_dimensions_fail() {
        for algorithm in MazeAlgorithm::all().iter() {
            let mut rng = seeded_rng(3);
            match algorithm.generator().generate(2, 9, &mut rng) {
                Err(Error(ErrorKind::InvalidDimensions(2, 9), _)) => {}
                other => panic!("expected invalid dimensions, got {:?}", other),
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        for algorithm in MazeAlgorithm::all().iter() {
            let (a, _) = algorithm.generator().generate(7, 7, &mut seeded_rng(99)).unwrap();
            let (b, _) = algorithm.generator().generate(7, 7, &mut seeded_rng(99)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn large_backtrack_maze_does_not_overflow() {
        let (grid, start) = BacktrackGenerator.generate(201, 201, &mut seeded_rng(1)).unwrap();
        assert!(is_perfect_maze(&grid, start));
    }

    #[test]
    fn events_replay_to_the_generated_maze() {
        for algorithm in MazeAlgorithm::all().iter() {
            let mut log = EventLog::new();
            let (grid, _) = algorithm.generator()
                                     .generate_with_events(11, 9, &mut seeded_rng(5), &mut log)
                                     .unwrap();
            let (plain, _) = algorithm.generator().generate(11, 9, &mut seeded_rng(5)).unwrap();
            assert_eq!(grid, plain);

            let initial = Grid::walled(Width(11), Height(9)).unwrap();
            assert_eq!(log.replay(&initial).last(), Some(grid.clone()));
            assert_eq!(log.mutations_count(), grid.path_cells_count());
        }
    }

    #[test]
    fn frontier_set_holds_each_cell_once() {
        let mut frontier = FrontierSet::new();
        assert!(frontier.insert(gc(1, 1)));
        assert!(!frontier.insert(gc(1, 1)));
        assert!(frontier.insert(gc(3, 1)));
        assert_eq!(frontier.len(), 2);

        let mut rng = seeded_rng(11);
        let mut taken = vec![frontier.take_random(&mut rng).unwrap(),
                             frontier.take_random(&mut rng).unwrap()];
        taken.sort();
        assert_eq!(taken, vec![gc(1, 1), gc(3, 1)]);
        assert!(frontier.is_empty());
        assert!(!frontier.contains(gc(1, 1)));
        assert_eq!(frontier.take_random(&mut rng), None);
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("Kruskal".parse::<MazeAlgorithm>().unwrap(), MazeAlgorithm::Kruskal);
        assert_eq!("dfs".parse::<MazeAlgorithm>().unwrap(), MazeAlgorithm::Backtrack);
        for algorithm in MazeAlgorithm::all().iter() {
            assert_eq!(algorithm.to_string().parse::<MazeAlgorithm>().unwrap(), *algorithm);
        }
        assert!("eller".parse::<MazeAlgorithm>().is_err());
    }

    #[test]
    fn quickcheck_generators_make_perfect_mazes() {
        fn prop(seed: u64, w: u8, h: u8) -> TestResult {
            let (w, h) = (w as usize % 40, h as usize % 40);
            if w < 5 || h < 5 {
                return TestResult::discard();
            }
            let all_perfect = MazeAlgorithm::all().iter().all(|algorithm| {
                let (grid, start) = algorithm.generator()
                                             .generate(w, h, &mut seeded_rng(seed))
                                             .unwrap();
                is_perfect_maze(&grid, start)
            });
            TestResult::from_bool(all_perfect)
        }
        quickcheck(prop as fn(u64, u8, u8) -> TestResult);
    }
}
