// Solvers read a grid and never mutate it. Anything they explore is recorded as `Visited` events,
// which is how a caller counts expanded cells or animates a search.

use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use log::debug;
use rand::seq::SliceRandom;
use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, GridCoordinate, COMPASS_PRIMARIES};
use crate::errors::*;
use crate::events::{EventSink, MazeEvent, NoEvents};
use crate::grid::Grid;
use crate::path_queue::PathQueue;
use crate::utils::{self, FnvHashMap, MazeRng};

/// A walk through a maze: consecutive cells are one axis aligned step apart, the first cell is
/// the start and the last the goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<GridCoordinate>,
}

impl Path {
    pub fn new(cells: Vec<GridCoordinate>) -> Path {
        Path { cells }
    }

    pub fn start(&self) -> Option<GridCoordinate> {
        self.cells.first().cloned()
    }

    pub fn goal(&self) -> Option<GridCoordinate> {
        self.cells.last().cloned()
    }

    /// The number of cells on the path, including both ends.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridCoordinate> {
        self.cells.iter()
    }

    pub fn as_slice(&self) -> &[GridCoordinate] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<GridCoordinate> {
        self.cells
    }

    /// Every consecutive pair of cells is 4-connected.
    pub fn is_contiguous(&self) -> bool {
        self.cells.windows(2).all(|pair| pair[0].is_adjacent(pair[1]))
    }

    /// No cell is visited twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = utils::fnv_hashset(self.cells.len());
        self.cells.iter().all(|cell| seen.insert(*cell))
    }

    /// A contiguous path over open cells only.
    pub fn is_walkable_on(&self, grid: &Grid) -> bool {
        self.is_contiguous() && self.cells.iter().all(|cell| grid.is_path(*cell))
    }
}

/// Breadth first flood fill distances over the open cells reachable from a start cell.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    discovery_order: Vec<GridCoordinate>,
    max_distance: u32,
    furthest: GridCoordinate,
}

impl Distances {
    /// None if the start is not an open cell of the grid.
    pub fn for_grid(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {
        Distances::for_grid_with_events(grid, start_coordinate, &mut NoEvents)
    }

    pub fn for_grid_with_events(grid: &Grid,
                                start_coordinate: GridCoordinate,
                                events: &mut dyn EventSink)
                                -> Option<Distances> {
        if !grid.is_path(start_coordinate) {
            return None;
        }

        let mut distances = utils::fnv_hashmap(grid.size());
        let mut discovery_order = Vec::with_capacity(grid.size());
        distances.insert(start_coordinate, 0);
        discovery_order.push(start_coordinate);

        let mut max = 0;
        let mut furthest = start_coordinate;

        // Every step costs one, so the first time a cell is reached is along a shortest route and
        // the distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                events.record(MazeEvent::Visited(*cell_coord));
                let distance_to_cell = distances.get(cell_coord).cloned().unwrap_or(0);

                for link_coordinate in grid.open_neighbours(*cell_coord) {
                    if distances.contains_key(&link_coordinate) {
                        continue;
                    }
                    let distance_to_link = distance_to_cell + 1;
                    distances.insert(link_coordinate, distance_to_link);
                    discovery_order.push(link_coordinate);
                    new_frontier.push(link_coordinate);

                    // strictly greater keeps the first discovered cell on ties
                    if distance_to_link > max {
                        max = distance_to_link;
                        furthest = link_coordinate;
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            discovery_order,
            max_distance: max,
            furthest,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// The first discovered cell at the maximum distance.
    #[inline(always)]
    pub fn furthest(&self) -> GridCoordinate {
        self.furthest
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// All cells at the maximum distance in discovery order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.discovery_order
            .iter()
            .cloned()
            .filter(|coord| self.distances.get(coord) == Some(&furthest_distance))
            .collect()
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to the
/// neighbour closest to the start.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Path> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {
        let closest_to_start = grid.open_neighbours(current_coord)
            .into_iter()
            .filter_map(|coord| distances_from_start.distance_from_start_to(coord).map(|d| (coord, d)))
            .min_by_key(|&(_, d)| d);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                current_distance = closer_distance;
                path.push(current_coord);
            }
            // The grid changed since the distances were computed.
            _ => return None,
        }
    }

    path.reverse();
    Some(Path::new(path))
}

/// Picks a goal far away from the start.
#[derive(Debug, Copy, Clone, Default)]
pub struct FurthestPointSolver;

impl FurthestPointSolver {
    /// The open cell with the greatest breadth first distance from `start`, ties going to the
    /// first discovered. A start that is not open is returned unchanged.
    pub fn furthest_from(&self, grid: &Grid, start: GridCoordinate) -> GridCoordinate {
        Distances::for_grid(grid, start).map_or(start, |distances| distances.furthest())
    }
}

pub trait MazeSolver {
    fn name(&self) -> &'static str;

    fn solve_with_events(&self,
                         grid: &Grid,
                         start: GridCoordinate,
                         goal: GridCoordinate,
                         events: &mut dyn EventSink)
                         -> Option<Path>;

    /// A path from start to goal, None when either end is not an open cell or they are not
    /// connected.
    fn solve(&self, grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> Option<Path> {
        self.solve_with_events(grid, start, goal, &mut NoEvents)
    }
}

/// Unweighted shortest path by flood fill.
#[derive(Debug, Copy, Clone, Default)]
pub struct BreadthFirstSolver;

impl MazeSolver for BreadthFirstSolver {
    fn name(&self) -> &'static str {
        "breadth first"
    }

    fn solve_with_events(&self,
                         grid: &Grid,
                         start: GridCoordinate,
                         goal: GridCoordinate,
                         events: &mut dyn EventSink)
                         -> Option<Path> {
        if !grid.is_path(goal) {
            return None;
        }
        let distances = Distances::for_grid_with_events(grid, start, events)?;
        shortest_path(grid, &distances, goal)
    }
}

/// Depth first search with an explicit stack, mirroring the backtracking generator.
///
/// The first path found is returned. On a perfect maze that is the only path, once loops have been
/// opened it need not be the shortest.
#[derive(Debug, Copy, Clone, Default)]
pub struct BacktrackSolver {
    shuffle_seed: Option<u64>,
    line_of_sight: bool,
}

struct SolveFrame {
    cell: GridCoordinate,
    directions: [CompassPrimary; 4],
    next: usize,
}

impl SolveFrame {
    fn new(cell: GridCoordinate, rng: &mut Option<&mut MazeRng>) -> SolveFrame {
        let mut directions = COMPASS_PRIMARIES;
        if let Some(rng) = rng.as_mut() {
            directions.shuffle(rng);
        }
        SolveFrame { cell, directions, next: 0 }
    }

    fn next_direction(&mut self) -> Option<CompassPrimary> {
        let dir = self.directions.get(self.next).cloned();
        self.next += 1;
        dir
    }
}

impl BacktrackSolver {
    /// Explores neighbours North, South, East, West.
    pub fn new() -> BacktrackSolver {
        BacktrackSolver::default()
    }

    /// Explores neighbours in a fresh random order at every cell.
    ///
    /// `MazeSolver::solve` takes no rng, so the solver keeps the seed and builds a fresh rng from
    /// it on every call: solving twice gives the same path. Use `solve_with_rng` to thread a
    /// caller's rng through instead.
    pub fn randomized(seed: u64) -> BacktrackSolver {
        BacktrackSolver {
            shuffle_seed: Some(seed),
            line_of_sight: false,
        }
    }

    /// Head straight for the goal as soon as it is visible down an unexplored corridor.
    pub fn with_line_of_sight(self, line_of_sight: bool) -> BacktrackSolver {
        BacktrackSolver { line_of_sight, ..self }
    }

    /// The cells from `from` (exclusive) to `goal` (inclusive) if they share a row or column and
    /// everything between them is open and unvisited.
    fn sight_line(grid: &Grid,
                  from: GridCoordinate,
                  goal: GridCoordinate,
                  visited: &BitSet)
                  -> Option<Vec<GridCoordinate>> {
        let dir = if from.x == goal.x && goal.y < from.y {
            CompassPrimary::North
        } else if from.x == goal.x && goal.y > from.y {
            CompassPrimary::South
        } else if from.y == goal.y && goal.x > from.x {
            CompassPrimary::East
        } else if from.y == goal.y && goal.x < from.x {
            CompassPrimary::West
        } else {
            return None;
        };

        let mut corridor = vec![];
        let mut cell = from.offset(dir);
        while cell != goal {
            let unvisited = grid.grid_coordinate_to_index(cell)
                                .map_or(false, |index| !visited.contains(index));
            if !grid.is_path(cell) || !unvisited {
                return None;
            }
            corridor.push(cell);
            cell = cell.offset(dir);
        }
        corridor.push(goal);
        Some(corridor)
    }

    /// The remaining cells to the goal once `cell` has reached it or, with line of sight, can
    /// see it.
    fn arrival(&self,
               grid: &Grid,
               cell: GridCoordinate,
               goal: GridCoordinate,
               visited: &BitSet)
               -> Option<Vec<GridCoordinate>> {
        if cell == goal {
            Some(vec![])
        } else if self.line_of_sight {
            BacktrackSolver::sight_line(grid, cell, goal, visited)
        } else {
            None
        }
    }

    fn finish(stack: &[SolveFrame],
              tail: Vec<GridCoordinate>,
              expanded: usize,
              events: &mut dyn EventSink)
              -> Path {
        for cell in &tail {
            events.record(MazeEvent::Visited(*cell));
        }
        let mut cells = stack.iter().map(|frame| frame.cell).collect::<Vec<_>>();
        cells.extend(tail);
        debug!("backtrack solver found a {} step path after visiting {} cells",
               cells.len() - 1, expanded);
        Path::new(cells)
    }

    /// Explore neighbours in an order shuffled by `rng` at every cell, whatever this solver was
    /// built with.
    pub fn solve_with_rng(&self,
                          grid: &Grid,
                          start: GridCoordinate,
                          goal: GridCoordinate,
                          rng: &mut MazeRng,
                          events: &mut dyn EventSink)
                          -> Option<Path> {
        self.search(grid, start, goal, Some(rng), events)
    }

    fn search(&self,
              grid: &Grid,
              start: GridCoordinate,
              goal: GridCoordinate,
              mut rng: Option<&mut MazeRng>,
              events: &mut dyn EventSink)
              -> Option<Path> {
        if !grid.is_path(start) || !grid.is_path(goal) {
            return None;
        }
        events.record(MazeEvent::Visited(start));

        let mut visited = BitSet::with_capacity(grid.size());
        visited.insert(grid.grid_coordinate_to_index(start)?);
        let mut stack = vec![SolveFrame::new(start, &mut rng)];
        let mut expanded = 1;

        if let Some(tail) = self.arrival(grid, start, goal, &visited) {
            return Some(BacktrackSolver::finish(&stack, tail, expanded, events));
        }

        loop {
            let (cell, next) = match stack.last_mut() {
                Some(frame) => (frame.cell, frame.next_direction()),
                None => break,
            };

            let dir = match next {
                Some(dir) => dir,
                None => {
                    // dead end, backtrack
                    stack.pop();
                    continue;
                }
            };

            let candidate = cell.offset(dir);
            match grid.grid_coordinate_to_index(candidate) {
                Some(index) if grid.is_path(candidate) && visited.insert(index) => {}
                _ => continue,
            }
            events.record(MazeEvent::Visited(candidate));
            expanded += 1;
            stack.push(SolveFrame::new(candidate, &mut rng));

            if let Some(tail) = self.arrival(grid, candidate, goal, &visited) {
                return Some(BacktrackSolver::finish(&stack, tail, expanded, events));
            }
        }

        debug!("backtrack solver found no path after visiting {} cells", expanded);
        None
    }
}

impl MazeSolver for BacktrackSolver {
    fn name(&self) -> &'static str {
        "backtrack"
    }

    fn solve_with_events(&self,
                         grid: &Grid,
                         start: GridCoordinate,
                         goal: GridCoordinate,
                         events: &mut dyn EventSink)
                         -> Option<Path> {
        match self.shuffle_seed {
            Some(seed) => {
                let mut rng = utils::seeded_rng(seed);
                self.search(grid, start, goal, Some(&mut rng), events)
            }
            None => self.search(grid, start, goal, None, events),
        }
    }
}

/// A* with the Manhattan distance heuristic, which is admissible and consistent on a
/// 4-connected grid with unit steps, so the path found is always a shortest one.
#[derive(Debug, Copy, Clone, Default)]
pub struct AStarSolver;

impl AStarSolver {
    fn reconstruct_path(came_from: &FnvHashMap<GridCoordinate, GridCoordinate>,
                        goal: GridCoordinate)
                        -> Path {
        let mut cells = vec![goal];
        let mut current = goal;
        while let Some(previous) = came_from.get(&current) {
            current = *previous;
            cells.push(current);
        }
        cells.reverse();
        Path::new(cells)
    }
}

impl MazeSolver for AStarSolver {
    fn name(&self) -> &'static str {
        "a*"
    }

    fn solve_with_events(&self,
                         grid: &Grid,
                         start: GridCoordinate,
                         goal: GridCoordinate,
                         events: &mut dyn EventSink)
                         -> Option<Path> {
        if !grid.is_path(start) || !grid.is_path(goal) {
            return None;
        }

        let mut open_set = PathQueue::with_capacity(grid.size() / 4);
        let mut came_from = utils::fnv_hashmap(grid.size() / 2);
        let mut g_score = utils::fnv_hashmap(grid.size() / 2);
        let mut closed = BitSet::with_capacity(grid.size());

        g_score.insert(start, 0u32);
        open_set.enqueue(start, start.manhattan_distance(goal));

        while let Some((current, _)) = open_set.dequeue_min() {
            events.record(MazeEvent::Visited(current));

            if current == goal {
                let path = AStarSolver::reconstruct_path(&came_from, goal);
                debug!("a* found a {} step path after expanding {} cells",
                       path.steps(), closed.len() + 1);
                return Some(path);
            }

            if let Some(index) = grid.grid_coordinate_to_index(current) {
                closed.insert(index);
            }
            let current_g = match g_score.get(&current) {
                Some(g) => *g,
                None => continue,
            };

            for neighbour in grid.open_neighbours(current) {
                let is_closed = grid.grid_coordinate_to_index(neighbour)
                                    .map_or(true, |index| closed.contains(index));
                if is_closed {
                    continue;
                }

                let tentative_g = current_g + 1;
                let improves = g_score.get(&neighbour).map_or(true, |g| tentative_g < *g);
                if improves {
                    came_from.insert(neighbour, current);
                    g_score.insert(neighbour, tentative_g);
                    open_set.enqueue(neighbour, tentative_g + neighbour.manhattan_distance(goal));
                }
            }
        }

        debug!("a* found no path after expanding {} cells", closed.len());
        None
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveStrategy {
    Backtrack,
    AStar,
    BreadthFirst,
}

impl Default for SolveStrategy {
    fn default() -> SolveStrategy {
        SolveStrategy::AStar
    }
}

impl SolveStrategy {
    pub fn solver(self) -> Box<dyn MazeSolver> {
        match self {
            SolveStrategy::Backtrack => Box::new(BacktrackSolver::new()),
            SolveStrategy::AStar => Box::new(AStarSolver),
            SolveStrategy::BreadthFirst => Box::new(BreadthFirstSolver),
        }
    }

    pub fn all() -> [SolveStrategy; 3] {
        [SolveStrategy::Backtrack, SolveStrategy::AStar, SolveStrategy::BreadthFirst]
    }
}

impl FromStr for SolveStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<SolveStrategy> {
        match s.to_ascii_lowercase().as_str() {
            "backtrack" | "dfs" => Ok(SolveStrategy::Backtrack),
            "a-star" | "astar" | "a*" => Ok(SolveStrategy::AStar),
            "breadth-first" | "bfs" => Ok(SolveStrategy::BreadthFirst),
            _ => Err(ErrorKind::UnknownSetting("solve strategy", s.to_string()).into()),
        }
    }
}

impl fmt::Display for SolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            SolveStrategy::Backtrack => "backtrack",
            SolveStrategy::AStar => "a-star",
            SolveStrategy::BreadthFirst => "breadth-first",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;

    fn bfs_distance(grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> Option<u32> {
        Distances::for_grid(grid, start)?.distance_from_start_to(goal)
    }

    fn gc(x: isize, y: isize) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    // A ring around a pillar with a spur: two routes from (1,1) to (3,3).
    fn looped() -> Grid {
        Grid::from_rows(&["#######",
                          "#.....#",
                          "#.###.#",
                          "#.#.#.#",
                          "#.....#",
                          "#######"])
            .unwrap()
    }

    // A perfect maze: a single winding corridor with one side branch.
    fn tree() -> Grid {
        Grid::from_rows(&["#######",
                          "#...#.#",
                          "###.#.#",
                          "#.....#",
                          "#.#####",
                          "#.....#",
                          "#######"])
            .unwrap()
    }

    #[test]
    fn distances_require_open_start() {
        let g = tree();
        assert!(Distances::for_grid(&g, gc(0, 0)).is_none());
        assert!(Distances::for_grid(&g, gc(-1, 40)).is_none());
    }

    #[test]
    fn distances_on_corridor() {
        let g = tree();
        let distances = Distances::for_grid(&g, gc(1, 1)).unwrap();
        assert_eq!(distances.start(), gc(1, 1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(3, 1)), Some(2));
        assert_eq!(distances.distance_from_start_to(gc(3, 3)), Some(4));
        assert_eq!(distances.distance_from_start_to(gc(0, 0)), None);
        assert_eq!(distances.reachable_count(), g.path_cells_count());
    }

    #[test]
    fn furthest_point_is_first_discovered_on_ties() {
        let g = Grid::from_rows(&["#####",
                                  "#...#",
                                  "#####"])
            .unwrap();
        // from the middle both ends are one step away, West is enumerated after East
        let distances = Distances::for_grid(&g, gc(2, 1)).unwrap();
        assert_eq!(distances.max(), 1);
        assert_eq!(distances.furthest(), gc(3, 1));
        assert_eq!(distances.furthest_points_on_grid().to_vec(), vec![gc(3, 1), gc(1, 1)]);
        assert_eq!(FurthestPointSolver.furthest_from(&g, gc(2, 1)), gc(3, 1));
    }

    #[test]
    fn furthest_from_is_idempotent() {
        let g = tree();
        let a = FurthestPointSolver.furthest_from(&g, gc(1, 1));
        let b = FurthestPointSolver.furthest_from(&g, gc(1, 1));
        assert_eq!(a, b);
        assert_eq!(a, gc(5, 5));
    }

    #[test]
    fn furthest_from_a_wall_is_the_wall() {
        let g = tree();
        assert_eq!(FurthestPointSolver.furthest_from(&g, gc(0, 0)), gc(0, 0));
    }

    #[test]
    fn shortest_path_walks_back_to_start() {
        let g = looped();
        let distances = Distances::for_grid(&g, gc(1, 1)).unwrap();
        let path = shortest_path(&g, &distances, gc(3, 3)).unwrap();
        assert_eq!(path.steps(), 6);
        assert_eq!(path.start(), Some(gc(1, 1)));
        assert_eq!(path.goal(), Some(gc(3, 3)));
        assert!(path.is_walkable_on(&g));
        assert!(shortest_path(&g, &distances, gc(0, 0)).is_none());
    }

    #[test]
    fn every_solver_finds_the_unique_tree_path() {
        let g = tree();
        for strategy in SolveStrategy::all().iter() {
            let path = strategy.solver().solve(&g, gc(1, 1), gc(5, 1)).unwrap();
            assert_eq!(path.steps() as u32, bfs_distance(&g, gc(1, 1), gc(5, 1)).unwrap(),
                       "{}", strategy);
            assert!(path.is_walkable_on(&g));
            assert!(path.is_simple());
            assert_eq!(path.start(), Some(gc(1, 1)));
            assert_eq!(path.goal(), Some(gc(5, 1)));
        }
    }

    #[test]
    fn dfs_may_take_the_long_way_round_a_loop() {
        let g = looped();
        let start = gc(1, 4);
        let goal = gc(2, 4);
        let astar = AStarSolver.solve(&g, start, goal).unwrap();
        let dfs = BacktrackSolver::new().solve(&g, start, goal).unwrap();

        assert_eq!(astar.steps(), 1);
        // North is explored first, all the way round the ring
        assert!(dfs.steps() > astar.steps());
        assert!(dfs.is_walkable_on(&g));
        assert!(dfs.is_simple());
    }

    #[test]
    fn astar_matches_bfs_on_loops() {
        let g = looped();
        for goal in g.iter_path().collect::<Vec<_>>() {
            let path = AStarSolver.solve(&g, gc(1, 1), goal).unwrap();
            assert_eq!(path.steps() as u32, bfs_distance(&g, gc(1, 1), goal).unwrap());
            assert!(path.is_walkable_on(&g));
        }
    }

    #[test]
    fn unreachable_goals_are_not_found() {
        let g = Grid::from_rows(&["#######",
                                  "#..#..#",
                                  "#######"])
            .unwrap();
        for strategy in SolveStrategy::all().iter() {
            let solver = strategy.solver();
            assert_eq!(solver.solve(&g, gc(1, 1), gc(4, 1)), None);
            assert_eq!(solver.solve(&g, gc(1, 1), gc(3, 1)), None);
            assert_eq!(solver.solve(&g, gc(1, 1), gc(50, 1)), None);
            assert_eq!(solver.solve(&g, gc(0, 0), gc(1, 1)), None);
        }
    }

    #[test]
    fn start_equal_to_goal() {
        let g = tree();
        for strategy in SolveStrategy::all().iter() {
            let path = strategy.solver().solve(&g, gc(3, 3), gc(3, 3)).unwrap();
            assert_eq!(path.as_slice(), &[gc(3, 3)]);
            assert_eq!(path.steps(), 0);
        }
    }

    #[test]
    fn randomized_dfs_is_reproducible() {
        let g = looped();
        let solver = BacktrackSolver::randomized(4);
        let a = solver.solve(&g, gc(1, 1), gc(3, 3));
        let b = solver.solve(&g, gc(1, 1), gc(3, 3));
        assert_eq!(a, b);
        assert_eq!(a, BacktrackSolver::randomized(4).solve(&g, gc(1, 1), gc(3, 3)));
        assert!(a.unwrap().is_walkable_on(&g));
    }

    #[test]
    fn caller_rng_matches_the_same_seed() {
        let g = looped();
        for seed in 0..16 {
            let seeded = BacktrackSolver::randomized(seed).solve(&g, gc(1, 4), gc(2, 4));
            let mut rng = utils::seeded_rng(seed);
            let threaded = BacktrackSolver::new()
                .solve_with_rng(&g, gc(1, 4), gc(2, 4), &mut rng, &mut NoEvents);
            assert_eq!(seeded, threaded);
            assert!(threaded.unwrap().is_simple());
        }
    }

    #[test]
    fn line_of_sight_goes_straight_for_the_goal() {
        let g = Grid::from_rows(&["#######",
                                  "#.....#",
                                  "#.#####",
                                  "#.....#",
                                  "#######"])
            .unwrap();
        let start = gc(1, 1);
        let goal = gc(5, 1);

        let mut plain_log = EventLog::new();
        let plain = BacktrackSolver::new().solve_with_events(&g, start, goal, &mut plain_log).unwrap();
        let mut sight_log = EventLog::new();
        let sighted = BacktrackSolver::new()
            .with_line_of_sight(true)
            .solve_with_events(&g, start, goal, &mut sight_log)
            .unwrap();

        assert_eq!(plain, sighted);
        assert_eq!(sighted.steps(), 4);
        // South is tried before East, without sight the whole lower corridor is explored first
        assert!(sight_log.visits().count() < plain_log.visits().count());
    }

    #[test]
    fn solver_events_record_exploration() {
        let g = tree();
        let mut log = EventLog::new();
        let path = AStarSolver.solve_with_events(&g, gc(1, 1), gc(5, 1), &mut log).unwrap();
        assert_eq!(log.mutations_count(), 0);
        assert!(log.visits().count() >= path.len());
        assert_eq!(log.visits().last(), Some(gc(5, 1)));
    }

    #[test]
    fn path_validation() {
        let ok = Path::new(vec![gc(1, 1), gc(1, 2), gc(2, 2)]);
        assert!(ok.is_contiguous());
        assert!(ok.is_simple());
        let jump = Path::new(vec![gc(1, 1), gc(2, 2)]);
        assert!(!jump.is_contiguous());
        let repeat = Path::new(vec![gc(1, 1), gc(1, 2), gc(1, 1)]);
        assert!(!repeat.is_simple());
        assert_eq!(Path::new(vec![]).steps(), 0);
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!("A*".parse::<SolveStrategy>().unwrap(), SolveStrategy::AStar);
        assert_eq!("bfs".parse::<SolveStrategy>().unwrap(), SolveStrategy::BreadthFirst);
        for strategy in SolveStrategy::all().iter() {
            assert_eq!(strategy.to_string().parse::<SolveStrategy>().unwrap(), *strategy);
        }
        assert!("dijkstra".parse::<SolveStrategy>().is_err());
    }
}
