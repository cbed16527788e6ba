//! Seeded entry points for generating, refining and solving mazes.
//!
//! Every call that needs randomness takes a seed and builds its own rng from it, so the same
//! arguments always give the same result. Nothing is kept between calls.

use error_chain::bail;

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::events::{EventSink, NoEvents};
use crate::generators::MazeAlgorithm;
use crate::grid::Grid;
use crate::pathing::{FurthestPointSolver, Path, SolveStrategy};
use crate::refinement::{RefineMode, Refiner};
use crate::utils;

pub fn generate(width: usize,
                height: usize,
                algorithm: MazeAlgorithm,
                seed: u64)
                -> Result<(Grid, GridCoordinate)> {
    generate_with_events(width, height, algorithm, seed, &mut NoEvents)
}

pub fn generate_with_events(width: usize,
                            height: usize,
                            algorithm: MazeAlgorithm,
                            seed: u64,
                            events: &mut dyn EventSink)
                            -> Result<(Grid, GridCoordinate)> {
    let mut rng = utils::seeded_rng(seed);
    algorithm.generator().generate_with_events(width, height, &mut rng, events)
}

pub fn refine(grid: Grid,
              start: GridCoordinate,
              goal: GridCoordinate,
              agent_count: usize,
              mode: RefineMode,
              seed: u64)
              -> Grid {
    refine_with_events(grid, start, goal, agent_count, mode, seed, &mut NoEvents)
}

pub fn refine_with_events(grid: Grid,
                          start: GridCoordinate,
                          goal: GridCoordinate,
                          agent_count: usize,
                          mode: RefineMode,
                          seed: u64,
                          events: &mut dyn EventSink)
                          -> Grid {
    let mut rng = utils::seeded_rng(seed);
    Refiner::new(agent_count, mode).refine_with_events(grid, start, goal, &mut rng, events)
}

/// The open cell furthest from `start` by breadth first distance.
pub fn furthest_from(grid: &Grid, start: GridCoordinate) -> GridCoordinate {
    FurthestPointSolver.furthest_from(grid, start)
}

/// The lattice cell in the far corner from the start, `(width - t, height - t)` per axis where
/// `t` is 3 for an even dimension and 2 for an odd one.
pub fn corner_goal(grid: &Grid) -> GridCoordinate {
    fn inset(dimension: usize) -> isize {
        let d = dimension as isize;
        if d % 2 == 0 { d - 3 } else { d - 2 }
    }
    GridCoordinate::new(inset(grid.width()), inset(grid.height()))
}

pub fn solve(grid: &Grid,
             start: GridCoordinate,
             goal: GridCoordinate,
             strategy: SolveStrategy)
             -> Result<Path> {
    solve_with_events(grid, start, goal, strategy, &mut NoEvents)
}

pub fn solve_with_events(grid: &Grid,
                         start: GridCoordinate,
                         goal: GridCoordinate,
                         strategy: SolveStrategy,
                         events: &mut dyn EventSink)
                         -> Result<Path> {
    match strategy.solver().solve_with_events(grid, start, goal, events) {
        Some(path) => Ok(path),
        None => bail!(ErrorKind::UnreachableGoal(goal)),
    }
}
