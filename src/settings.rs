use std::fmt;
use std::str::FromStr;

use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::cells::GridCoordinate;
use crate::engine;
use crate::errors::*;
use crate::generators::MazeAlgorithm;
use crate::grid::Grid;
use crate::pathing::{Path, SolveStrategy};
use crate::refinement::RefineMode;

/// Where the goal goes once a maze has been generated.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPolicy {
    /// The open cell furthest from the start, picked again after refinement.
    Furthest,
    /// The lattice cell in the far corner of the grid.
    Corner,
}

impl Default for GoalPolicy {
    fn default() -> GoalPolicy {
        GoalPolicy::Furthest
    }
}

impl GoalPolicy {
    pub fn goal(self, grid: &Grid, start: GridCoordinate) -> GridCoordinate {
        match self {
            GoalPolicy::Furthest => engine::furthest_from(grid, start),
            GoalPolicy::Corner => engine::corner_goal(grid),
        }
    }
}

impl FromStr for GoalPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<GoalPolicy> {
        match s.to_ascii_lowercase().as_str() {
            "furthest" => Ok(GoalPolicy::Furthest),
            "corner" => Ok(GoalPolicy::Corner),
            _ => Err(ErrorKind::UnknownSetting("goal policy", s.to_string()).into()),
        }
    }
}

impl fmt::Display for GoalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            GoalPolicy::Furthest => "furthest",
            GoalPolicy::Corner => "corner",
        };
        write!(f, "{}", name)
    }
}

/// Everything a caller chooses about a maze. Missing fields take their defaults when
/// deserialized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    pub width: usize,
    pub height: usize,
    pub algorithm: MazeAlgorithm,
    pub agent_count: usize,
    pub refine_mode: RefineMode,
    pub strategy: SolveStrategy,
    pub goal_policy: GoalPolicy,
}

impl Default for MazeSettings {
    fn default() -> MazeSettings {
        MazeSettings {
            width: 20,
            height: 20,
            algorithm: MazeAlgorithm::default(),
            agent_count: 0,
            refine_mode: RefineMode::default(),
            strategy: SolveStrategy::default(),
            goal_policy: GoalPolicy::default(),
        }
    }
}

/// A generated, refined and solved maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeRun {
    pub grid: Grid,
    pub start: GridCoordinate,
    pub goal: GridCoordinate,
    pub path: Path,
}

impl MazeSettings {
    /// Generate a maze, pick a goal, refine it when any agents are asked for and solve it.
    ///
    /// The refinement rng is seeded from `seed` as well, so one seed reproduces the whole run.
    pub fn run(&self, seed: u64) -> Result<MazeRun> {
        let (grid, start) = engine::generate(self.width, self.height, self.algorithm, seed)?;
        let mut goal = self.goal_policy.goal(&grid, start);

        let grid = if self.agent_count > 0 {
            let refined = engine::refine(grid, start, goal, self.agent_count, self.refine_mode,
                                         seed.wrapping_add(1));
            // closing spurs can move the furthest point, the corner never moves
            if self.goal_policy == GoalPolicy::Furthest {
                goal = engine::furthest_from(&refined, start);
            }
            refined
        } else {
            grid
        };

        let path = engine::solve(&grid, start, goal, self.strategy)?;
        debug!("{}x{} {} maze solved by {} from {} to {} in {} steps",
               self.width, self.height, self.algorithm, self.strategy, start, goal, path.steps());

        Ok(MazeRun { grid, start, goal, path })
    }
}
