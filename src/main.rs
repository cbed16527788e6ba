use docopt::Docopt;
use log::info;
use maze_engine::{
    generators::MazeAlgorithm,
    grid_displays::{PathDisplay, StartEndPointsDisplay},
    pathing::{Distances, SolveStrategy},
    refinement::RefineMode,
    settings::{GoalPolicy, MazeRun, MazeSettings},
};
use rand::Rng;
use serde_derive::Deserialize;
use smallvec::smallvec;
use std::{
    fs::File,
    io::prelude::*,
};

const USAGE: &str = "Maze engine driver

Usage:
    maze_driver -h | --help
    maze_driver [--width=<w> --height=<h>] [--algorithm=<name>] [--seed=<n>] [--agents=<n> --refine=<mode>] [--solver=<name>] [--goal=<policy>] [--show-path | --show-distances] [--text-out=<path>]

Options:
    -h --help              Show this screen.
    --width=<w>            The grid width in a w*h grid [default: 20].
    --height=<h>           The grid height in a w*h grid [default: 20].
    --algorithm=<name>     Maze generator: backtrack, kruskal or prim [default: backtrack].
    --seed=<n>             Seed for every random choice. A random seed is used if not given.
    --agents=<n>           Number of dead ends to refine after generation [default: 0].
    --refine=<mode>        Refinement: close, open or close-then-open [default: close].
    --solver=<name>        Solver: backtrack, a-star or breadth-first [default: a-star].
    --goal=<policy>        Goal placement: furthest or corner [default: furthest].
    --show-path            Show the path from the start to the goal.
    --show-distances       Show the distance from the start to every reachable cell.
    --text-out=<path>      Output file path for a textual rendering of the maze.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_algorithm: String,
    flag_seed: Option<u64>,
    flag_agents: usize,
    flag_refine: String,
    flag_solver: String,
    flag_goal: String,
    flag_show_path: bool,
    flag_show_distances: bool,
    flag_text_out: String,
}

impl MazeArgs {
    fn settings(&self) -> Result<MazeSettings> {
        Ok(MazeSettings {
            width: self.flag_width,
            height: self.flag_height,
            algorithm: self.flag_algorithm.parse::<MazeAlgorithm>()?,
            agent_count: self.flag_agents,
            refine_mode: self.flag_refine.parse::<RefineMode>()?,
            strategy: self.flag_solver.parse::<SolveStrategy>()?,
            goal_policy: self.flag_goal.parse::<GoalPolicy>()?,
        })
    }
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Engine(::maze_engine::errors::Error, ::maze_engine::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let settings = args.settings()?;
    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("running {:?} with seed {}", settings, seed);

    let run = settings.run(seed)?;
    let text = render_run(&run, &args)?;

    if args.flag_text_out.is_empty() {
        println!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// Distances from the start, the solved path, or just the start and goal markers.
fn render_run(run: &MazeRun, maze_args: &MazeArgs) -> Result<String> {

    if maze_args.flag_show_distances {

        let distances = Distances::for_grid(&run.grid, run.start)
            .ok_or("The start of the maze is not an open cell.")?;
        Ok(run.grid.display_with(&distances).to_string())

    } else if maze_args.flag_show_path {

        let display_path = PathDisplay::new(&run.path);
        Ok(run.grid.display_with(&display_path).to_string())

    } else {

        let display_start_end_points = StartEndPointsDisplay::new(smallvec![run.start],
                                                                  smallvec![run.goal]);
        Ok(run.grid.display_with(&display_start_end_points).to_string())
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
