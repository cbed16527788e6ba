//! **maze_engine** generates perfect rectilinear mazes, refines their dead ends and solves them.
//!
//! Every call is synchronous and takes its randomness as an explicit seeded source, so the same
//! seed always reproduces the same maze.

#![recursion_limit = "1024"]

pub mod cells;
pub mod disjoint_set;
pub mod engine;
pub mod events;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod path_queue;
pub mod pathing;
pub mod refinement;
pub mod settings;
pub mod units;
pub mod utils;

pub mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    use crate::cells::GridCoordinate;
    use crate::grid::MIN_DIMENSION;
    use error_chain::error_chain;

    error_chain! {
        errors {
            InvalidDimensions(width: usize, height: usize) {
                description("maze dimensions below the minimum viable size")
                display("invalid maze dimensions {}x{}, width and height must both be at least {}",
                        width, height, MIN_DIMENSION)
            }
            RaggedRows(row: usize, length: usize, expected: usize) {
                description("grid rows of differing lengths")
                display("grid row {} has {} cells but the first row has {}", row, length, expected)
            }
            UnreachableGoal(goal: GridCoordinate) {
                description("no path from start to goal")
                display("goal {} is not reachable from the start", goal)
            }
            UnknownSetting(kind: &'static str, value: String) {
                description("unrecognised setting value")
                display("unknown {} '{}'", kind, value)
            }
        }
    }
}
