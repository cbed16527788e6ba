use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use maze_engine::cells::GridCoordinate;
use maze_engine::engine;
use maze_engine::generators::MazeAlgorithm;
use maze_engine::grid::Grid;
use maze_engine::pathing::{self, AStarSolver, BacktrackSolver, BreadthFirstSolver, Distances,
                           MazeSolver};
use maze_engine::refinement::RefineMode;

fn large_maze() -> (Grid, GridCoordinate, GridCoordinate) {
    let (g, start) = engine::generate(351, 351, MazeAlgorithm::Backtrack, 7).unwrap();
    let goal = engine::furthest_from(&g, start);
    (g, start, goal)
}

fn bench_distances(c: &mut Criterion) {
    c.bench_function("distances", |b| {
        let (g, start, _) = large_maze();
        b.iter(|| Distances::for_grid(&g, start))
    });
}

fn bench_furthest_points(c: &mut Criterion) {
    c.bench_function("furthest_points", |b| {
        let (g, start, _) = large_maze();
        let distances = Distances::for_grid(&g, start).unwrap();
        b.iter(|| distances.furthest_points_on_grid())
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    c.bench_function("shortest_path", |b| {
        let (g, start, goal) = large_maze();
        let distances = Distances::for_grid(&g, start).unwrap();
        b.iter(|| pathing::shortest_path(&g, &distances, goal))
    });
}

fn bench_solvers(c: &mut Criterion) {
    let (g, start, goal) = large_maze();
    let looped = engine::refine(g.clone(), start, goal, 2000, RefineMode::Open, 7);
    let solvers: Vec<Box<dyn MazeSolver>> = vec![Box::new(AStarSolver),
                                                 Box::new(BacktrackSolver::new()),
                                                 Box::new(BreadthFirstSolver)];
    for solver in &solvers {
        c.bench_function(&format!("{} solve", solver.name()), |b| {
            b.iter(|| solver.solve(&g, start, goal))
        });
        c.bench_function(&format!("{} solve with loops", solver.name()), |b| {
            b.iter(|| solver.solve(&looped, start, goal))
        });
    }
}

criterion_group!(benches,
    bench_distances,
    bench_furthest_points,
    bench_shortest_path,
    bench_solvers
);
criterion_main!(benches);
