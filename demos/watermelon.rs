//! Solve a tiny two-row puzzle whose intended spangram is WATERMELON.
//!
//! Run with `RUST_LOG=info` to see the pipeline's stage counts.

use strands_solver::{Dictionary, Grid, Solver};

fn main() {
    env_logger::init();

    let grid = Grid::parse("WATERTOAD\nFROGMELON").expect("valid grid");
    println!("Solving:");
    println!("{}", grid);

    let dictionary = Dictionary::new(["WATER", "MELON", "TOAD", "FROG"]);
    let solver = Solver::new(grid, dictionary, 3);
    let solutions = solver.solve().expect("valid configuration");

    if solutions.is_empty() {
        println!("No solutions");
    } else {
        for solution in &solutions {
            println!("{}", solution);
        }
    }
}
