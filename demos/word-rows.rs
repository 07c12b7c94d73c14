//! Solve a 4x4 grid whose only exact cover is its four rows. With four
//! columns every row word touches both side edges, so each row can play the
//! spangram.

use strands_solver::{Dictionary, Grid, Solver};

fn main() {
    env_logger::init();

    let grid = Grid::parse("WORD\nTEST\nCOOL\nEASY").expect("valid grid");
    println!("Solving:");
    println!("{}", grid);

    let dictionary = Dictionary::new(["WORD", "TEST", "COOL", "EASY"]);
    let solver = Solver::new(grid, dictionary, 4);
    let solutions = solver.solve().expect("valid configuration");

    println!("{} solutions:", solutions.len());
    for solution in &solutions {
        println!("{}", solution);
    }
}
