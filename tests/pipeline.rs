//! End-to-end tests of the WordFinder -> Coverer -> SpangramFinder pipeline.

use std::collections::BTreeSet;

use strands_solver::{
    Cover, Coverer, Dictionary, Error, Grid, Pos, Solution, Solver, Strand, WordFinder,
};

fn strand(cells: &[(i32, i32)], string: &str) -> Strand {
    Strand::new(
        cells.iter().map(|&(x, y)| Pos::new(x, y)).collect(),
        string.to_owned(),
    )
}

/// Check every invariant a solution must satisfy: a true spangram, no
/// crossings, the right word count, and an exact partition of the grid.
fn assert_valid_solution(grid: &Grid, solution: &Solution, num_words: usize) {
    let spangram = solution.merged_spangram();
    assert!(spangram.is_spangram(grid.rows(), grid.cols()));
    assert!(!spangram.has_self_crossing());
    for other in solution.non_spangram_strands() {
        assert!(!spangram.crosses(other));
        for another in solution.non_spangram_strands() {
            if other != another {
                assert!(!other.crosses(another));
            }
        }
    }
    assert_eq!(solution.num_words(), num_words);

    let mut seen = BTreeSet::new();
    let all_positions = spangram.positions().iter().chain(
        solution
            .non_spangram_strands()
            .iter()
            .flat_map(|s| s.positions()),
    );
    for &pos in all_positions {
        assert!(seen.insert(pos), "cell {} used twice", pos);
    }
    assert_eq!(seen.len(), grid.num_cells(), "not every cell used");
}

#[test]
fn four_row_grid_has_a_unique_cover() {
    let grid = Grid::parse("WORD\nTEST\nCOOL\nEASY").unwrap();
    let dictionary = Dictionary::new(["WORD", "TEST", "COOL", "EASY"]);

    let words = WordFinder::new(&grid, &dictionary, 4)
        .unwrap()
        .find_all_words();
    assert_eq!(words.len(), 4);

    let covers = Coverer::new(&grid).cover(&words);
    let expected: Cover = Cover::from([
        strand(&[(0, 0), (1, 0), (2, 0), (3, 0)], "WORD"),
        strand(&[(0, 1), (1, 1), (2, 1), (3, 1)], "TEST"),
        strand(&[(0, 2), (1, 2), (2, 2), (3, 2)], "COOL"),
        strand(&[(0, 3), (1, 3), (2, 3), (3, 3)], "EASY"),
    ]);
    assert_eq!(covers, BTreeSet::from([expected]));
}

#[test]
fn four_row_grid_solutions() {
    // With four columns every row word touches both the left and right
    // edges, so each of the four rows can serve as the spangram.
    let grid = Grid::parse("WORD\nTEST\nCOOL\nEASY").unwrap();
    let dictionary = Dictionary::new(["WORD", "TEST", "COOL", "EASY"]);
    let solver = Solver::new(grid.clone(), dictionary, 4);

    let solutions = solver.solve().unwrap();
    assert_eq!(solutions.len(), 4);
    let spangrams: BTreeSet<&str> = solutions
        .iter()
        .map(|s| s.spangram()[0].string())
        .collect();
    assert_eq!(spangrams, BTreeSet::from(["WORD", "TEST", "COOL", "EASY"]));
    for solution in &solutions {
        assert_eq!(solution.spangram().len(), 1);
        assert_valid_solution(&grid, solution, 4);
    }
}

#[test]
fn watermelon_spangram_is_found() {
    let grid = Grid::parse("WATERTOAD\nFROGMELON").unwrap();
    let dictionary = Dictionary::new(["WATER", "MELON", "TOAD", "FROG"]);
    let solver = Solver::new(grid.clone(), dictionary, 3);

    let solutions = solver.solve().unwrap();
    let expected = Solution::new(
        vec![
            strand(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)], "WATER"),
            strand(&[(4, 1), (5, 1), (6, 1), (7, 1), (8, 1)], "MELON"),
        ],
        BTreeSet::from([
            strand(&[(5, 0), (6, 0), (7, 0), (8, 0)], "TOAD"),
            strand(&[(0, 1), (1, 1), (2, 1), (3, 1)], "FROG"),
        ]),
    );
    assert!(solutions.contains(&expected));
    assert_eq!(
        expected.merged_spangram().string(),
        "WATERMELON"
    );

    // The rules also admit WATERTOAD and FROGMELON as left-to-right chains;
    // all returned solutions must be valid.
    assert_eq!(solutions.len(), 3);
    for solution in &solutions {
        assert_valid_solution(&grid, solution, 3);
    }
}

#[test]
fn pipeline_is_deterministic() {
    let grid = Grid::parse("WATERTOAD\nFROGMELON").unwrap();
    let dictionary = Dictionary::new(["WATER", "MELON", "TOAD", "FROG"]);

    let first = Solver::new(grid.clone(), dictionary.clone(), 3)
        .solve()
        .unwrap();
    let second = Solver::new(grid, dictionary, 3).solve().unwrap();
    assert_eq!(first, second);
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
}

#[test]
fn solutions_are_deduplicated() {
    // No two returned solutions may share an equivalence key: the same
    // spangram cell assignment with the same remaining strands. This is the
    // observable form of dedup idempotence.
    let grid = Grid::parse("WATERTOAD\nFROGMELON").unwrap();
    let dictionary = Dictionary::new(["WATER", "MELON", "TOAD", "FROG"]);
    let solutions = Solver::new(grid, dictionary, 3).solve().unwrap();

    let mut keys = BTreeSet::new();
    for solution in &solutions {
        let spangram_cells: BTreeSet<Pos> = solution
            .merged_spangram()
            .positions()
            .iter()
            .copied()
            .collect();
        let key = (spangram_cells, solution.non_spangram_strands().clone());
        assert!(keys.insert(key), "two solutions are equivalent");
    }
}

#[test]
fn no_words_means_no_solutions() {
    let grid = Grid::parse("WATERTOAD\nFROGMELON").unwrap();
    let solver = Solver::new(grid, Dictionary::new(Vec::<String>::new()), 3);
    assert!(solver.solve().unwrap().is_empty());
}

#[test]
fn unsatisfiable_grid_means_no_solutions() {
    // The dictionary words cannot cover the X cells.
    let grid = Grid::parse("CATXX\nDOGXX").unwrap();
    let dictionary = Dictionary::new(["CAT", "DOG"]);
    let solver = Solver::new(grid, dictionary, 2);
    assert!(solver.solve().unwrap().is_empty());
}

#[test]
fn invalid_configuration_is_an_error() {
    let grid = Grid::parse("WORD").unwrap();
    let dictionary = Dictionary::new(["WORD"]);

    let mut solver = Solver::new(grid.clone(), dictionary.clone(), 1);
    solver.options().min_word_length = 0;
    assert!(matches!(solver.solve(), Err(Error::InvalidConfig(_))));

    let mut solver = Solver::new(grid, dictionary, 1);
    solver.options().spangram.max_words = 0;
    assert!(matches!(solver.solve(), Err(Error::InvalidConfig(_))));
}
