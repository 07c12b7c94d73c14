//! Some word grids have one obvious fill. For all the others, this crate
//! finds every valid one.
//!
//! Given a rectangular grid of letters, a dictionary, and a target word
//! count, the solver finds every way to partition the grid's cells into
//! dictionary words such that no two words' paths cross and one word (the
//! "spangram", possibly a concatenation of several strands) touches two
//! opposite edges of the grid.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! - [`WordFinder`] enumerates every [`Strand`] (a path of cells spelling a
//!   dictionary word) by depth-first search from every cell, pruned by
//!   dictionary-prefix lookups.
//! - [`Coverer`] finds every subset of those strands that covers each grid
//!   cell exactly once ([`Cover`]s), Algorithm X style, and drops covers
//!   whose strands cross geometrically.
//! - [`SpangramFinder`] turns covers into [`Solution`]s by choosing, or
//!   merging a chain of strands into, a valid spangram.
//!
//! Ranking solutions, fetching puzzles, and rendering results are all
//! external concerns; the crate is a pure in-memory computation.
//!
//! ## Solving a puzzle
//!
//! ```
//! use strands_solver::{Dictionary, Grid, Solver};
//!
//! let grid = Grid::parse("WATERTOAD\nFROGMELON").unwrap();
//! let dictionary = Dictionary::new(["water", "melon", "toad", "frog"]);
//!
//! let solver = Solver::new(grid, dictionary, 3);
//! let solutions = solver.solve().unwrap();
//!
//! let spangrams: Vec<String> = solutions
//!     .iter()
//!     .map(|solution| solution.merged_spangram().string().to_owned())
//!     .collect();
//! assert!(spangrams.contains(&"WATERMELON".to_owned()));
//! ```
//!
//! Every run over the same inputs produces the identical solution set: the
//! pipeline is deterministic and all result collections are ordered.

mod coverer;
mod dictionary;
mod grid;
mod spangram_finder;
mod strand;
mod word_finder;

pub use coverer::{Cover, Coverer};
pub use dictionary::Dictionary;
pub use grid::{Direction, Grid, Pos};
pub use spangram_finder::{Solution, SpangramFinder, SpangramPolicy};
pub use strand::Strand;
pub use word_finder::WordFinder;

use log::info;
use std::collections::BTreeSet;

/// Errors for malformed inputs. An unsatisfiable puzzle is never an error:
/// "no solution" is a first-class outcome, reported as an empty set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for the full pipeline. Set these via [`Solver::options`].
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Minimum length for a standalone word.
    pub min_word_length: usize,
    /// Spangram composition rules.
    pub spangram: SpangramPolicy,
}

impl Default for SolverOptions {
    fn default() -> SolverOptions {
        SolverOptions {
            min_word_length: 4,
            spangram: SpangramPolicy::default(),
        }
    }
}

/// The full pipeline: word search, exact cover, spangram composition.
pub struct Solver {
    grid: Grid,
    dictionary: Dictionary,
    num_words: usize,
    options: SolverOptions,
}

impl Solver {
    /// Construct a solver for one puzzle: a grid, a dictionary, and the
    /// number of words the solution must consist of (counting a concatenated
    /// spangram as one word).
    pub fn new(grid: Grid, dictionary: Dictionary, num_words: usize) -> Solver {
        Solver {
            grid,
            dictionary,
            num_words,
            options: SolverOptions::default(),
        }
    }

    pub fn options(&mut self) -> &mut SolverOptions {
        &mut self.options
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Run the pipeline and return every valid solution. The set is empty
    /// when the puzzle is unsatisfiable.
    pub fn solve(&self) -> Result<BTreeSet<Solution>, Error> {
        let finder = WordFinder::new(&self.grid, &self.dictionary, self.options.min_word_length)?;
        let words = finder.find_all_words();
        info!("found {} words", words.len());

        let covers = Coverer::new(&self.grid).cover(&words);
        info!("found {} covers", covers.len());

        let spangram_finder = SpangramFinder::new(
            &self.grid,
            self.num_words,
            self.options.min_word_length,
            self.options.spangram.clone(),
        )?;
        let solutions = spangram_finder.find_spangrams(&covers);
        info!("found {} solutions", solutions.len());

        Ok(solutions)
    }
}
