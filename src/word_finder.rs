use crate::dictionary::Dictionary;
use crate::grid::{Direction, Grid, Pos};
use crate::strand::Strand;
use crate::Error;
use log::debug;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Enumerates every strand in a grid that spells a dictionary word, by
/// depth-first search in all 8 directions from every starting cell.
pub struct WordFinder<'a> {
    grid: &'a Grid,
    dictionary: &'a Dictionary,
    min_length: usize,
}

impl<'a> WordFinder<'a> {
    pub fn new(
        grid: &'a Grid,
        dictionary: &'a Dictionary,
        min_length: usize,
    ) -> Result<WordFinder<'a>, Error> {
        if min_length == 0 {
            return Err(Error::InvalidConfig(
                "minimum word length must be at least 1".to_owned(),
            ));
        }
        Ok(WordFinder {
            grid,
            dictionary,
            min_length,
        })
    }

    /// Find all strands spelling a dictionary word of at least `min_length`
    /// letters. Strands covering the same cells with the same string in a
    /// different order (possible through palindromic-adjacent letters) are
    /// collapsed to the lexicographically least position sequence.
    pub fn find_all_words(&self) -> BTreeSet<Strand> {
        let starts: Vec<Pos> = self.grid.positions().collect();
        let words = starts
            .par_iter()
            .map(|&start| {
                let mut found = BTreeSet::new();
                let seed = Strand::new(vec![start], self.grid.letter(start).to_string());
                self.extend(seed, &mut found);
                found
            })
            .reduce(BTreeSet::new, |mut acc, found| {
                acc.extend(found);
                acc
            });

        // BTreeSet iteration is sorted, so the first strand seen for each
        // (cell-set, string) key has the least position sequence.
        let mut unique: BTreeMap<(BTreeSet<Pos>, String), Strand> = BTreeMap::new();
        for strand in words {
            let key = (
                strand.positions().iter().copied().collect(),
                strand.string().to_owned(),
            );
            unique.entry(key).or_insert(strand);
        }
        unique.into_values().collect()
    }

    fn extend(&self, candidate: Strand, found: &mut BTreeSet<Strand>) {
        // The prefix test is the dominant pruning and must come before
        // anything else; without it the search is exponential in grid size.
        if !self.dictionary.is_prefix(candidate.string()) {
            return;
        }
        if candidate.has_self_crossing() {
            return;
        }

        if candidate.len() >= self.min_length && self.dictionary.contains(candidate.string()) {
            debug!("found word: {}", candidate.string());
            found.insert(candidate.clone());
        }

        let last = candidate.last();
        for dir in Direction::ALL {
            let next = last.step(dir);
            if !self.grid.contains(next) {
                continue;
            }
            if candidate.positions().contains(&next) {
                continue;
            }
            self.extend(candidate.extended(next, self.grid.letter(next)), found);
        }
    }
}

#[test]
fn test_finds_row_words() {
    let grid = Grid::parse("CAT\nDOG").unwrap();
    let dict = Dictionary::new(["CAT", "DOG", "COD"]);
    let finder = WordFinder::new(&grid, &dict, 3).unwrap();
    let words = finder.find_all_words();

    let strings: BTreeSet<&str> = words.iter().map(|s| s.string()).collect();
    // COD is spellable too: C(0,0) -> O(1,1) -> D(0,1).
    assert_eq!(strings, BTreeSet::from(["CAT", "COD", "DOG"]));
}

#[test]
fn test_min_length() {
    let grid = Grid::parse("CAT\nDOG").unwrap();
    let dict = Dictionary::new(["AT", "CAT"]);
    let finder = WordFinder::new(&grid, &dict, 3).unwrap();
    let strings: Vec<String> = finder
        .find_all_words()
        .iter()
        .map(|s| s.string().to_owned())
        .collect();
    assert_eq!(strings, ["CAT"]);

    assert!(matches!(
        WordFinder::new(&grid, &dict, 0),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_empty_dictionary_is_not_an_error() {
    let grid = Grid::parse("CAT").unwrap();
    let dict = Dictionary::new(Vec::<String>::new());
    let finder = WordFinder::new(&grid, &dict, 4).unwrap();
    assert!(finder.find_all_words().is_empty());
}

#[test]
fn test_dedups_same_cells_same_string() {
    // "AA" can be traced in both directions through the same two cells; only
    // the lexicographically least path survives.
    let grid = Grid::parse("AA").unwrap();
    let dict = Dictionary::new(["AA"]);
    let finder = WordFinder::new(&grid, &dict, 2).unwrap();
    let words: Vec<Strand> = finder.find_all_words().into_iter().collect();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].positions(), [Pos::new(0, 0), Pos::new(1, 0)]);
}

#[test]
fn test_self_crossing_paths_are_pruned() {
    // The only way to spell ABCD is the hourglass path
    // (0,1) -> (1,0) -> (0,0) -> (1,1), which crosses itself.
    let grid = Grid::parse("CB\nAD").unwrap();
    let dict = Dictionary::new(["ABCD"]);
    let finder = WordFinder::new(&grid, &dict, 4).unwrap();
    assert!(finder.find_all_words().is_empty());
}
