use crate::coverer::Cover;
use crate::grid::{Grid, Pos};
use crate::strand::Strand;
use crate::Error;
use itertools::Itertools;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Rules for which words may only appear inside a concatenated spangram.
/// These mirror real-puzzle conventions rather than logical necessities, so
/// they are policy, not law; a puzzle variant can switch them off.
#[derive(Debug, Clone)]
pub struct SpangramPolicy {
    /// The most strands that may be merged into one spangram. Purely a
    /// tractability bound: spangrams fragmented into many short words make
    /// the subset search explode.
    pub max_words: usize,
    /// Words shorter than the minimum word length never stand alone.
    pub short_words_spangram_only: bool,
    /// Words that appear at more than one distinct cell-set never stand
    /// alone.
    pub duplicate_words_spangram_only: bool,
}

impl Default for SpangramPolicy {
    fn default() -> SpangramPolicy {
        SpangramPolicy {
            max_words: 5,
            short_words_spangram_only: true,
            duplicate_words_spangram_only: true,
        }
    }
}

/// A full assignment of the grid: an ordered chain of strands forming the
/// spangram, plus the remaining strands. The spangram counts as one word, so
/// a solution has `1 + non_spangram_strands.len()` words.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Solution {
    spangram: Vec<Strand>,
    non_spangram_strands: BTreeSet<Strand>,
}

impl Solution {
    pub fn new(spangram: Vec<Strand>, non_spangram_strands: BTreeSet<Strand>) -> Solution {
        assert!(!spangram.is_empty(), "a solution must have a spangram");
        Solution {
            spangram,
            non_spangram_strands,
        }
    }

    /// The spangram as the chain of strands it was merged from.
    pub fn spangram(&self) -> &[Strand] {
        &self.spangram
    }

    /// The spangram as a single concatenated strand.
    pub fn merged_spangram(&self) -> Strand {
        self.spangram[0].concatenate(self.spangram[1..].iter())
    }

    pub fn non_spangram_strands(&self) -> &BTreeSet<Strand> {
        &self.non_spangram_strands
    }

    pub fn num_words(&self) -> usize {
        1 + self.non_spangram_strands.len()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "spangram {}", self.merged_spangram().string())?;
        if self.spangram.len() > 1 {
            let parts: Vec<&str> = self.spangram.iter().map(|s| s.string()).collect();
            write!(f, " ({})", parts.join("+"))?;
        }
        for strand in &self.non_spangram_strands {
            write!(f, ", {}", strand.string())?;
        }
        Ok(())
    }
}

/// Turns exact covers into solutions: picks (or merges) a spangram in each
/// cover that has the right word count, then deduplicates geometrically
/// equivalent results.
pub struct SpangramFinder<'a> {
    grid: &'a Grid,
    num_words: usize,
    min_word_length: usize,
    policy: SpangramPolicy,
}

impl<'a> SpangramFinder<'a> {
    pub fn new(
        grid: &'a Grid,
        num_words: usize,
        min_word_length: usize,
        policy: SpangramPolicy,
    ) -> Result<SpangramFinder<'a>, Error> {
        if num_words == 0 {
            return Err(Error::InvalidConfig(
                "a solution must have at least 1 word".to_owned(),
            ));
        }
        if policy.max_words == 0 {
            return Err(Error::InvalidConfig(
                "a spangram must be allowed at least 1 word".to_owned(),
            ));
        }
        Ok(SpangramFinder {
            grid,
            num_words,
            min_word_length,
            policy,
        })
    }

    /// Find every solution whose strands are exactly one cover's strands,
    /// where only the spangram may be a concatenation of several of them.
    pub fn find_spangrams(&self, covers: &BTreeSet<Cover>) -> BTreeSet<Solution> {
        let spangram_only = self.spangram_only_strings(covers);

        let mut solutions = BTreeSet::new();
        for cover in covers {
            self.solutions_for_cover(cover, &spangram_only, &mut solutions);
        }
        info!("found {} solutions before dedup", solutions.len());

        let deduped = dedup_solutions(solutions);
        info!("{} solutions after dedup", deduped.len());
        deduped
    }

    /// The word strings that may only appear inside a spangram: words shorter
    /// than the minimum word length, and words spellable at more than one
    /// distinct cell-set anywhere in the covers' candidate pool.
    fn spangram_only_strings(&self, covers: &BTreeSet<Cover>) -> BTreeSet<String> {
        let mut placements: BTreeMap<&str, BTreeSet<&[Pos]>> = BTreeMap::new();
        for cover in covers {
            for strand in cover {
                placements
                    .entry(strand.string())
                    .or_default()
                    .insert(strand.positions());
            }
        }

        let mut result = BTreeSet::new();
        for (string, cell_sets) in placements {
            let short =
                self.policy.short_words_spangram_only && string.len() < self.min_word_length;
            let duplicate = self.policy.duplicate_words_spangram_only
                && cell_sets
                    .iter()
                    .map(|positions| positions.iter().collect::<BTreeSet<_>>())
                    .unique()
                    .count()
                    > 1;
            if short || duplicate {
                result.insert(string.to_owned());
            }
        }
        result
    }

    fn solutions_for_cover(
        &self,
        cover: &Cover,
        spangram_only: &BTreeSet<String>,
        out: &mut BTreeSet<Solution>,
    ) {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());

        // Too few strands can never reach the word count.
        if cover.len() < self.num_words {
            return;
        }

        if cover.len() == self.num_words {
            // No merging needed: any member that is itself a spangram yields
            // a solution, unless a leftover word is spangram-only.
            for strand in cover {
                if !strand.is_spangram(rows, cols) {
                    continue;
                }
                let rest: BTreeSet<Strand> =
                    cover.iter().filter(|s| *s != strand).cloned().collect();
                if rest.iter().any(|s| spangram_only.contains(s.string())) {
                    continue;
                }
                out.insert(Solution::new(vec![strand.clone()], rest));
            }
            return;
        }

        // Too many strands: merge a chain of k of them into the spangram.
        let k = cover.len() - self.num_words + 1;
        if k > self.policy.max_words {
            return;
        }

        // Spangram-only strands must all end up inside the merge.
        let forced: Vec<&Strand> = cover
            .iter()
            .filter(|s| spangram_only.contains(s.string()))
            .collect();
        if forced.len() > k {
            return;
        }
        let ordinary: Vec<&Strand> = cover
            .iter()
            .filter(|s| !spangram_only.contains(s.string()))
            .collect();

        // Directed adjacency: a -> b iff b's first cell can follow a's last.
        let members: Vec<&Strand> = cover.iter().collect();
        let mut adjacency: BTreeMap<&Strand, Vec<&Strand>> = BTreeMap::new();
        for &a in &members {
            let nexts = members
                .iter()
                .copied()
                .filter(|&b| b != a && a.links_to(b))
                .collect();
            adjacency.insert(a, nexts);
        }

        for extra in ordinary.iter().copied().combinations(k - forced.len()) {
            let mut chosen = forced.clone();
            chosen.extend(extra);
            let chosen_set: BTreeSet<&Strand> = chosen.iter().copied().collect();
            let rest: BTreeSet<Strand> = cover
                .iter()
                .filter(|s| !chosen_set.contains(s))
                .cloned()
                .collect();

            for ordering in chain_orderings(&chosen, &adjacency) {
                let merged = ordering[0].concatenate(ordering[1..].iter().copied());
                if !merged.is_spangram(rows, cols) {
                    continue;
                }
                // The merge introduces junction segments the cover-level
                // crossing filter never saw.
                if merged.has_self_crossing() {
                    continue;
                }
                if rest.iter().any(|s| merged.crosses(s)) {
                    continue;
                }
                let spangram = ordering.iter().map(|&s| s.clone()).collect();
                out.insert(Solution::new(spangram, rest.clone()));
            }
        }
    }
}

/// All orderings of `chosen` in which each strand links to the next, found by
/// depth-first traversal of the adjacency graph restricted to `chosen`.
/// Adjacency-constrained orderings are typically one or a handful, where full
/// permutations would be k factorial.
fn chain_orderings<'c>(
    chosen: &[&'c Strand],
    adjacency: &BTreeMap<&'c Strand, Vec<&'c Strand>>,
) -> Vec<Vec<&'c Strand>> {
    let mut result = Vec::new();
    for &start in chosen {
        let mut chain = vec![start];
        let mut remaining: BTreeSet<&Strand> = chosen
            .iter()
            .copied()
            .filter(|&s| s != start)
            .collect();
        extend_chain(&mut chain, &mut remaining, adjacency, &mut result);
    }
    result
}

fn extend_chain<'c>(
    chain: &mut Vec<&'c Strand>,
    remaining: &mut BTreeSet<&'c Strand>,
    adjacency: &BTreeMap<&'c Strand, Vec<&'c Strand>>,
    result: &mut Vec<Vec<&'c Strand>>,
) {
    if remaining.is_empty() {
        result.push(chain.clone());
        return;
    }
    let last = chain[chain.len() - 1];
    for &next in &adjacency[last] {
        if remaining.remove(next) {
            chain.push(next);
            extend_chain(chain, remaining, adjacency, result);
            chain.pop();
            remaining.insert(next);
        }
    }
}

/// Collapse solutions that assign the same cells to the spangram and keep the
/// same remaining strands, keeping the least solution of each class. Because
/// the representative is itself a member of the class, running the dedup
/// again changes nothing.
fn dedup_solutions(solutions: BTreeSet<Solution>) -> BTreeSet<Solution> {
    let mut by_key: BTreeMap<(BTreeSet<Pos>, BTreeSet<Strand>), Solution> = BTreeMap::new();
    for solution in solutions {
        let key = (
            solution
                .spangram
                .iter()
                .flat_map(|s| s.positions().iter().copied())
                .collect(),
            solution.non_spangram_strands.clone(),
        );
        // Ascending iteration: the first solution per key is the least.
        by_key.entry(key).or_insert(solution);
    }
    by_key.into_values().collect()
}

#[cfg(test)]
fn strand(cells: &[(i32, i32)], string: &str) -> Strand {
    Strand::new(
        cells.iter().map(|&(x, y)| Pos::new(x, y)).collect(),
        string.to_owned(),
    )
}

#[cfg(test)]
fn watermelon_cover() -> (Grid, Cover) {
    let grid = Grid::parse("WATERTOAD\nFROGMELON").unwrap();
    let water = strand(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)], "WATER");
    let toad = strand(&[(5, 0), (6, 0), (7, 0), (8, 0)], "TOAD");
    let frog = strand(&[(0, 1), (1, 1), (2, 1), (3, 1)], "FROG");
    let melon = strand(&[(4, 1), (5, 1), (6, 1), (7, 1), (8, 1)], "MELON");
    (grid, Cover::from([water, toad, frog, melon]))
}

#[test]
fn test_merges_chains_into_spangrams() {
    let (grid, cover) = watermelon_cover();
    let finder = SpangramFinder::new(&grid, 3, 4, SpangramPolicy::default()).unwrap();
    let solutions = finder.find_spangrams(&BTreeSet::from([cover]));

    // Three pairs of strands link end to end, and each merged chain spans the
    // grid left to right.
    let spangrams: BTreeSet<String> = solutions
        .iter()
        .map(|s| s.merged_spangram().string().to_owned())
        .collect();
    assert_eq!(
        spangrams,
        BTreeSet::from([
            "FROGMELON".to_owned(),
            "WATERMELON".to_owned(),
            "WATERTOAD".to_owned(),
        ])
    );
    for solution in &solutions {
        assert_eq!(solution.num_words(), 3);
        assert!(!solution.merged_spangram().has_self_crossing());
    }
}

#[test]
fn test_word_count_bounds() {
    let (grid, cover) = watermelon_cover();
    let covers = BTreeSet::from([cover]);

    // Five words can never come from a four-strand cover.
    let finder = SpangramFinder::new(&grid, 5, 4, SpangramPolicy::default()).unwrap();
    assert!(finder.find_spangrams(&covers).is_empty());

    // One word would need a four-strand merge; cap the spangram below that.
    let policy = SpangramPolicy {
        max_words: 3,
        ..SpangramPolicy::default()
    };
    let finder = SpangramFinder::new(&grid, 1, 4, policy).unwrap();
    assert!(finder.find_spangrams(&covers).is_empty());
}

#[test]
fn test_exact_word_count_uses_single_strand_spangram() {
    let grid = Grid::parse("CAT\nDOG").unwrap();
    let cat = strand(&[(0, 0), (1, 0), (2, 0)], "CAT");
    let dog = strand(&[(0, 1), (1, 1), (2, 1)], "DOG");
    let covers = BTreeSet::from([Cover::from([cat.clone(), dog.clone()])]);

    // Both words span left to right, but both are shorter than the minimum
    // word length, so neither may stand alone next to the other's spangram.
    let finder = SpangramFinder::new(&grid, 2, 4, SpangramPolicy::default()).unwrap();
    assert!(finder.find_spangrams(&covers).is_empty());

    // Switching the short-word rule off allows both solutions.
    let policy = SpangramPolicy {
        short_words_spangram_only: false,
        ..SpangramPolicy::default()
    };
    let finder = SpangramFinder::new(&grid, 2, 4, policy).unwrap();
    let solutions = finder.find_spangrams(&covers);
    assert_eq!(solutions.len(), 2);
    assert!(solutions.contains(&Solution::new(
        vec![cat.clone()],
        BTreeSet::from([dog.clone()])
    )));
    assert!(solutions.contains(&Solution::new(vec![dog], BTreeSet::from([cat]))));
}

#[test]
fn test_duplicate_words_must_join_the_spangram() {
    // ON appears at two distinct cell-sets across the covers, so it can only
    // appear merged into a spangram.
    let grid = Grid::parse("ONON").unwrap();
    let on_left = strand(&[(0, 0), (1, 0)], "ON");
    let on_right = strand(&[(2, 0), (3, 0)], "ON");
    let onon = strand(&[(0, 0), (1, 0), (2, 0), (3, 0)], "ONON");
    let no_backwards = strand(&[(3, 0), (2, 0)], "NO");
    let covers = BTreeSet::from([
        Cover::from([on_left.clone(), on_right.clone()]),
        Cover::from([on_left.clone(), no_backwards.clone()]),
        Cover::from([onon.clone()]),
    ]);

    let policy = SpangramPolicy {
        short_words_spangram_only: false,
        ..SpangramPolicy::default()
    };
    let finder = SpangramFinder::new(&grid, 1, 2, policy).unwrap();
    let solutions = finder.find_spangrams(&covers);

    // {ON, ON} merges into a spangram; {ON, NO} would leave no valid merge
    // ordering (NO's first cell doesn't follow ON's last); {ONON} stands on
    // its own. The merged ONON and the single-strand ONON dedup to one.
    assert_eq!(solutions.len(), 1);
    let solution = solutions.iter().next().unwrap();
    assert_eq!(solution.merged_spangram().string(), "ONON");
    assert!(solution.non_spangram_strands().is_empty());
}

#[test]
fn test_invalid_configurations() {
    let grid = Grid::parse("AB").unwrap();
    assert!(matches!(
        SpangramFinder::new(&grid, 0, 4, SpangramPolicy::default()),
        Err(Error::InvalidConfig(_))
    ));
    let policy = SpangramPolicy {
        max_words: 0,
        ..SpangramPolicy::default()
    };
    assert!(matches!(
        SpangramFinder::new(&grid, 3, 4, policy),
        Err(Error::InvalidConfig(_))
    ));
}
