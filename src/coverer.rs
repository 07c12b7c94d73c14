use crate::grid::Grid;
use crate::strand::Strand;
use bitvec::{bitvec, vec::BitVec};
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// A set of strands whose cells exactly partition the grid.
pub type Cover = BTreeSet<Strand>;

/// Finds every subset of candidate strands that covers each grid cell exactly
/// once, with no two strands' paths crossing. This is Algorithm X over a
/// bitmask-per-strand representation, with MRV cell selection and unit
/// propagation; the bitmasks are sized to the grid, so there is no cap on the
/// number of cells.
pub struct Coverer<'a> {
    grid: &'a Grid,
}

struct CoverIndex {
    num_cells: usize,
    /// Per strand, one bit per grid cell it covers.
    masks: Vec<BitVec>,
    /// Per strand, the cell indices it covers (cheap overlap test).
    cells: Vec<Vec<usize>>,
    /// Per cell, the candidate strands covering it.
    cell_to_strands: Vec<Vec<usize>>,
}

impl CoverIndex {
    fn fits(&self, strand: usize, covered: &BitVec) -> bool {
        self.cells[strand].iter().all(|&cell| !covered[cell])
    }
}

impl<'a> Coverer<'a> {
    pub fn new(grid: &'a Grid) -> Coverer<'a> {
        Coverer { grid }
    }

    /// Find all exact covers of the grid, then discard covers containing a
    /// geometrically crossing pair of strands. Returns the empty set when no
    /// cover exists; that is a valid outcome, not an error.
    pub fn cover(&self, strands: &BTreeSet<Strand>) -> BTreeSet<Cover> {
        let strands: Vec<&Strand> = strands.iter().collect();
        info!("covering grid with {} candidate strands", strands.len());

        let index = self.build_index(&strands);
        let mut partial: Vec<usize> = Vec::new();
        let mut results: Vec<Vec<usize>> = Vec::new();
        search(
            &index,
            bitvec![0; index.num_cells],
            &mut partial,
            &mut results,
        );
        info!("found {} covers before the crossing filter", results.len());

        let covers: Vec<Cover> = results
            .iter()
            .map(|indices| indices.iter().map(|&i| strands[i].clone()).collect())
            .collect();
        let valid: BTreeSet<Cover> = covers
            .into_par_iter()
            .filter(|cover| !has_crossing(cover))
            .collect();
        info!("{} covers after the crossing filter", valid.len());
        valid
    }

    fn build_index(&self, strands: &[&Strand]) -> CoverIndex {
        let num_cells = self.grid.num_cells();
        let mut masks = Vec::with_capacity(strands.len());
        let mut cells = Vec::with_capacity(strands.len());
        let mut cell_to_strands: Vec<Vec<usize>> = vec![Vec::new(); num_cells];
        for (i, strand) in strands.iter().enumerate() {
            let mut mask = bitvec![0; num_cells];
            let mut strand_cells = Vec::with_capacity(strand.len());
            for &pos in strand.positions() {
                let cell = self.grid.cell_index(pos);
                mask.set(cell, true);
                strand_cells.push(cell);
                cell_to_strands[cell].push(i);
            }
            masks.push(mask);
            cells.push(strand_cells);
        }
        CoverIndex {
            num_cells,
            masks,
            cells,
            cell_to_strands,
        }
    }
}

/// One step of Algorithm X. `partial` is a single buffer shared by the whole
/// search; every exit path restores it to its entry length, so sibling
/// branches never see each other's strands. The covered mask is passed by
/// value, so branches can't corrupt it at all.
fn search(
    index: &CoverIndex,
    mut covered: BitVec,
    partial: &mut Vec<usize>,
    results: &mut Vec<Vec<usize>>,
) {
    let entry_len = partial.len();

    // Unit propagation: keep taking forced strands without branching until
    // the grid is covered, a cell dies, or a real choice appears. This
    // collapses long forced chains into one loop instead of one recursive
    // call each.
    let branch_cell = loop {
        if covered.all() {
            results.push(partial.clone());
            partial.truncate(entry_len);
            return;
        }

        // MRV: pick the uncovered cell with the fewest fitting strands, ties
        // broken by first cell index.
        let mut best: Option<(usize, usize, usize)> = None; // (count, cell, first strand)
        for cell in 0..index.num_cells {
            if covered[cell] {
                continue;
            }
            let limit = best.map_or(usize::MAX, |(count, _, _)| count);
            let mut count = 0;
            let mut first = 0;
            for &strand in &index.cell_to_strands[cell] {
                if index.fits(strand, &covered) {
                    if count == 0 {
                        first = strand;
                    }
                    count += 1;
                    if count >= limit {
                        break;
                    }
                }
            }
            if count == 0 {
                // Dead end: this cell can no longer be covered.
                partial.truncate(entry_len);
                return;
            }
            if count < limit {
                best = Some((count, cell, first));
                if count == 1 {
                    break;
                }
            }
        }
        let Some((count, cell, first)) = best else {
            // Unreachable: an uncovered cell either dead-ends or sets `best`.
            partial.truncate(entry_len);
            return;
        };
        if count == 1 {
            partial.push(first);
            covered = covered | index.masks[first].clone();
        } else {
            break cell;
        }
    };

    // Branch on every fitting strand for the most constrained cell.
    for &strand in &index.cell_to_strands[branch_cell] {
        if index.fits(strand, &covered) {
            partial.push(strand);
            search(
                index,
                covered.clone() | index.masks[strand].clone(),
                partial,
                results,
            );
            partial.pop();
        }
    }
    partial.truncate(entry_len);
}

/// Whether any two strands in the cover cross geometrically. Disjoint cells
/// don't rule this out, so it is a separate post-filter.
fn has_crossing(cover: &Cover) -> bool {
    cover
        .iter()
        .tuple_combinations()
        .any(|(a, b)| a.crosses(b))
}

#[cfg(test)]
use crate::grid::Pos;

#[cfg(test)]
fn strand(cells: &[(i32, i32)], string: &str) -> Strand {
    Strand::new(
        cells.iter().map(|&(x, y)| Pos::new(x, y)).collect(),
        string.to_owned(),
    )
}

#[cfg(test)]
fn assert_exact_cover(grid: &Grid, cover: &Cover) {
    let mut seen = BTreeSet::new();
    for strand in cover {
        for &pos in strand.positions() {
            assert!(seen.insert(pos), "cell {} covered twice", pos);
        }
    }
    assert_eq!(seen.len(), grid.num_cells(), "not every cell covered");
}

#[test]
fn test_finds_all_exact_covers() {
    let grid = Grid::parse("AB\nCD").unwrap();
    let ab = strand(&[(0, 0), (1, 0)], "AB");
    let cd = strand(&[(0, 1), (1, 1)], "CD");
    let abdc = strand(&[(0, 0), (1, 0), (1, 1), (0, 1)], "ABDC");
    let ac = strand(&[(0, 0), (0, 1)], "AC");

    let candidates: BTreeSet<Strand> =
        BTreeSet::from([ab.clone(), cd.clone(), abdc.clone(), ac.clone()]);
    let covers = Coverer::new(&grid).cover(&candidates);

    // {AB, CD} and {ABDC}; AC leaves B and D uncoverable.
    assert_eq!(covers.len(), 2);
    assert!(covers.contains(&Cover::from([ab, cd])));
    assert!(covers.contains(&Cover::from([abdc])));
    for cover in &covers {
        assert_exact_cover(&grid, cover);
    }
}

#[test]
fn test_crossing_covers_are_filtered() {
    // The two diagonals partition the cells but cross in the middle.
    let grid = Grid::parse("AB\nCD").unwrap();
    let down_diag = strand(&[(0, 0), (1, 1)], "AD");
    let up_diag = strand(&[(0, 1), (1, 0)], "CB");

    let candidates = BTreeSet::from([down_diag, up_diag]);
    assert!(Coverer::new(&grid).cover(&candidates).is_empty());
}

#[test]
fn test_unsatisfiable_is_empty_not_an_error() {
    let grid = Grid::parse("AB\nCD").unwrap();
    let ab = strand(&[(0, 0), (1, 0)], "AB");
    assert!(Coverer::new(&grid)
        .cover(&BTreeSet::from([ab]))
        .is_empty());
    assert!(Coverer::new(&grid).cover(&BTreeSet::new()).is_empty());
}

#[test]
fn test_overlapping_strands_never_share_a_cover() {
    let grid = Grid::parse("AB\nCD").unwrap();
    let abd = strand(&[(0, 0), (1, 0), (1, 1)], "ABD");
    let dc = strand(&[(1, 1), (0, 1)], "DC");
    let c = strand(&[(0, 1)], "C");

    let covers = Coverer::new(&grid).cover(&BTreeSet::from([abd.clone(), dc, c.clone()]));
    assert_eq!(covers.len(), 1);
    assert!(covers.contains(&Cover::from([abd, c])));
}
