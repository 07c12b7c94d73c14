use crate::grid::Pos;
use std::fmt;

/// An ordered path of grid cells and the word it spells.
///
/// Strands are immutable values. Equality, ordering and hashing are all
/// structural over `(positions, string)`, so two strands tracing the same
/// cells in different orders are distinct values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Strand {
    positions: Vec<Pos>,
    string: String,
}

impl Strand {
    /// Construct a strand. Panics if `positions` is empty or its length
    /// doesn't match the string's letter count.
    pub fn new(positions: Vec<Pos>, string: String) -> Strand {
        assert!(!positions.is_empty(), "a strand must cover at least one cell");
        assert_eq!(
            positions.len(),
            string.chars().count(),
            "a strand must have one position per letter"
        );
        Strand { positions, string }
    }

    /// A new strand with one more cell on the end.
    pub(crate) fn extended(&self, pos: Pos, letter: char) -> Strand {
        let mut positions = self.positions.clone();
        positions.push(pos);
        let mut string = self.string.clone();
        string.push(letter);
        Strand { positions, string }
    }

    pub fn positions(&self) -> &[Pos] {
        &self.positions
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        false // strands are never empty by construction
    }

    pub fn first(&self) -> Pos {
        self.positions[0]
    }

    pub fn last(&self) -> Pos {
        self.positions[self.positions.len() - 1]
    }

    /// Whether the two strands share at least one cell.
    pub fn overlaps(&self, other: &Strand) -> bool {
        self.positions.iter().any(|pos| other.positions.contains(pos))
    }

    /// Whether the strand touches both the left and right edges, or both the
    /// top and bottom edges, of an `rows` x `cols` grid.
    pub fn is_spangram(&self, rows: usize, cols: usize) -> bool {
        let mut touches_left = false;
        let mut touches_right = false;
        let mut touches_top = false;
        let mut touches_bottom = false;
        for pos in &self.positions {
            if pos.x == 0 {
                touches_left = true;
            }
            if pos.x == cols as i32 - 1 {
                touches_right = true;
            }
            if pos.y == 0 {
                touches_top = true;
            }
            if pos.y == rows as i32 - 1 {
                touches_bottom = true;
            }
        }
        (touches_left && touches_right) || (touches_top && touches_bottom)
    }

    /// Whether `next` can directly follow this strand: the last cell of
    /// `self` must be a king-move neighbor of the first cell of `next`.
    pub fn links_to(&self, next: &Strand) -> bool {
        self.last().is_adjacent(next.first())
    }

    /// Chain check over the sequence `[self, others..]`: every consecutive
    /// pair must link. Note this is a chain check, not all-pairs.
    pub fn can_concatenate<'a>(&self, others: impl IntoIterator<Item = &'a Strand>) -> bool {
        let mut prev = self;
        for next in others {
            if !prev.links_to(next) {
                return false;
            }
            prev = next;
        }
        true
    }

    /// The strand spelling `[self, others..]` in order. The caller must have
    /// checked `can_concatenate` on the same sequence first; the result is
    /// meaningless otherwise.
    pub fn concatenate<'a>(&self, others: impl IntoIterator<Item = &'a Strand>) -> Strand {
        let mut positions = self.positions.clone();
        let mut string = self.string.clone();
        for other in others {
            positions.extend_from_slice(&other.positions);
            string.push_str(&other.string);
        }
        Strand { positions, string }
    }

    /// Whether the strand's path crosses itself: some pair of non-adjacent
    /// segments (index distance >= 2) properly intersects.
    pub fn has_self_crossing(&self) -> bool {
        if self.positions.len() < 4 {
            return false;
        }
        let num_segments = self.positions.len() - 1;
        for i in 0..num_segments {
            for j in (i + 2)..num_segments {
                let seg1 = (self.positions[i], self.positions[i + 1]);
                let seg2 = (self.positions[j], self.positions[j + 1]);
                if segments_intersect(seg1, seg2) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether any segment of this strand properly intersects any segment of
    /// `other`. Strands occupying disjoint cells can still cross, e.g. two
    /// diagonals through the same 2x2 block.
    pub fn crosses(&self, other: &Strand) -> bool {
        for i in 0..self.positions.len().saturating_sub(1) {
            for j in 0..other.positions.len().saturating_sub(1) {
                let seg1 = (self.positions[i], self.positions[i + 1]);
                let seg2 = (other.positions[j], other.positions[j + 1]);
                if segments_intersect(seg1, seg2) {
                    return true;
                }
            }
        }
        false
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at", self.string)?;
        for pos in &self.positions {
            write!(f, " {}", pos)?;
        }
        Ok(())
    }
}

/// Whether two line segments properly intersect. Segments that share an
/// endpoint or merely touch do not count as crossing.
fn segments_intersect(seg1: (Pos, Pos), seg2: (Pos, Pos)) -> bool {
    let (p1, p2) = seg1;
    let (p3, p4) = seg2;

    if p1 == p3 || p1 == p4 || p2 == p3 || p2 == p4 {
        return false;
    }

    // Orientation test: the segments cross iff each segment's endpoints lie
    // on opposite sides of the other segment's line.
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    o1 != o2 && o3 != o4
}

/// Sign of the cross product of `(q - p)` and `(r - q)`: 0 when collinear,
/// 1 clockwise, -1 counterclockwise.
fn orientation(p: Pos, q: Pos, r: Pos) -> i32 {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    val.signum()
}

#[cfg(test)]
fn strand(cells: &[(i32, i32)], string: &str) -> Strand {
    Strand::new(
        cells.iter().map(|&(x, y)| Pos::new(x, y)).collect(),
        string.to_owned(),
    )
}

#[test]
fn test_self_crossing() {
    // Hourglass: (0,1) -> (1,0) -> (0,0) -> (1,1) crosses between its first
    // and last segments.
    let hourglass = strand(&[(0, 1), (1, 0), (0, 0), (1, 1)], "ABCD");
    assert!(hourglass.has_self_crossing());

    let straight = strand(&[(0, 0), (1, 0), (2, 0), (3, 0)], "ABCD");
    assert!(!straight.has_self_crossing());

    let ell = strand(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)], "ABCDE");
    assert!(!ell.has_self_crossing());

    // Too short to cross.
    let short = strand(&[(0, 1), (1, 0), (0, 0)], "ABC");
    assert!(!short.has_self_crossing());
}

#[test]
fn test_crosses() {
    let down_diag = strand(&[(0, 0), (1, 1)], "AD");
    let up_diag = strand(&[(0, 1), (1, 0)], "CB");
    assert!(down_diag.crosses(&up_diag));
    assert!(up_diag.crosses(&down_diag));

    let top_row = strand(&[(0, 0), (1, 0)], "AB");
    let bottom_row = strand(&[(0, 1), (1, 1)], "CD");
    assert!(!top_row.crosses(&bottom_row));
}

#[test]
fn test_overlaps() {
    let a = strand(&[(0, 0), (1, 0)], "AB");
    let b = strand(&[(1, 0), (2, 0)], "BC");
    let c = strand(&[(0, 1), (1, 1)], "DE");
    assert!(a.overlaps(&b));
    assert!(!a.overlaps(&c));
}

#[test]
fn test_is_spangram() {
    // Spans left to right in a 2x4 grid.
    let across = strand(&[(0, 0), (1, 0), (2, 1), (3, 1)], "ABCD");
    assert!(across.is_spangram(2, 4));

    // Spans top to bottom but not left to right.
    let down = strand(&[(1, 0), (1, 1)], "AB");
    assert!(down.is_spangram(2, 4));
    assert!(!down.is_spangram(3, 4));

    let middle = strand(&[(1, 0), (2, 0)], "AB");
    assert!(!middle.is_spangram(2, 4));
}

#[test]
fn test_concatenate() {
    let water = strand(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)], "WATER");
    let melon = strand(&[(4, 1), (5, 1), (6, 1), (7, 1), (8, 1)], "MELON");
    let toad = strand(&[(5, 0), (6, 0), (7, 0), (8, 0)], "TOAD");

    assert!(water.links_to(&melon));
    assert!(water.can_concatenate([&melon]));
    assert!(!melon.can_concatenate([&water]));
    // Chain check: WATER -> TOAD links, TOAD -> MELON doesn't.
    assert!(!water.can_concatenate([&toad, &melon]));

    let merged = water.concatenate([&melon]);
    assert_eq!(merged.string(), "WATERMELON");
    assert_eq!(merged.len(), 10);
    assert_eq!(merged.first(), Pos::new(0, 0));
    assert_eq!(merged.last(), Pos::new(8, 1));

    // Concatenating a chain in one go matches doing it stepwise.
    assert!(water.can_concatenate([&toad]));
    assert_eq!(
        water.concatenate([&toad]),
        strand(
            &[
                (0, 0),
                (1, 0),
                (2, 0),
                (3, 0),
                (4, 0),
                (5, 0),
                (6, 0),
                (7, 0),
                (8, 0)
            ],
            "WATERTOAD"
        )
    );
}
