use crate::Error;
use std::fmt;

/// A cell coordinate. `x` is the column and `y` is the row; `(0, 0)` is the
/// top-left corner of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Pos {
        Pos { x, y }
    }

    /// Whether `other` is one of the 8 king-move neighbors of this cell.
    pub fn is_adjacent(self, other: Pos) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    pub fn step(self, dir: Direction) -> Pos {
        let (dx, dy) = dir.delta();
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// The 8 directions a path may step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    Up,
    UpRight,
}

impl Direction {
    /// All directions, in a fixed order so that traversals are deterministic.
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
        }
    }
}

/// An immutable rectangular grid of uppercase letters. This is the read-only
/// input to the whole pipeline; nothing ever mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Row-major letters, `letters[y * cols + x]`.
    letters: Vec<char>,
}

impl Grid {
    /// Construct a grid from its rows of letters. Fails with
    /// [`Error::InvalidGrid`] if the rows are empty, ragged, or contain
    /// anything other than uppercase A-Z. Validating here is cheaper than
    /// chasing an out-of-bounds bit index later.
    pub fn new(rows: Vec<Vec<char>>) -> Result<Grid, Error> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Error::InvalidGrid(
                "grid must have at least one row and one column".to_owned(),
            ));
        }
        let cols = rows[0].len();
        let mut letters = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.len() != cols {
                return Err(Error::InvalidGrid(format!(
                    "ragged grid: expected {} columns, found a row with {}",
                    cols,
                    row.len()
                )));
            }
            for &letter in row {
                if !letter.is_ascii_uppercase() {
                    return Err(Error::InvalidGrid(format!(
                        "grid letters must be uppercase A-Z, found {:?}",
                        letter
                    )));
                }
                letters.push(letter);
            }
        }
        Ok(Grid {
            rows: rows.len(),
            cols,
            letters,
        })
    }

    /// Construct a grid from one line of letters per row, e.g. `"WORD\nTEST"`.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Grid, Error> {
        let rows = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();
        Grid::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    /// The letter at `pos`. Panics if `pos` is out of bounds.
    pub fn letter(&self, pos: Pos) -> char {
        self.letters[self.cell_index(pos)]
    }

    /// The bit index of `pos`: `y * cols + x`.
    pub fn cell_index(&self, pos: Pos) -> usize {
        pos.y as usize * self.cols + pos.x as usize
    }

    /// All cell coordinates, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |y| (0..cols).map(move |x| Pos::new(x as i32, y as i32)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.cols {
                write!(f, "{}", self.letters[y * self.cols + x])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[test]
fn test_adjacency() {
    let p = Pos::new(3, 3);
    for dir in Direction::ALL {
        assert!(p.is_adjacent(p.step(dir)));
        assert!(p.step(dir).is_adjacent(p));
    }
    assert!(!p.is_adjacent(p));
    assert!(!p.is_adjacent(Pos::new(5, 3)));
    assert!(!p.is_adjacent(Pos::new(4, 5)));
}

#[test]
fn test_parse() {
    let grid = Grid::parse("WORD\nTEST").unwrap();
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.cols(), 4);
    assert_eq!(grid.num_cells(), 8);
    assert_eq!(grid.letter(Pos::new(0, 0)), 'W');
    assert_eq!(grid.letter(Pos::new(3, 1)), 'T');
    assert_eq!(grid.cell_index(Pos::new(2, 1)), 6);
    assert!(grid.contains(Pos::new(3, 1)));
    assert!(!grid.contains(Pos::new(4, 1)));
    assert!(!grid.contains(Pos::new(-1, 0)));
}

#[test]
fn test_invalid_grids() {
    assert!(matches!(Grid::parse(""), Err(Error::InvalidGrid(_))));
    assert!(matches!(
        Grid::parse("AB\nABC"),
        Err(Error::InvalidGrid(_))
    ));
    assert!(matches!(Grid::parse("ab"), Err(Error::InvalidGrid(_))));
}
