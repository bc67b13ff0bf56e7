use std::fmt;

use serde::Serialize;

use crate::error::BoardParseError;

pub const DEFAULT_SIZE: usize = 8;
pub const MAX_KINDS: u8 = 8;

/// Shortest run of equal candies that counts as a match.
pub const MIN_RUN: usize = 3;

const KIND_NAMES: [&str; MAX_KINDS as usize] = [
    "Apple",
    "Orange",
    "Lemon",
    "Grape",
    "Strawberry",
    "Cherry",
    "Blueberry",
    "Kiwi",
];

/// A grid coordinate. Row 0 is the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// 4-directional adjacency: Manhattan distance of exactly one.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CandyKind(u8);

impl CandyKind {
    pub fn new(index: u8) -> Option<Self> {
        (index < MAX_KINDS).then_some(CandyKind(index))
    }

    pub(crate) fn from_index(index: u8) -> Self {
        CandyKind(index % MAX_KINDS)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Display name, e.g. "Apple"
    pub fn name(self) -> &'static str {
        KIND_NAMES[self.0 as usize]
    }

    /// Single-letter form used by the text board format ('A' is kind 0).
    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }

    pub fn from_letter(symbol: char) -> Option<Self> {
        let upper = symbol.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        CandyKind::new(upper as u8 - b'A')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cell {
    /// Transient hole left by a cleared candy; never present at rest.
    Empty,
    Candy(CandyKind),
}

impl Cell {
    pub fn kind(self) -> Option<CandyKind> {
        match self {
            Cell::Empty => None,
            Cell::Candy(kind) => Some(kind),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Candy(kind) => kind.letter(),
        }
    }
}

/// Deduplicated set of matched positions in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    positions: Vec<Position>,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

/// Square grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a board of the given size with every cell empty
    pub(crate) fn empty(size: usize) -> Self {
        Board {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Parse a board from one string per row. Letters `A`..`H` are candy
    /// kinds, `.` is an empty cell, whitespace is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardParseError> {
        if rows.is_empty() {
            return Err(BoardParseError::EmptyBoard);
        }

        let size = rows.len();
        let mut board = Board::empty(size);

        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size {
                return Err(BoardParseError::NotSquare {
                    row,
                    expected: size,
                    found: symbols.len(),
                });
            }

            for (col, &symbol) in symbols.iter().enumerate() {
                let cell = if symbol == '.' {
                    Cell::Empty
                } else {
                    let kind = CandyKind::from_letter(symbol)
                        .ok_or(BoardParseError::UnknownSymbol { row, col, symbol })?;
                    Cell::Candy(kind)
                };
                board.set(Position::new(row, col), cell);
            }
        }

        Ok(board)
    }

    /// Parse a board from a block of text, one row per non-blank line.
    pub fn parse(text: &str) -> Result<Self, BoardParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Get the cell at a position. Panics if the position is off the board.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Checked variant of [`Board::get`].
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.get(pos))
    }

    /// One row of the board, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub(crate) fn swap(&mut self, a: Position, b: Position) {
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);
    }

    /// Every cell that belongs to a horizontal or vertical run of at least
    /// three equal candies. A cell sitting on two runs is reported once.
    pub fn find_matches(&self) -> MatchSet {
        let mut marked = vec![false; self.cells.len()];

        for row in 0..self.size {
            self.mark_runs((0..self.size).map(|col| Position::new(row, col)), &mut marked);
        }
        for col in 0..self.size {
            self.mark_runs((0..self.size).map(|row| Position::new(row, col)), &mut marked);
        }

        let positions = self
            .positions()
            .filter(|&pos| marked[self.index(pos)])
            .collect();
        MatchSet { positions }
    }

    /// Walk one line of cells and mark every maximal run of `MIN_RUN` or more.
    fn mark_runs(&self, line: impl Iterator<Item = Position>, marked: &mut [bool]) {
        let mut run: Vec<Position> = Vec::with_capacity(self.size);
        let mut current: Option<CandyKind> = None;

        for pos in line {
            let kind = self.get(pos).kind();
            if kind.is_some() && kind == current {
                run.push(pos);
                continue;
            }
            self.flush_run(&run, marked);
            run.clear();
            current = kind;
            if kind.is_some() {
                run.push(pos);
            }
        }
        self.flush_run(&run, marked);
    }

    fn flush_run(&self, run: &[Position], marked: &mut [bool]) {
        if run.len() >= MIN_RUN {
            for &pos in run {
                marked[self.index(pos)] = true;
            }
        }
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(
            self.contains(pos),
            "position {pos} outside {size}x{size} board",
            size = self.size
        );
        pos.row * self.size + pos.col
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line: String = self.row(row).iter().map(|c| c.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(3, 3);
        assert!(p.is_adjacent(Position::new(3, 4)));
        assert!(p.is_adjacent(Position::new(2, 3)));
        assert!(!p.is_adjacent(Position::new(4, 4))); // diagonal
        assert!(!p.is_adjacent(Position::new(3, 5)));
        assert!(!p.is_adjacent(p));
    }

    #[test]
    fn test_parse_and_display() {
        let b = board(&["ABC", "B.A", "CAB"]);
        assert_eq!(b.size(), 3);
        assert_eq!(b.get(Position::new(0, 1)), Cell::Candy(CandyKind(1)));
        assert_eq!(b.get(Position::new(1, 1)), Cell::Empty);
        assert_eq!(b.count_empty(), 1);
        assert_eq!(b.to_string(), "ABC\nB.A\nCAB\n");
    }

    #[test]
    fn test_parse_ignores_spacing() {
        let b = Board::parse("\n  A B C\n  B C A\n  C A B\n").unwrap();
        assert_eq!(b.row(2), board(&["ABC", "BCA", "CAB"]).row(2));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Board::from_rows(&[]), Err(BoardParseError::EmptyBoard));
        assert_eq!(
            Board::from_rows(&["AB", "ABC"]),
            Err(BoardParseError::NotSquare {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            Board::from_rows(&["A?", "AB"]),
            Err(BoardParseError::UnknownSymbol {
                row: 0,
                col: 1,
                symbol: '?'
            })
        );
    }

    #[test]
    fn test_kind_letters() {
        let kind = CandyKind::from_letter('c').unwrap();
        assert_eq!(kind.index(), 2);
        assert_eq!(kind.letter(), 'C');
        assert_eq!(kind.name(), "Lemon");
        assert!(CandyKind::from_letter('Z').is_none());
        assert!(CandyKind::new(MAX_KINDS).is_none());
    }

    #[test]
    fn test_checked_cell_access() {
        let b = board(&["AB", "BA"]);
        assert_eq!(b.cell(Position::new(1, 1)), Some(Cell::Candy(CandyKind(0))));
        assert_eq!(b.cell(Position::new(2, 0)), None);
    }

    #[test]
    fn test_no_matches() {
        let b = board(&["AAB", "BBA", "AAB"]);
        assert!(b.find_matches().is_empty());
    }

    #[test]
    fn test_horizontal_match() {
        let b = board(&["BAAAC", "CBCBA", "ABABC", "CACAB", "BCBCA"]);
        let matches = b.find_matches();
        assert_eq!(
            matches.positions(),
            &[Position::new(0, 1), Position::new(0, 2), Position::new(0, 3)]
        );
    }

    #[test]
    fn test_vertical_match_at_edge() {
        let b = board(&["ABC", "CBA", "ACA"]);
        let matches = b.find_matches();
        assert_eq!(matches.len(), 0);

        let b = board(&["ABC", "BCC", "ABC"]);
        let matches = b.find_matches();
        assert_eq!(
            matches.positions(),
            &[Position::new(0, 2), Position::new(1, 2), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_long_run_is_single_match() {
        let b = board(&["AAAAA", "BCBCB", "CBCBC", "BCBCB", "CBCBC"]);
        assert_eq!(b.find_matches().len(), 5);
    }

    #[test]
    fn test_intersection_counted_once() {
        // Row 2 and column 2 cross at (2, 2).
        let b = board(&["BCADB", "CDACD", "AAAAB", "DBADC", "BCBCD"]);
        let matches = b.find_matches();
        // Row run and column run are 4 cells each, sharing one.
        assert_eq!(matches.len(), 7);
        assert!(matches.contains(Position::new(2, 2)));
        assert!(matches.contains(Position::new(0, 2)));
        assert!(matches.contains(Position::new(2, 0)));
        assert!(!matches.contains(Position::new(2, 4)));
    }

    #[test]
    fn test_empty_cells_never_match() {
        let b = board(&["...", "ABC", "BCA"]);
        assert!(b.find_matches().is_empty());
    }

    #[test]
    fn test_swap_exchanges_cells() {
        let mut b = board(&["AB", "CD"]);
        b.swap(Position::new(0, 0), Position::new(1, 1));
        assert_eq!(b.to_string(), "DB\nCA\n");
    }
}
