//! Board generation and the clear / drop / refill loop that runs after every
//! committed swap.

use serde::Serialize;

use super::board::{Board, CandyKind, Cell, MatchSet, Position, MAX_KINDS};
use super::source::KindSource;

pub const POINTS_PER_CANDY: u32 = 10;
pub const COMBO_BONUS: u32 = 50;

/// Score for one cascade iteration. The first iteration of a swap
/// (`combo_depth == 1`) earns no bonus.
pub fn score_for(matched: usize, combo_depth: u32) -> u32 {
    let base = matched as u32 * POINTS_PER_CANDY;
    base + combo_depth.saturating_sub(1) * COMBO_BONUS
}

/// Fill a fresh board, redrawing any kind that would complete a run of three
/// with the two cells to its left or the two cells above it.
///
/// `kind_count` must be in `3..=MAX_KINDS`: with fewer kinds a cell can be
/// blocked both ways and the redraw never ends.
pub fn generate_board<S: KindSource + ?Sized>(
    size: usize,
    kind_count: u8,
    source: &mut S,
) -> Board {
    debug_assert!(
        (3..=MAX_KINDS).contains(&kind_count),
        "kind_count {kind_count} outside 3..={MAX_KINDS}"
    );
    let mut board = Board::empty(size);

    for pos in board.positions().collect::<Vec<_>>() {
        let kind = loop {
            let kind = source.next_kind(kind_count);
            if !completes_run(&board, pos, kind) {
                break kind;
            }
        };
        board.set(pos, Cell::Candy(kind));
    }

    board
}

/// Would placing `kind` at `pos` finish a run with the already-filled
/// cells to the left or above?
fn completes_run(board: &Board, pos: Position, kind: CandyKind) -> bool {
    let cell = Cell::Candy(kind);
    let Position { row, col } = pos;

    let horizontal = col >= 2
        && board.get(Position::new(row, col - 1)) == cell
        && board.get(Position::new(row, col - 2)) == cell;
    let vertical = row >= 2
        && board.get(Position::new(row - 1, col)) == cell
        && board.get(Position::new(row - 2, col)) == cell;

    horizontal || vertical
}

/// Compact every column toward the bottom, keeping the order of the
/// remaining candies and leaving the holes at the top.
pub fn apply_gravity(board: &mut Board) {
    let size = board.size();
    for col in 0..size {
        let mut write_row = size;
        for row in (0..size).rev() {
            let pos = Position::new(row, col);
            let cell = board.get(pos);
            if cell.is_empty() {
                continue;
            }
            write_row -= 1;
            if write_row != row {
                board.set(Position::new(write_row, col), cell);
                board.set(pos, Cell::Empty);
            }
        }
    }
}

/// Put a freshly drawn kind into every empty cell, row-major. No match
/// avoidance here: new runs are what keep a cascade going.
pub fn refill<S: KindSource + ?Sized>(board: &mut Board, kind_count: u8, source: &mut S) {
    for pos in board.positions().collect::<Vec<_>>() {
        if board.get(pos).is_empty() {
            board.set(pos, Cell::Candy(source.next_kind(kind_count)));
        }
    }
}

/// One pass of the cascade loop, with the board captured after each phase
/// so a front end can replay it.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeStep {
    pub combo_depth: u32,
    pub matched: MatchSet,
    pub score_delta: u32,
    pub cleared: Board,
    pub settled: Board,
    pub refilled: Board,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CascadeReport {
    pub steps: Vec<CascadeStep>,
}

impl CascadeReport {
    /// Number of iterations, i.e. the combo depth reached
    pub fn depth(&self) -> u32 {
        self.steps.len() as u32
    }

    pub fn total_score(&self) -> u32 {
        self.steps.iter().map(|s| s.score_delta).sum()
    }

    pub fn cleared_count(&self) -> usize {
        self.steps.iter().map(|s| s.matched.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Clear, drop and refill until the board holds no match. Combo depth starts
/// at zero and rises by one per iteration.
pub fn resolve_cascade<S: KindSource + ?Sized>(
    board: &mut Board,
    kind_count: u8,
    source: &mut S,
) -> CascadeReport {
    let mut report = CascadeReport::default();

    loop {
        let matched = board.find_matches();
        if matched.is_empty() {
            break;
        }

        let combo_depth = report.depth() + 1;
        let score_delta = score_for(matched.len(), combo_depth);

        for pos in matched.iter() {
            board.set(pos, Cell::Empty);
        }
        let cleared = board.clone();

        apply_gravity(board);
        let settled = board.clone();

        refill(board, kind_count, source);

        tracing::debug!(
            combo_depth,
            matched = matched.len(),
            score_delta,
            "cascade step"
        );

        report.steps.push(CascadeStep {
            combo_depth,
            matched,
            score_delta,
            cleared,
            settled,
            refilled: board.clone(),
        });
    }

    report
}
