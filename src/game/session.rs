use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::board::{Board, Position, DEFAULT_SIZE, MAX_KINDS};
use super::cascade::{generate_board, resolve_cascade, CascadeReport};
use super::hint::{find_hint, Hint};
use super::source::{KindSource, RandomSource};
use crate::error::{ConfigError, SessionError, SwapError};

/// Rules for a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    pub kind_count: u8,
    pub max_moves: u32,
    pub target_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: DEFAULT_SIZE,
            kind_count: 6,
            max_moves: 30,
            target_score: 1000,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(3..=16).contains(&self.board_size) {
            return Err(ConfigError::Validation(
                "game.board_size must be in 3..=16".into(),
            ));
        }
        // Generation needs a third kind: with two, a cell can be blocked both
        // horizontally and vertically.
        if !(3..=MAX_KINDS).contains(&self.kind_count) {
            return Err(ConfigError::Validation(format!(
                "game.kind_count must be in 3..={MAX_KINDS}"
            )));
        }
        if self.max_moves == 0 {
            return Err(ConfigError::Validation(
                "game.max_moves must be > 0".into(),
            ));
        }
        if self.target_score == 0 {
            return Err(ConfigError::Validation(
                "game.target_score must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Read-only copy of everything a front end needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub score: u32,
    pub moves_remaining: u32,
    pub combo_depth: u32,
    pub target_score: u32,
    pub status: GameStatus,
}

#[derive(Debug, Clone)]
pub enum SwapOutcome {
    /// The swap matched and was committed; the report holds every cascade step.
    Resolved(CascadeReport),
    /// Nothing matched, so the swap was undone.
    Reverted,
}

#[derive(Debug, Clone)]
pub struct SwapReport {
    pub outcome: SwapOutcome,
    pub snapshot: SessionSnapshot,
}

impl SwapReport {
    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, SwapOutcome::Resolved(_))
    }

    pub fn cascade(&self) -> Option<&CascadeReport> {
        match &self.outcome {
            SwapOutcome::Resolved(report) => Some(report),
            SwapOutcome::Reverted => None,
        }
    }
}

/// A running game: board, score, move budget and win/loss state. The
/// session is the only writer of its board.
pub struct GameSession<S = RandomSource<StdRng>> {
    config: GameConfig,
    board: Board,
    score: u32,
    moves_remaining: u32,
    combo_depth: u32,
    status: GameStatus,
    source: S,
}

impl GameSession<RandomSource<StdRng>> {
    /// Start a game with OS-seeded randomness.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        Self::with_source(config, RandomSource::from_os_rng())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, SessionError> {
        Self::with_source(config, RandomSource::seeded(seed))
    }
}

impl<S: KindSource> GameSession<S> {
    pub fn with_source(config: GameConfig, mut source: S) -> Result<Self, SessionError> {
        config.validate()?;
        let board = generate_board(config.board_size, config.kind_count, &mut source);
        let session = GameSession {
            board,
            score: 0,
            moves_remaining: config.max_moves,
            combo_depth: 0,
            status: GameStatus::InProgress,
            source,
            config,
        };
        session.log_start();
        Ok(session)
    }

    /// Start from a fixed board. The board size overrides `config.board_size`;
    /// the board must be full, use only configured kinds and hold no match.
    pub fn from_board(
        mut config: GameConfig,
        board: Board,
        source: S,
    ) -> Result<Self, SessionError> {
        config.board_size = board.size();
        config.validate()?;

        if board.count_empty() > 0 {
            return Err(SessionError::InvalidBoard("board has empty cells".into()));
        }
        if let Some(pos) = board.positions().find(|&pos| {
            board
                .get(pos)
                .kind()
                .is_some_and(|kind| kind.index() >= config.kind_count)
        }) {
            return Err(SessionError::InvalidBoard(format!(
                "cell {pos} uses a kind beyond kind_count {}",
                config.kind_count
            )));
        }
        if !board.find_matches().is_empty() {
            return Err(SessionError::InvalidBoard(
                "board already contains a match".into(),
            ));
        }

        let session = GameSession {
            board,
            score: 0,
            moves_remaining: config.max_moves,
            combo_depth: 0,
            status: GameStatus::InProgress,
            source,
            config,
        };
        session.log_start();
        Ok(session)
    }

    /// Throw away the current game and deal a fresh board.
    pub fn new_game(&mut self) {
        self.board = generate_board(
            self.config.board_size,
            self.config.kind_count,
            &mut self.source,
        );
        self.score = 0;
        self.moves_remaining = self.config.max_moves;
        self.combo_depth = 0;
        self.status = GameStatus::InProgress;
        self.log_start();
    }

    /// Swap two adjacent candies. A swap that makes a match costs one move
    /// and runs the cascade to completion; one that doesn't is undone and
    /// costs nothing.
    pub fn try_swap(&mut self, a: Position, b: Position) -> Result<SwapReport, SwapError> {
        self.validate_swap(a, b)?;

        self.board.swap(a, b);
        if self.board.find_matches().is_empty() {
            self.board.swap(a, b);
            tracing::debug!(%a, %b, "swap reverted, no match");
            return Ok(SwapReport {
                outcome: SwapOutcome::Reverted,
                snapshot: self.snapshot(),
            });
        }

        self.moves_remaining -= 1;
        self.combo_depth = 0;

        let report = resolve_cascade(&mut self.board, self.config.kind_count, &mut self.source);
        self.combo_depth = report.depth();
        self.score += report.total_score();

        tracing::debug!(
            %a,
            %b,
            combo = report.depth(),
            gained = report.total_score(),
            score = self.score,
            moves_remaining = self.moves_remaining,
            "swap resolved"
        );

        self.check_termination();

        Ok(SwapReport {
            outcome: SwapOutcome::Resolved(report),
            snapshot: self.snapshot(),
        })
    }

    fn validate_swap(&self, a: Position, b: Position) -> Result<(), SwapError> {
        if self.status.is_terminal() {
            return Err(SwapError::SessionTerminal);
        }
        for pos in [a, b] {
            if !self.board.contains(pos) {
                return Err(SwapError::OutOfBounds(pos));
            }
        }
        if a == b {
            return Err(SwapError::SamePosition(a));
        }
        if !a.is_adjacent(b) {
            return Err(SwapError::NotAdjacent(a, b));
        }
        if self.moves_remaining == 0 {
            return Err(SwapError::NoMovesRemaining);
        }
        Ok(())
    }

    /// Reaching the target wins even if the same move used up the budget.
    fn check_termination(&mut self) {
        if self.score >= self.config.target_score {
            self.status = GameStatus::Won;
        } else if self.moves_remaining == 0 {
            self.status = GameStatus::Lost;
        }

        if self.status.is_terminal() {
            tracing::info!(
                status = ?self.status,
                score = self.score,
                target = self.config.target_score,
                moves_used = self.moves_used(),
                "game over"
            );
        }
    }

    pub fn compute_hint(&self) -> Option<Hint> {
        find_hint(&self.board)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            score: self.score,
            moves_remaining: self.moves_remaining,
            combo_depth: self.combo_depth,
            target_score: self.config.target_score,
            status: self.status,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn moves_used(&self) -> u32 {
        self.config.max_moves - self.moves_remaining
    }

    /// Combo depth reached by the most recent committed swap
    pub fn combo_depth(&self) -> u32 {
        self.combo_depth
    }

    pub fn target_score(&self) -> u32 {
        self.config.target_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fraction of the target reached, capped at 1.0
    pub fn progress(&self) -> f64 {
        (self.score as f64 / self.config.target_score as f64).min(1.0)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn log_start(&self) {
        tracing::info!(
            size = self.config.board_size,
            kinds = self.config.kind_count,
            moves = self.config.max_moves,
            target = self.config.target_score,
            "new game"
        );
    }
}
