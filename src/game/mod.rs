//! Match-3 engine: board model, run detection, cascade resolution, hints and
//! the session state machine that ties them together.

mod board;
pub mod cascade;
mod hint;
mod session;
mod source;

pub use board::{Board, CandyKind, Cell, MatchSet, Position, DEFAULT_SIZE, MAX_KINDS, MIN_RUN};
pub use cascade::{CascadeReport, CascadeStep};
pub use hint::{all_hints, find_hint, has_any_move, Hint};
pub use session::{GameConfig, GameSession, GameStatus, SessionSnapshot, SwapOutcome, SwapReport};
pub use source::{KindSource, RandomSource, ScriptedSource};
