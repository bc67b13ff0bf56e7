use std::path::PathBuf;

use crate::game::Position;

/// Reasons a swap request is rejected. A rejected swap never touches the
/// board, the score or the move counter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("cannot swap {0} with itself")]
    SamePosition(Position),

    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(Position, Position),

    #[error("no moves remaining")]
    NoMovesRemaining,

    #[error("the game is over")]
    SessionTerminal,
}

impl SwapError {
    /// True for the malformed-request variants (bad coordinates, adjacency).
    pub fn is_invalid_swap(&self) -> bool {
        matches!(
            self,
            SwapError::OutOfBounds(_)
                | SwapError::SamePosition(_)
                | SwapError::NotAdjacent(_, _)
        )
    }
}

/// Errors raised when starting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("board cannot start a session: {0}")]
    InvalidBoard(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from parsing a board out of its letter form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("board has no rows")]
    EmptyBoard,

    #[error("row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown symbol '{symbol}' at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_error_display() {
        let err = SwapError::NotAdjacent(Position::new(0, 0), Position::new(2, 2));
        assert_eq!(err.to_string(), "(0, 0) and (2, 2) are not adjacent");
    }

    #[test]
    fn test_invalid_swap_grouping() {
        assert!(SwapError::OutOfBounds(Position::new(9, 0)).is_invalid_swap());
        assert!(SwapError::SamePosition(Position::new(1, 1)).is_invalid_swap());
        assert!(!SwapError::SessionTerminal.is_invalid_swap());
        assert!(!SwapError::NoMovesRemaining.is_invalid_swap());
    }

    #[test]
    fn test_board_parse_error_display() {
        let err = BoardParseError::UnknownSymbol {
            row: 1,
            col: 2,
            symbol: 'z',
        };
        assert_eq!(err.to_string(), "unknown symbol 'z' at row 1, column 2");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("game.kind_count must be in 3..=8".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: game.kind_count must be in 3..=8"
        );
    }
}
