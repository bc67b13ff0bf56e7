//! Unattended play: strategies that pick swaps, a runner that plays whole
//! sessions with them, and aggregate statistics.

mod stats;
mod strategy;

pub use stats::{AutoplayStats, GameRecord};
pub use strategy::{GreedyStrategy, HintStrategy, RandomStrategy, Strategy, StrategyKind};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SessionError};
use crate::game::{GameConfig, GameSession, KindSource};

/// Headless simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    pub games: usize,
    pub strategy: StrategyKind,
    /// Fixes both the board sequence and the random strategy when set.
    pub seed: Option<u64>,
    pub log_interval: usize,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        AutoplayConfig {
            games: 100,
            strategy: StrategyKind::Hint,
            seed: None,
            log_interval: 10,
        }
    }
}

impl AutoplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::Validation(
                "autoplay.games must be > 0".into(),
            ));
        }
        if self.log_interval == 0 {
            return Err(ConfigError::Validation(
                "autoplay.log_interval must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Play one session to the end, or until the strategy finds nothing to do.
pub fn play_session<S: KindSource>(
    session: &mut GameSession<S>,
    strategy: &mut dyn Strategy,
) -> GameRecord {
    let mut swaps = 0;
    let mut max_combo = 0;
    let mut stalled = false;

    while !session.is_terminal() {
        let Some(hint) = strategy.choose(session.board()) else {
            stalled = true;
            break;
        };

        match session.try_swap(hint.from, hint.to) {
            Ok(report) => {
                if let Some(cascade) = report.cascade() {
                    swaps += 1;
                    max_combo = max_combo.max(cascade.depth());
                } else {
                    // A strategy that suggests a non-matching swap would loop forever.
                    tracing::warn!(
                        strategy = strategy.name(),
                        from = %hint.from,
                        to = %hint.to,
                        "suggested swap did not match"
                    );
                    stalled = true;
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(strategy = strategy.name(), error = %err, "swap rejected");
                stalled = true;
                break;
            }
        }
    }

    GameRecord {
        status: session.status(),
        score: session.score(),
        moves_used: session.moves_used(),
        max_combo,
        swaps,
        stalled,
    }
}

/// Plays a batch of games with one strategy.
pub struct Autoplayer {
    game: GameConfig,
    config: AutoplayConfig,
}

impl Autoplayer {
    pub fn new(game: GameConfig, config: AutoplayConfig) -> Self {
        Autoplayer { game, config }
    }

    /// Run every configured game on freshly generated boards.
    pub fn run(&self) -> Result<AutoplayStats, SessionError> {
        self.game.validate()?;
        self.config.validate()?;

        let mut strategy = self.config.strategy.build(self.config.seed);
        let mut stats = AutoplayStats::new(strategy.name());

        tracing::info!(
            games = self.config.games,
            strategy = strategy.name(),
            seed = ?self.config.seed,
            "starting autoplay"
        );

        for game in 0..self.config.games {
            let mut session = match self.config.seed {
                Some(seed) => {
                    GameSession::seeded(self.game.clone(), seed.wrapping_add(game as u64))?
                }
                None => GameSession::new(self.game.clone())?,
            };
            let record = play_session(&mut session, strategy.as_mut());
            stats.record(&record);

            if (game + 1) % self.config.log_interval == 0 {
                tracing::info!(
                    game = game + 1,
                    win_rate = stats.win_rate(),
                    avg_score = stats.average_score(),
                    "autoplay progress"
                );
            }
        }

        Ok(stats)
    }

    /// Play a single session that the caller has already set up, e.g. one
    /// built from a fixed board.
    pub fn run_session<S: KindSource>(&self, session: &mut GameSession<S>) -> AutoplayStats {
        let mut strategy = self.config.strategy.build(self.config.seed);
        let mut stats = AutoplayStats::new(strategy.name());
        let record = play_session(session, strategy.as_mut());
        stats.record(&record);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, GameStatus, ScriptedSource};

    #[test]
    fn test_default_config_is_valid() {
        AutoplayConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_zero_games() {
        let config = AutoplayConfig {
            games: 0,
            ..AutoplayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_play_session_reaches_an_end() {
        let mut session = GameSession::seeded(GameConfig::default(), 11).unwrap();
        let record = play_session(&mut session, &mut HintStrategy);
        assert!(record.stalled || record.status != GameStatus::InProgress);
        assert_eq!(record.moves_used, record.swaps);
        assert!(record.moves_used <= 30);
    }

    #[test]
    fn test_play_session_stalls_on_dead_board() {
        let board = Board::from_rows(&["ABCD", "CDAB", "ABCD", "CDAB"]).unwrap();
        let config = GameConfig {
            kind_count: 4,
            ..GameConfig::default()
        };
        let mut session =
            GameSession::from_board(config, board, ScriptedSource::new([0])).unwrap();
        let record = play_session(&mut session, &mut HintStrategy);
        assert!(record.stalled);
        assert_eq!(record.swaps, 0);
        assert_eq!(record.status, GameStatus::InProgress);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = AutoplayConfig {
            games: 5,
            strategy: StrategyKind::Random,
            seed: Some(2024),
            log_interval: 5,
        };
        let a = Autoplayer::new(GameConfig::default(), config.clone()).run().unwrap();
        let b = Autoplayer::new(GameConfig::default(), config).run().unwrap();
        assert_eq!(a.games, 5);
        assert_eq!(a.total_score, b.total_score);
        assert_eq!(a.wins, b.wins);
    }
}
