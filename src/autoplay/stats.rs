use serde::Serialize;

use crate::game::GameStatus;

/// Result of one unattended game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub status: GameStatus,
    pub score: u32,
    pub moves_used: u32,
    pub max_combo: u32,
    /// Committed swaps, excluding anything the strategy tried that reverted.
    pub swaps: u32,
    /// The strategy ran out of productive swaps before the game ended.
    pub stalled: bool,
}

/// Running totals across many games.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AutoplayStats {
    pub strategy: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub stalled: usize,
    pub total_score: u64,
    pub total_moves_used: u64,
    pub best_score: u32,
    pub best_combo: u32,
}

impl AutoplayStats {
    pub fn new(strategy: &str) -> Self {
        AutoplayStats {
            strategy: strategy.to_string(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        match record.status {
            GameStatus::Won => self.wins += 1,
            GameStatus::Lost => self.losses += 1,
            GameStatus::InProgress => {}
        }
        if record.stalled {
            self.stalled += 1;
        }
        self.total_score += u64::from(record.score);
        self.total_moves_used += u64::from(record.moves_used);
        self.best_score = self.best_score.max(record.score);
        self.best_combo = self.best_combo.max(record.max_combo);
    }

    pub fn win_rate(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins as f32 / self.games as f32
    }

    pub fn average_score(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_score as f32 / self.games as f32
    }

    pub fn average_moves_used(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_moves_used as f32 / self.games as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: GameStatus, score: u32, combo: u32) -> GameRecord {
        GameRecord {
            status,
            score,
            moves_used: 10,
            max_combo: combo,
            swaps: 10,
            stalled: status == GameStatus::InProgress,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = AutoplayStats::new("Hint");
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.average_score(), 0.0);
        assert_eq!(stats.average_moves_used(), 0.0);
    }

    #[test]
    fn test_record_aggregates() {
        let mut stats = AutoplayStats::new("Hint");
        stats.record(&record(GameStatus::Won, 1200, 4));
        stats.record(&record(GameStatus::Lost, 600, 2));
        stats.record(&record(GameStatus::InProgress, 300, 1));
        stats.record(&record(GameStatus::Won, 1100, 3));

        assert_eq!(stats.games, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.stalled, 1);
        assert!((stats.win_rate() - 0.5).abs() < 1e-6);
        assert!((stats.average_score() - 800.0).abs() < 1e-3);
        assert!((stats.average_moves_used() - 10.0).abs() < 1e-6);
        assert_eq!(stats.best_score, 1200);
        assert_eq!(stats.best_combo, 4);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = AutoplayStats::new("Greedy");
        stats.record(&record(GameStatus::Won, 1000, 2));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["strategy"], "Greedy");
        assert_eq!(json["wins"], 1);
        assert_eq!(json["best_score"], 1000);
    }
}
