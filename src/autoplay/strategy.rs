use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{all_hints, find_hint, Board, Hint};

/// Picks the next swap for an unattended game.
pub trait Strategy {
    /// Choose a swap on the given board, or `None` if nothing would match.
    fn choose(&mut self, board: &Board) -> Option<Hint>;

    /// Display name used in logs and summaries.
    fn name(&self) -> &str;
}

/// Which built-in strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Hint,
    Random,
    Greedy,
}

impl StrategyKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Hint => Box::new(HintStrategy),
            StrategyKind::Random => Box::new(match seed {
                Some(seed) => RandomStrategy::seeded(seed),
                None => RandomStrategy::new(),
            }),
            StrategyKind::Greedy => Box::new(GreedyStrategy),
        }
    }
}

/// Always plays the first hint, same as a player pressing the hint button.
pub struct HintStrategy;

impl Strategy for HintStrategy {
    fn choose(&mut self, board: &Board) -> Option<Hint> {
        find_hint(board)
    }

    fn name(&self) -> &str {
        "Hint"
    }
}

/// Uniform choice among the productive swaps.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn choose(&mut self, board: &Board) -> Option<Hint> {
        let hints = all_hints(board);
        if hints.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..hints.len());
        Some(hints[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Plays the swap that clears the most candies on the first pass. Ties go
/// to the earliest swap in scan order.
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn choose(&mut self, board: &Board) -> Option<Hint> {
        let mut best: Option<(usize, Hint)> = None;
        for hint in all_hints(board) {
            let mut scratch = board.clone();
            scratch.swap(hint.from, hint.to);
            let cleared = scratch.find_matches().len();
            if best.is_none_or(|(n, _)| cleared > n) {
                best = Some((cleared, hint));
            }
        }
        best.map(|(_, hint)| hint)
    }

    fn name(&self) -> &str {
        "Greedy"
    }
}
