use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::board::CandyKind;

/// Supplies the candy kinds used for board generation and refills.
pub trait KindSource {
    /// Draw a kind in `0..kind_count`.
    fn next_kind(&mut self, kind_count: u8) -> CandyKind;
}

/// Uniform draws from a random number generator.
pub struct RandomSource<R = StdRng> {
    rng: R,
}

impl RandomSource<StdRng> {
    pub fn from_os_rng() -> Self {
        RandomSource {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible source for replays and simulations.
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        RandomSource { rng }
    }
}

impl Default for RandomSource<StdRng> {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl<R: Rng> KindSource for RandomSource<R> {
    fn next_kind(&mut self, kind_count: u8) -> CandyKind {
        CandyKind::from_index(self.rng.random_range(0..kind_count))
    }
}

/// Cycles through a fixed list of kind indices, reduced modulo the kind
/// count. A script that never yields a legal kind for some cell will make
/// board generation spin.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    kinds: Vec<u8>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(kinds: impl IntoIterator<Item = u8>) -> Self {
        let kinds: Vec<u8> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "ScriptedSource needs at least one kind");
        ScriptedSource { kinds, cursor: 0 }
    }

    /// Build a script from board letters, e.g. `"ABCA"`.
    pub fn from_letters(letters: &str) -> Self {
        Self::new(
            letters
                .chars()
                .filter_map(CandyKind::from_letter)
                .map(CandyKind::index),
        )
    }

    /// Number of kinds handed out so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl KindSource for ScriptedSource {
    fn next_kind(&mut self, kind_count: u8) -> CandyKind {
        let index = self.kinds[self.cursor % self.kinds.len()] % kind_count;
        self.cursor += 1;
        CandyKind::from_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_source_stays_in_range() {
        let mut source = RandomSource::seeded(7);
        for _ in 0..500 {
            assert!(source.next_kind(6).index() < 6);
        }
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = RandomSource::seeded(42);
        let mut b = RandomSource::seeded(42);
        let xs: Vec<u8> = (0..32).map(|_| a.next_kind(6).index()).collect();
        let ys: Vec<u8> = (0..32).map(|_| b.next_kind(6).index()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_scripted_source_cycles() {
        let mut source = ScriptedSource::new([0, 4, 7]);
        let drawn: Vec<u8> = (0..5).map(|_| source.next_kind(6).index()).collect();
        assert_eq!(drawn, vec![0, 4, 1, 0, 4]);
        assert_eq!(source.draws(), 5);
    }

    #[test]
    fn test_scripted_from_letters() {
        let mut source = ScriptedSource::from_letters("CAB");
        assert_eq!(source.next_kind(6).letter(), 'C');
        assert_eq!(source.next_kind(6).letter(), 'A');
        assert_eq!(source.next_kind(6).letter(), 'B');
    }

    #[test]
    #[should_panic(expected = "at least one kind")]
    fn test_scripted_source_rejects_empty_script() {
        ScriptedSource::new(Vec::new());
    }
}
