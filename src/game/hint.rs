use serde::Serialize;

use super::board::{Board, Position};

/// An adjacent swap that would produce at least one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub from: Position,
    pub to: Position,
}

/// First productive swap, scanning cells row-major and trying the right
/// neighbour before the one below. Works on a scratch copy.
pub fn find_hint(board: &Board) -> Option<Hint> {
    let mut scratch = board.clone();
    candidate_swaps(board.size()).find(|&hint| swap_creates_match(&mut scratch, hint))
}

/// Every productive swap, in the same order as [`find_hint`].
pub fn all_hints(board: &Board) -> Vec<Hint> {
    let mut scratch = board.clone();
    candidate_swaps(board.size())
        .filter(|&hint| swap_creates_match(&mut scratch, hint))
        .collect()
}

pub fn has_any_move(board: &Board) -> bool {
    find_hint(board).is_some()
}

/// Each unordered adjacent pair exactly once.
fn candidate_swaps(size: usize) -> impl Iterator<Item = Hint> {
    (0..size).flat_map(move |row| {
        (0..size).flat_map(move |col| {
            let from = Position::new(row, col);
            let right = (col + 1 < size).then(|| Position::new(row, col + 1));
            let down = (row + 1 < size).then(|| Position::new(row + 1, col));
            [right, down]
                .into_iter()
                .flatten()
                .map(move |to| Hint { from, to })
        })
    })
}

fn swap_creates_match(scratch: &mut Board, hint: Hint) -> bool {
    scratch.swap(hint.from, hint.to);
    let hit = !scratch.find_matches().is_empty();
    scratch.swap(hint.from, hint.to);
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_candidate_count() {
        // 2 * n * (n - 1) unordered adjacent pairs
        assert_eq!(candidate_swaps(8).count(), 112);
        assert_eq!(candidate_swaps(1).count(), 0);
    }

    #[test]
    fn test_scan_order_is_right_then_down() {
        let order: Vec<Hint> = candidate_swaps(2).collect();
        let p = Position::new;
        assert_eq!(
            order,
            vec![
                Hint { from: p(0, 0), to: p(0, 1) },
                Hint { from: p(0, 0), to: p(1, 0) },
                Hint { from: p(0, 1), to: p(1, 1) },
                Hint { from: p(1, 0), to: p(1, 1) },
            ]
        );
    }

    #[test]
    fn test_finds_horizontal_hint() {
        let b = board(&["AABC", "CDAB", "BCDA", "DBCD"]);
        let hint = find_hint(&b).unwrap();
        assert_eq!(hint.from, Position::new(0, 2));
        assert_eq!(hint.to, Position::new(1, 2));
    }

    #[test]
    fn test_hint_leaves_board_untouched() {
        let b = board(&["AABC", "CDAB", "BCDA", "DBCD"]);
        let before = b.clone();
        let _ = find_hint(&b);
        let _ = all_hints(&b);
        assert_eq!(b, before);
    }

    #[test]
    fn test_dead_board_has_no_hint() {
        let b = board(&["ABCD", "CDAB", "ABCD", "CDAB"]);
        assert_eq!(find_hint(&b), None);
        assert!(all_hints(&b).is_empty());
        assert!(!has_any_move(&b));
    }

    #[test]
    fn test_every_hint_produces_a_match() {
        let b = board(&["AABC", "CDAB", "BCDA", "DBCD"]);
        let hints = all_hints(&b);
        assert!(!hints.is_empty());
        for hint in hints {
            let mut copy = b.clone();
            copy.swap(hint.from, hint.to);
            assert!(!copy.find_matches().is_empty(), "{hint:?}");
        }
    }
}
