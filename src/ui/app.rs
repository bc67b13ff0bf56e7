use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use rand::rngs::StdRng;
use ratatui::{backend::Backend, Terminal};
use serde::{Deserialize, Serialize};

use super::game_view::{self, GameView};
use crate::error::{ConfigError, SessionError};
use crate::game::{
    Board, CascadeReport, GameConfig, GameSession, Hint, KindSource, MatchSet,
    Position, RandomSource, SwapOutcome,
};

/// Presentation settings for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pause between replayed cascade phases; 0 shows only the final board.
    pub step_delay_ms: u64,
    pub show_combo: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            step_delay_ms: 250,
            show_combo: true,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_delay_ms > 5_000 {
            return Err(ConfigError::Validation(
                "display.step_delay_ms must be <= 5000".into(),
            ));
        }
        Ok(())
    }
}

/// A board state replayed while a cascade animates.
struct PlaybackFrame {
    board: Board,
    matched: Option<MatchSet>,
    combo_depth: u32,
}

pub struct App<S = RandomSource<StdRng>> {
    session: GameSession<S>,
    display: DisplayConfig,
    cursor: Position,
    selected: Option<Position>,
    hint: Option<Hint>,
    message: Option<String>,
    playback: VecDeque<PlaybackFrame>,
    next_frame_at: Option<Instant>,
    should_quit: bool,
}

impl App<RandomSource<StdRng>> {
    pub fn new(
        game: GameConfig,
        display: DisplayConfig,
        seed: Option<u64>,
    ) -> Result<Self, SessionError> {
        let session = match seed {
            Some(seed) => GameSession::seeded(game, seed)?,
            None => GameSession::new(game)?,
        };
        Ok(Self::with_session(session, display))
    }
}

impl<S: KindSource> App<S> {
    pub fn with_session(session: GameSession<S>, display: DisplayConfig) -> Self {
        let mid = session.board().size() / 2;
        App {
            session,
            display,
            cursor: Position::new(mid, mid),
            selected: None,
            hint: None,
            message: None,
            playback: VecDeque::new(),
            next_frame_at: None,
            should_quit: false,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.advance_playback(Instant::now());
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.should_quit = true;
            return;
        }
        // Input waits until the cascade has finished playing.
        if self.is_animating() {
            return;
        }

        self.message = None;
        self.hint = None;

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Enter | KeyCode::Char(' ') => self.select(),
            KeyCode::Char('?') => self.show_hint(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.session.new_game();
                self.selected = None;
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let last = self.session.board().size() as isize - 1;
        let row = (self.cursor.row as isize + d_row).clamp(0, last) as usize;
        let col = (self.cursor.col as isize + d_col).clamp(0, last) as usize;
        self.cursor = Position::new(row, col);
    }

    /// First press picks a candy, second press on a neighbour swaps. Any
    /// other second press just drops the selection.
    fn select(&mut self) {
        if self.session.is_terminal() {
            self.message = Some("Game over! Press 'n' for a new game.".to_string());
            return;
        }

        match self.selected.take() {
            None => self.selected = Some(self.cursor),
            Some(first) if first.is_adjacent(self.cursor) => self.swap(first, self.cursor),
            Some(_) => {}
        }
    }

    fn swap(&mut self, a: Position, b: Position) {
        let mut swapped = self.session.board().clone();
        swapped.swap(a, b);

        match self.session.try_swap(a, b) {
            Ok(report) => match report.outcome {
                SwapOutcome::Resolved(cascade) => {
                    if self.display.show_combo && cascade.depth() > 1 {
                        self.message = Some(format!("Combo x{}!", cascade.depth()));
                    }
                    self.queue_playback(swapped, &cascade);
                }
                SwapOutcome::Reverted => {
                    self.message = Some("No match there.".to_string());
                }
            },
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn show_hint(&mut self) {
        if self.session.is_terminal() {
            return;
        }
        match self.session.compute_hint() {
            Some(hint) => self.hint = Some(hint),
            None => self.message = Some("No moves available.".to_string()),
        }
    }

    /// Queue every phase of `cascade` for replay, starting from the board
    /// as it looked right after the swap.
    fn queue_playback(&mut self, swapped: Board, cascade: &CascadeReport) {
        if self.display.step_delay_ms == 0 {
            return;
        }

        let mut before = swapped;
        for step in &cascade.steps {
            let depth = step.combo_depth;
            let phases = [
                (before, Some(step.matched.clone())),
                (step.cleared.clone(), None),
                (step.settled.clone(), None),
                (step.refilled.clone(), None),
            ];
            for (board, matched) in phases {
                self.playback.push_back(PlaybackFrame {
                    board,
                    matched,
                    combo_depth: depth,
                });
            }
            before = step.refilled.clone();
        }
        self.next_frame_at = Some(Instant::now() + self.step_delay());
    }

    fn advance_playback(&mut self, now: Instant) {
        let Some(deadline) = self.next_frame_at else {
            return;
        };
        if now < deadline {
            return;
        }
        self.playback.pop_front();
        self.next_frame_at = if self.playback.is_empty() {
            None
        } else {
            Some(now + self.step_delay())
        };
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(self.display.step_delay_ms)
    }

    fn is_animating(&self) -> bool {
        !self.playback.is_empty()
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let playing = self.playback.front();
        let view = GameView {
            board: playing.map_or(self.session.board(), |p| &p.board),
            matched: playing.and_then(|p| p.matched.as_ref()),
            cursor: self.cursor,
            selected: self.selected,
            hint: self.hint,
            score: self.session.score(),
            moves_remaining: self.session.moves_remaining(),
            target_score: self.session.target_score(),
            progress: self.session.progress(),
            status: self.session.status(),
            combo: playing
                .filter(|p| self.display.show_combo && p.combo_depth > 1)
                .map(|p| p.combo_depth),
            message: self.message.as_deref(),
            animating: self.is_animating(),
        };
        game_view::render(frame, &view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ScriptedSource;
    use crossterm::event::KeyModifiers;

    // Only (0,2) <-> (1,2) makes a run.
    const ONE_MOVE: [&str; 4] = ["AABC", "CDAB", "BCDA", "DBCD"];

    fn press(app: &mut App<ScriptedSource>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app(step_delay_ms: u64) -> App<ScriptedSource> {
        let board = Board::from_rows(&ONE_MOVE).unwrap();
        let config = GameConfig {
            kind_count: 4,
            max_moves: 5,
            target_score: 1000,
            ..GameConfig::default()
        };
        let session =
            GameSession::from_board(config, board, ScriptedSource::from_letters("DCB")).unwrap();
        let display = DisplayConfig {
            step_delay_ms,
            show_combo: true,
        };
        App::with_session(session, display)
    }

    fn select_at(app: &mut App<ScriptedSource>, pos: Position) {
        app.cursor = pos;
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = app(0);
        app.cursor = Position::new(0, 0);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.cursor, Position::new(0, 0));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, Position::new(1, 1));
    }

    #[test]
    fn test_select_then_swap_neighbour() {
        let mut app = app(0);
        select_at(&mut app, Position::new(0, 2));
        assert_eq!(app.selected, Some(Position::new(0, 2)));
        select_at(&mut app, Position::new(1, 2));
        assert_eq!(app.selected, None);
        assert_eq!(app.session.score(), 30);
        assert_eq!(app.session.moves_remaining(), 4);
        assert!(!app.is_animating());
    }

    #[test]
    fn test_reselecting_clears_selection() {
        let mut app = app(0);
        select_at(&mut app, Position::new(2, 2));
        select_at(&mut app, Position::new(2, 2));
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_far_cell_drops_selection() {
        let mut app = app(0);
        select_at(&mut app, Position::new(0, 0));
        select_at(&mut app, Position::new(3, 3));
        assert_eq!(app.selected, None);
        assert_eq!(app.session.moves_remaining(), 5);
    }

    #[test]
    fn test_unproductive_swap_reports_message() {
        let mut app = app(0);
        select_at(&mut app, Position::new(3, 0));
        select_at(&mut app, Position::new(3, 1));
        assert_eq!(app.message.as_deref(), Some("No match there."));
        assert_eq!(app.session.moves_remaining(), 5);
    }

    #[test]
    fn test_hint_key_highlights_move() {
        let mut app = app(0);
        press(&mut app, KeyCode::Char('?'));
        let hint = app.hint.unwrap();
        assert_eq!(hint.from, Position::new(0, 2));
        assert_eq!(hint.to, Position::new(1, 2));
    }

    #[test]
    fn test_playback_frames_and_input_lock() {
        let mut app = app(100);
        select_at(&mut app, Position::new(0, 2));
        select_at(&mut app, Position::new(1, 2));

        // One cascade step: matched, cleared, settled, refilled.
        assert_eq!(app.playback.len(), 4);
        let first = app.playback.front().unwrap();
        assert_eq!(first.matched.as_ref().map(MatchSet::len), Some(3));
        let swapped = Board::from_rows(&["AAAC", "CDBB", "BCDA", "DBCD"]).unwrap();
        assert_eq!(first.board, swapped);
        assert_eq!(app.playback.back().unwrap().board, *app.session.board());

        let before = app.cursor;
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, before);

        let mut now = Instant::now();
        while app.is_animating() {
            now += Duration::from_millis(200);
            app.advance_playback(now);
        }
        assert!(app.next_frame_at.is_none());
        press(&mut app, KeyCode::Left);
        assert_ne!(app.cursor, before);
    }

    #[test]
    fn test_quit_works_during_playback() {
        let mut app = app(100);
        select_at(&mut app, Position::new(0, 2));
        select_at(&mut app, Position::new(1, 2));
        assert!(app.is_animating());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_display_config_validation() {
        assert!(DisplayConfig::default().validate().is_ok());
        let slow = DisplayConfig {
            step_delay_ms: 10_000,
            show_combo: true,
        };
        assert!(slow.validate().is_err());
    }
}
