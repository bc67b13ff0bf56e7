use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use super::board_widget::{board_lines, CellMarks};
use crate::game::{Board, GameStatus, Hint, MatchSet, Position};

/// Everything the game screen draws, borrowed from the app for one frame.
pub struct GameView<'a> {
    pub board: &'a Board,
    pub matched: Option<&'a MatchSet>,
    pub cursor: Position,
    pub selected: Option<Position>,
    pub hint: Option<Hint>,
    pub score: u32,
    pub moves_remaining: u32,
    pub target_score: u32,
    pub progress: f64,
    pub status: GameStatus,
    pub combo: Option<u32>,
    pub message: Option<&'a str>,
    pub animating: bool,
}

pub fn render(frame: &mut Frame, view: &GameView) {
    let board_height = view.board.size() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),         // Header
            Constraint::Length(3),         // Progress
            Constraint::Min(board_height), // Board
            Constraint::Length(3),         // Message
            Constraint::Length(3),         // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_progress(frame, view, chunks[1]);
    render_board(frame, view, chunks[2]);
    render_message(frame, view, chunks[3]);
    render_controls(frame, chunks[4]);

    if view.status.is_terminal() && !view.animating {
        render_game_over(frame, view, chunks[2]);
    }
}

fn render_header(frame: &mut Frame, view: &GameView, area: Rect) {
    let text = Line::from(vec![
        Span::styled(
            format!("Score: {}", view.score),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(format!("Moves: {}", view.moves_remaining)),
        Span::raw("  |  "),
        Span::raw(format!("Target: {}", view.target_score)),
    ]);

    let header = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Candy Match"));

    frame.render_widget(header, area);
}

fn render_progress(frame: &mut Frame, view: &GameView, area: Rect) {
    let label = format!("{:.0}%", view.progress * 100.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Target"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_board(frame: &mut Frame, view: &GameView, area: Rect) {
    let lines = board_lines(view.board, |pos| CellMarks {
        cursor: !view.animating && pos == view.cursor,
        selected: view.selected == Some(pos),
        hinted: view.hint.is_some_and(|h| h.from == pos || h.to == pos),
        matched: view.matched.is_some_and(|m| m.contains(pos)),
    });

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, area);
}

fn render_message(frame: &mut Frame, view: &GameView, area: Rect) {
    let line = match (view.combo, view.message) {
        (Some(depth), _) => Line::from(Span::styled(
            format!("Combo x{depth}!"),
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        )),
        (None, Some(message)) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        (None, None) => Line::from(""),
    };

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new(
        "←↑↓→/hjkl: Move  |  Space: Select/Swap  |  ?: Hint  |  N: New game  |  Q: Quit",
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

fn render_game_over(frame: &mut Frame, view: &GameView, area: Rect) {
    let (title, message, color) = match view.status {
        GameStatus::Won => ("Level cleared!", "You reached the target score!", Color::Green),
        _ => ("Game over", "Out of moves. Try again!", Color::Red),
    };

    let popup = centered(area, 36, 6);
    let body = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Final score: {}", view.score)),
        Line::from(""),
        Line::from("N: play again  |  Q: quit"),
    ];

    let widget = Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
