use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::game::{Board, CandyKind, Cell, Position};

/// Per-cell decorations layered over the candy colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMarks {
    pub cursor: bool,
    pub selected: bool,
    pub hinted: bool,
    pub matched: bool,
}

pub fn kind_color(kind: CandyKind) -> Color {
    match kind.index() {
        0 => Color::Red,
        1 => Color::Rgb(255, 140, 0),
        2 => Color::Yellow,
        3 => Color::Magenta,
        4 => Color::LightMagenta,
        5 => Color::LightRed,
        6 => Color::Blue,
        _ => Color::Green,
    }
}

pub fn cell_span(cell: Cell, marks: CellMarks) -> Span<'static> {
    let (symbol, mut style) = match cell {
        Cell::Empty => (" · ", Style::default().fg(Color::DarkGray)),
        Cell::Candy(kind) if marks.matched => (
            " ✶ ",
            Style::default().fg(kind_color(kind)).add_modifier(Modifier::BOLD),
        ),
        Cell::Candy(kind) => (" ● ", Style::default().fg(kind_color(kind))),
    };

    if marks.hinted {
        style = style.bg(Color::Green);
    }
    if marks.selected {
        style = style.bg(Color::Cyan).add_modifier(Modifier::BOLD);
    }
    if marks.cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Span::styled(symbol, style)
}

/// One line per board row, each cell decorated by `marks`.
pub fn board_lines(board: &Board, marks: impl Fn(Position) -> CellMarks) -> Vec<Line<'static>> {
    (0..board.size())
        .map(|row| {
            let spans: Vec<Span> = (0..board.size())
                .map(|col| {
                    let pos = Position::new(row, col);
                    cell_span(board.get(pos), marks(pos))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
