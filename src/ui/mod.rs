//! Terminal UI: the board, score header and cascade playback for playing a
//! session interactively.

mod app;
pub mod board_widget;
mod game_view;

pub use app::{App, DisplayConfig};
