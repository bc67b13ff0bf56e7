//! # Candy Match
//!
//! A match-3 tile engine. Candies sit on a square grid; swapping two
//! neighbours that lines up three or more of a kind clears them, the column
//! above falls, fresh candies drop in from the top, and any new runs chain
//! into a combo. Ships a terminal front end built with Ratatui and a headless
//! autoplay runner for batch statistics.
//!
//! ## Modules
//!
//! - [`game`]: Core engine: board, run detection, cascade, hints, session
//! - [`autoplay`]: Move-picking strategies and batch play statistics
//! - [`ui`]: Terminal UI: board view with animated cascades
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: Tracing subscriber setup for the binaries
//! - [`error`]: Structured error types

pub mod autoplay;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod ui;
