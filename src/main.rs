use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use candy_match::config::AppConfig;
use candy_match::logging;
use candy_match::ui::App;

/// Play a match-3 board in the terminal.
#[derive(Parser)]
#[command(name = "candy-match", about = "Swap candies, clear runs, chain combos")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed the board generator for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long, default_value = "candy-match.log")]
    log_file: PathBuf,

    /// Log at debug level, including every cascade step
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_file(&cli.log_file, cli.verbose)
        .with_context(|| format!("opening log file {}", cli.log_file.display()))?;

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let mut app = App::new(config.game, config.display, cli.seed)
        .context("starting game session")?;

    run(&mut app).context("terminal UI failed")
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even when the app loop failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
