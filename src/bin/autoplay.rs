use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use candy_match::autoplay::{AutoplayStats, Autoplayer, StrategyKind};
use candy_match::config::AppConfig;
use candy_match::game::{Board, GameSession, RandomSource};
use candy_match::logging;

/// Play match-3 sessions without a terminal UI and report statistics.
#[derive(Parser)]
#[command(name = "autoplay", about = "Batch-play candy-match with a fixed strategy")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of games to play
    #[arg(long)]
    games: Option<usize>,

    /// Override the move-picking strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Seed for board generation and the random strategy
    #[arg(long)]
    seed: Option<u64>,

    /// Play a single game from this board file (one row of letters per line)
    #[arg(long)]
    board: Option<PathBuf>,

    /// Print the final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_stderr(cli.verbose);

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(games) = cli.games {
        app_config.autoplay.games = games;
    }
    if let Some(strategy) = cli.strategy {
        app_config.autoplay.strategy = strategy;
    }
    if cli.seed.is_some() {
        app_config.autoplay.seed = cli.seed;
    }
    app_config.validate().context("invalid configuration")?;

    let seed = app_config.autoplay.seed;
    let autoplayer = Autoplayer::new(app_config.game.clone(), app_config.autoplay);

    let stats = match &cli.board {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading board from {}", path.display()))?;
            let board = Board::parse(&text)
                .with_context(|| format!("parsing board from {}", path.display()))?;
            let source = match seed {
                Some(seed) => RandomSource::seeded(seed),
                None => RandomSource::from_os_rng(),
            };
            let mut session = GameSession::from_board(app_config.game, board, source)
                .context("board cannot start a session")?;
            autoplayer.run_session(&mut session)
        }
        None => autoplayer.run().context("autoplay failed")?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary(&stats);
    }
    Ok(())
}

fn print_summary(stats: &AutoplayStats) {
    println!("Strategy:       {}", stats.strategy);
    println!("Games:          {}", stats.games);
    println!(
        "Wins / losses:  {} / {} ({:.1}% won)",
        stats.wins,
        stats.losses,
        stats.win_rate() * 100.0
    );
    println!("Stalled:        {}", stats.stalled);
    println!("Average score:  {:.1}", stats.average_score());
    println!("Best score:     {}", stats.best_score);
    println!("Average moves:  {:.1}", stats.average_moves_used());
    println!("Best combo:     {}", stats.best_combo);
}
