//! Tracing setup for the two binaries. The terminal UI owns the screen, so it
//! logs to a file; the headless autoplay logs to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "candy_match=info";

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("candy_match=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Send log output to `path`, truncating whatever a previous run left there.
pub fn init_file(path: &Path, verbose: bool) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .init();
    Ok(())
}

pub fn init_stderr(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
