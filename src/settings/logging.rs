use std::{
    fs,
    io::{stderr, IsTerminal},
    path::PathBuf,
};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::settings::consts::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, CONSOLE_LOG_DIRECTIVES, ENVELOPE_DUMP_DIRECTIVES,
    LOG_FILE,
};

/// Installs the global subscriber: a short stderr line per event, and the full event
/// history as JSON lines in `compte-cli.log` under the platform data directory.
///
/// `RUST_LOG` overrides `verbose` for the console; the log file always gets every level.
pub fn init_logger(verbose: bool) -> Result<()> {
    let log_dir = log_directory()?;

    let console = fmt::layer()
        .with_writer(stderr)
        .with_ansi(stderr().is_terminal())
        .without_time()
        .with_target(verbose)
        .compact()
        .with_filter(console_filter(verbose));

    let history = fmt::layer()
        .json()
        .with_writer(rolling::never(&log_dir, LOG_FILE))
        .with_current_span(false)
        .flatten_event(true);

    registry()
        .with(console)
        .with(history)
        .try_init()
        .context("a tracing subscriber is already installed")
}

fn log_directory() -> Result<PathBuf> {
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .ok_or_else(|| anyhow!("Could not determine project directories"))?;
    let dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    Ok(dir)
}

fn console_directives(verbose: bool) -> &'static str {
    if verbose {
        ENVELOPE_DUMP_DIRECTIVES
    } else {
        CONSOLE_LOG_DIRECTIVES
    }
}

fn console_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_directives(verbose)))
}
