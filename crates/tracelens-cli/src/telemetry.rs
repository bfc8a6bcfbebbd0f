//! Logging bootstrap.
//!
//! Console commands log to stderr. The explorer owns the terminal, so while it
//! runs logs go to `TRACELENS_LOG_FILE` when set and are dropped otherwise.

use std::fs::OpenOptions;
use std::sync::Mutex;

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::args::LogLevel;

pub const LOG_ENV: &str = "TRACELENS_LOG";
pub const LOG_FILE_ENV: &str = "TRACELENS_LOG_FILE";

/// `TRACELENS_LOG` wins over `--log-level`.
fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

pub fn init_cli_tracing(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .try_init();
}

pub fn init_tui_tracing(level: LogLevel) {
    let Ok(path) = std::env::var(LOG_FILE_ENV) else {
        return;
    };
    if path.is_empty() {
        return;
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {}", path, e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .try_init();
}
