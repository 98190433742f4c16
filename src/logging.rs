//! Logging bootstrap.
//!
//! Events go to a plain-text log file in the data directory so that nothing is
//! written over the terminal UI. Initialisation happens once per process.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::error::{AppError, Result};

/// Install the global subscriber writing to `settings.log_path`.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.log_filter).map_err(|err| AppError::Logging {
        message: format!("invalid log filter `{}`: {err}", settings.log_filter),
    })?;

    settings.ensure_data_dir()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| AppError::Logging { message: err.to_string() })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        board = %settings.board_path.display(),
        "taskboard started"
    );
    Ok(())
}
