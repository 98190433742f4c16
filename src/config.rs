//! Runtime settings resolved from command line flags and the environment.
//!
//! Data lives in `~/.taskboard/` by default: the board file (`board.json`) and
//! the log file (`taskboard.log`). `TASKBOARD_HOME` moves the directory,
//! `--board` points at a specific board file (its directory then holds the log).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "TASKBOARD_HOME";
/// Environment variable holding the log filter, e.g. `debug` or `taskboard=trace`.
pub const LOG_ENV: &str = "TASKBOARD_LOG";

const BOARD_FILE: &str = "board.json";
const LOG_FILE: &str = "taskboard.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved locations and log filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub board_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn resolve(board_flag: Option<&Path>, log_flag: Option<&str>) -> Self {
        Self::resolve_with(
            board_flag,
            log_flag,
            env::var(HOME_ENV).ok().as_deref(),
            env::var(LOG_ENV).ok().as_deref(),
            env::var("HOME").ok().as_deref(),
        )
    }

    /// Resolution with the environment passed in explicitly.
    pub fn resolve_with(
        board_flag: Option<&Path>,
        log_flag: Option<&str>,
        home_override: Option<&str>,
        log_env: Option<&str>,
        home: Option<&str>,
    ) -> Self {
        let non_empty = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let (data_dir, board_path) = match board_flag {
            Some(path) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."))
                    .to_path_buf();
                (dir, path.to_path_buf())
            }
            None => {
                let dir = match (non_empty(home_override), non_empty(home)) {
                    (Some(dir), _) => PathBuf::from(dir),
                    (None, Some(home)) => PathBuf::from(home).join(".taskboard"),
                    (None, None) => PathBuf::from("."),
                };
                let board = dir.join(BOARD_FILE);
                (dir, board)
            }
        };

        let log_filter = non_empty(log_flag)
            .or_else(|| non_empty(log_env))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Settings {
            log_path: data_dir.join(LOG_FILE),
            data_dir,
            board_path,
            log_filter,
        }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}
