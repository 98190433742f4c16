//! Board file storage and table printing.
//!
//! The board file is the local persistence collaborator of the board store: it
//! is read once at start-up and written after each accepted move by the command
//! or UI layer. The board store itself never performs I/O.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::card::{format_priority, truncate};
use crate::error::{BoardError, Result};
use crate::fields::ColumnId;
use crate::seed;
use crate::task::WorkItem;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Serialized form of a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFile {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Unix seconds of the last save, 0 when never saved
    #[serde(default)]
    pub saved_at_utc: i64,
    #[serde(default)]
    pub columns: BTreeMap<ColumnId, Vec<WorkItem>>,
}

impl BoardFile {
    /// Capture a board, stamped with the current time.
    pub fn from_board(board: &Board) -> Self {
        BoardFile {
            version: FORMAT_VERSION,
            saved_at_utc: Utc::now().timestamp(),
            columns: board.columns().map(|(c, items)| (c, items.to_vec())).collect(),
        }
    }

    /// Validate and build the board.
    pub fn into_board(self) -> std::result::Result<Board, BoardError> {
        Board::from_columns(self.columns)
    }

    /// Read a board file. Returns `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let buf = fs::read_to_string(path)?;
        let file: BoardFile = serde_json::from_str(&buf)?;
        debug!(path = %path.display(), version = file.version, "loaded board file");
        Ok(Some(file))
    }

    /// Save using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let written = File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(data.as_bytes())?;
                f.flush()
            })
            .and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            // Never leave a half-written temp file next to the board.
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %path.display(), "saved board file");
        Ok(())
    }
}

/// Load the board at `path`, falling back to the seed board when there is no file yet.
///
/// A file that exists but cannot be parsed is an error rather than a silent reset.
pub fn load_board(path: &Path) -> Result<Board> {
    load_board_stamped(path).map(|(board, _)| board)
}

/// Like [`load_board`], also returning the last save time (0 for the seed board).
pub fn load_board_stamped(path: &Path) -> Result<(Board, i64)> {
    match BoardFile::load(path)? {
        Some(file) => {
            let saved_at = file.saved_at_utc;
            Ok((file.into_board()?, saved_at))
        }
        None => {
            info!(path = %path.display(), "no board file yet, starting from seed");
            Ok((seed::default_board()?, 0))
        }
    }
}

/// Persist a board snapshot to `path`.
pub fn save_board(board: &Board, path: &Path) -> Result<()> {
    BoardFile::from_board(board).save(path)
}

/// Format a save timestamp in local time, or "never".
pub fn format_saved_at(saved_at_utc: i64) -> String {
    if saved_at_utc <= 0 {
        return "never".into();
    }
    match Utc.timestamp_opt(saved_at_utc, 0).single() {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".into(),
    }
}

/// Print the board as a table, one section per column.
pub fn print_board(board: &Board, only: Option<ColumnId>) {
    for (column, items) in board.columns() {
        if only.is_some_and(|c| c != column) {
            continue;
        }
        println!("{} ({}) [{}]", column.title(), items.len(), column.key());
        if items.is_empty() {
            println!("  (empty)");
            println!();
            continue;
        }
        println!(
            "  {:<4} {:<8} {:<10} {:<7} {:<5} {:<16} {}",
            "#", "ID", "Code", "Pri", "Done", "Project", "Title"
        );
        for (i, item) in items.iter().enumerate() {
            println!(
                "  {:<4} {:<8} {:<10} {:<7} {:>4}% {:<16} {}",
                i,
                truncate(&item.id, 8),
                truncate(&item.code, 10),
                format_priority(item.priority),
                item.progress_percent,
                truncate(&item.project_label, 16),
                item.title
            );
        }
        println!();
    }
}
