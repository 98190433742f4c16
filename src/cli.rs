use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed Kanban board for site work items.
/// Storage defaults to ~/.taskboard/board.json or a path passed via --board.
#[derive(Parser)]
#[command(name = "tb", version, about = "Kanban board for construction work items")]
pub struct Cli {
    /// Path to the JSON board file.
    #[arg(long, global = true)]
    pub board: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `taskboard=trace` (overrides TASKBOARD_LOG).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
