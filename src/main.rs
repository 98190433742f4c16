//! # TB - Site Task Board
//!
//! A terminal Kanban board for construction work items, with a command line for
//! scripting and an interactive terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Three fixed columns**: To Do → In Progress → Done
//! - **Drag and drop**: re-sequence cards within a column or move them across columns,
//!   with the mouse or by picking a card up with the keyboard
//! - **Rich cards**: code, priority, title, project, assignee, due label and progress
//! - **Local file storage**: a single JSON board file, saved after every accepted move
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a board from the seed data
//! tb init
//!
//! # Launch the board
//! tb ui
//!
//! # Print the board
//! tb show
//!
//! # Move the first To Do card to the top of In Progress
//! tb move todo 0 in-progress 0
//! ```
//!
//! ## Key Commands
//!
//! - `tb ui` - Launch the board TUI
//! - `tb show [--column <col>]` - Print the board as a table
//! - `tb card <id>` - Show one card
//! - `tb move <from> <index> <to> <dest>` - Move one card
//! - `tb init [--force]` - Write the seed board
//!
//! Data is stored locally in `~/.taskboard/` (or `$TASKBOARD_HOME`), together with
//! the log file `taskboard.log`. Set `TASKBOARD_LOG=debug` for more detail.

use clap::Parser;

pub mod board;
pub mod card;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod drag;
pub mod error;
pub mod fields;
pub mod logging;
pub mod seed;
pub mod task;
pub mod tui {
    pub mod board;
    pub mod board_run;
    pub mod colors;
    pub mod enums;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Settings;
use logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let settings = Settings::resolve(cli.board.as_deref(), cli.log_level.as_deref());

    // Logging is best effort: a broken log file must not block the board.
    if !matches!(cli.command, Commands::Completions { .. }) {
        if let Err(e) = init_logging(&settings) {
            eprintln!("Warning: logging disabled: {e}");
        }
    }

    let board_path = settings.board_path.as_path();
    let result = match cli.command {
        Commands::Ui => cmd_ui(board_path),
        Commands::Show { column } => cmd_show(board_path, column),
        Commands::Card { id } => cmd_card(board_path, &id),
        Commands::Move { from, index, to, dest } => cmd_move(board_path, &from, index, &to, dest),
        Commands::Init { force } => cmd_init(board_path, force),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
