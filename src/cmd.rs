//! Command implementations for the CLI interface.
//!
//! Each handler loads the board file, performs one operation and, for changes,
//! saves it back. Errors are returned to `main`, which reports them and exits.

use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::info;

use crate::board::{BoardStore, MoveOutcome, MoveRequest};
use crate::card;
use crate::db::{self, print_board};
use crate::error::{AppError, BoardError, Result};
use crate::fields::ColumnId;
use crate::seed;
use crate::tui::board_run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board interface.
    Ui,

    /// Print the board as a table.
    Show {
        /// Only show one column: todo | in-progress | done.
        #[arg(long)]
        column: Option<String>,
    },

    /// Show one card as the board renders it.
    Card {
        /// Work item ID.
        id: String,
    },

    /// Move a card: take it from <FROM> at <INDEX> and insert it into <TO> at <DEST>.
    ///
    /// <DEST> counts positions after the card has been taken out.
    Move {
        /// Source column.
        from: String,
        /// Position in the source column (0-based).
        index: usize,
        /// Destination column.
        to: String,
        /// Position in the destination column (0-based).
        dest: usize,
    },

    /// Write the seed board to the board file.
    Init {
        /// Overwrite an existing board file.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the board UI.
pub fn cmd_ui(board_path: &Path) -> Result<()> {
    run_board_tui(board_path)
}

/// Print the board, or a single column of it.
pub fn cmd_show(board_path: &Path, column: Option<String>) -> Result<()> {
    let only = column.map(|c| c.parse::<ColumnId>()).transpose()?;
    let (board, saved_at) = db::load_board_stamped(board_path)?;

    println!("Board: {} (saved {})", board_path.display(), db::format_saved_at(saved_at));
    println!();
    print_board(&board, only);
    Ok(())
}

/// Text block for one card: a location line followed by the rendered card lines.
pub fn card_text(board_path: &Path, id: &str) -> Result<Vec<String>> {
    let board = db::load_board(board_path)?;
    let slot = board.locate(id).ok_or_else(|| BoardError::NotFound { id: id.to_string() })?;
    let item = board.get(id).ok_or_else(|| BoardError::NotFound { id: id.to_string() })?;
    let view = card::render(item);

    let mut out = vec![format!("{} (column {}, position {})", view.id, slot.column.title(), slot.index)];
    out.extend(view.lines(60).into_iter().map(|line| format!("  {line}")));
    Ok(out)
}

/// Print one card's rendered fields.
pub fn cmd_card(board_path: &Path, id: &str) -> Result<()> {
    for line in card_text(board_path, id)? {
        println!("{line}");
    }
    Ok(())
}

/// Apply one move to the board file and return the outcome.
pub fn apply_move(board_path: &Path, from: &str, index: usize, to: &str, dest: usize) -> Result<MoveOutcome> {
    let request = MoveRequest::new(from.parse()?, index, to.parse()?, dest);
    let mut store = BoardStore::new(db::load_board(board_path)?);
    let outcome = store.move_item(request)?;
    if let MoveOutcome::Moved { .. } = outcome {
        db::save_board(store.snapshot(), board_path)?;
    }
    Ok(outcome)
}

/// Move a card and report what happened.
pub fn cmd_move(board_path: &Path, from: &str, index: usize, to: &str, dest: usize) -> Result<()> {
    match apply_move(board_path, from, index, to, dest)? {
        MoveOutcome::Moved { id, from, to } => {
            println!(
                "Moved {} from {} #{} to {} #{}",
                id,
                from.column.title(),
                from.index,
                to.column.title(),
                to.index
            );
        }
        MoveOutcome::Unchanged => println!("Card already at that position; nothing changed"),
    }
    Ok(())
}

/// Write the seed board, refusing to replace an existing file unless forced.
pub fn cmd_init(board_path: &Path, force: bool) -> Result<()> {
    if board_path.exists() && !force {
        return Err(AppError::AlreadyExists { path: board_path.to_path_buf() });
    }
    let board = seed::default_board()?;
    db::save_board(&board, board_path)?;
    info!(path = %board_path.display(), items = board.len(), "initialised board file");
    println!("Wrote seed board with {} cards to {}", board.len(), board_path.display());
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Slot;
    use tempfile::TempDir;

    #[test]
    fn test_apply_move_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        cmd_init(&path, false).unwrap();

        let first = db::load_board(&path).unwrap().ids(ColumnId::Todo)[0].to_string();
        let outcome = apply_move(&path, "todo", 0, "done", 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                id: first.clone(),
                from: Slot::new(ColumnId::Todo, 0),
                to: Slot::new(ColumnId::Done, 0),
            }
        );

        let board = db::load_board(&path).unwrap();
        assert_eq!(board.locate(&first), Some(Slot::new(ColumnId::Done, 0)));
    }

    #[test]
    fn test_apply_move_accepts_column_spellings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        let outcome = apply_move(&path, "To Do", 1, "in-progress", 0).unwrap();
        assert!(matches!(outcome, MoveOutcome::Moved { .. }));
        assert!(path.exists());
    }

    #[test]
    fn test_apply_move_noop_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        assert_eq!(apply_move(&path, "done", 0, "done", 0).unwrap(), MoveOutcome::Unchanged);
        assert!(!path.exists());
    }

    #[test]
    fn test_apply_move_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        assert!(matches!(
            apply_move(&path, "backlog", 0, "done", 0),
            Err(AppError::Board(BoardError::InvalidColumn { .. }))
        ));
        assert!(matches!(
            apply_move(&path, "todo", 99, "done", 0),
            Err(AppError::Board(BoardError::OutOfRange { .. }))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        cmd_init(&path, false).unwrap();
        assert!(matches!(cmd_init(&path, false), Err(AppError::AlreadyExists { .. })));
        cmd_init(&path, true).unwrap();
    }

    #[test]
    fn test_card_text_lists_each_field_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        let board = db::load_board(&path).unwrap();
        let item = board.column(ColumnId::Todo)[0].clone();

        let text = card_text(&path, &item.id).unwrap();
        assert!(text[0].starts_with(&format!("{} (column To Do, position 0)", item.id)));
        assert_eq!(text.iter().filter(|l| l.contains(&item.project_label)).count(), 1);
        assert_eq!(text.iter().filter(|l| l.contains(&item.due_label)).count(), 1);
    }

    #[test]
    fn test_card_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        assert!(matches!(
            cmd_card(&path, "nope"),
            Err(AppError::Board(BoardError::NotFound { .. }))
        ));
    }
}
