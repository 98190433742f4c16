//! Error types for the board and the application around it.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::fields::ColumnId;

/// Which side of a move an index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRole {
    Source,
    Destination,
}

impl fmt::Display for IndexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexRole::Source => f.write_str("source"),
            IndexRole::Destination => f.write_str("destination"),
        }
    }
}

/// Errors raised by board construction and moves.
///
/// A rejected operation never mutates the board.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Column identifier outside the fixed column set
    #[error("unknown column: '{name}' (expected todo, inProgress or done)")]
    InvalidColumn { name: String },

    /// Index outside the legal range for the column
    #[error("{role} index {index} out of range for column '{column}'{}", describe_max(.max))]
    OutOfRange {
        role: IndexRole,
        column: ColumnId,
        index: usize,
        /// Highest legal index, `None` when the column has no legal index at all
        max: Option<usize>,
    },

    /// Two work items share an id
    #[error("duplicate work item id: {id}")]
    DuplicateId { id: String },

    /// Progress outside 0..=100
    #[error("progress for work item '{id}' must be within 0..=100, got {value}")]
    InvalidProgress { id: String, value: u8 },

    /// No work item with this id on the board
    #[error("work item not found: {id}")]
    NotFound { id: String },
}

fn describe_max(max: &Option<usize>) -> String {
    match max {
        Some(m) => format!(" (allowed 0..={m})"),
        None => " (column is empty)".to_string(),
    }
}

/// Result type for application level operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by commands, the board file and the terminal UI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("board file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Refused to overwrite an existing board file
    #[error("board file already exists at {} (use --force to overwrite)", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to initialise logging: {message}")]
    Logging { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = BoardError::OutOfRange {
            role: IndexRole::Source,
            column: ColumnId::Todo,
            index: 5,
            max: Some(1),
        };
        assert_eq!(err.to_string(), "source index 5 out of range for column 'todo' (allowed 0..=1)");

        let err = BoardError::OutOfRange {
            role: IndexRole::Source,
            column: ColumnId::Done,
            index: 0,
            max: None,
        };
        assert_eq!(err.to_string(), "source index 0 out of range for column 'done' (column is empty)");
    }

    #[test]
    fn test_board_error_is_transparent_in_app_error() {
        let err: AppError = BoardError::NotFound { id: "wi-9".into() }.into();
        assert_eq!(err.to_string(), "work item not found: wi-9");
    }
}
