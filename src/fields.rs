//! Enumerations and field types for work items and board columns.
//!
//! This module defines the structured values shared by the board, the card
//! renderer and the CLI: work item priorities and the fixed set of board columns.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Priority classification for a work item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Low")]
    Low,
}

/// The fixed set of board columns.
///
/// Columns are static configuration: the board never creates or destroys one at runtime.
/// Ordering follows the workflow from left to right.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ColumnId {
    #[serde(alias = "to-do")]
    Todo,
    #[serde(alias = "in-progress")]
    InProgress,
    Done,
}

impl ColumnId {
    /// Number of columns on every board.
    pub const COUNT: usize = 3;

    /// All columns in display order.
    pub const ALL: [ColumnId; ColumnId::COUNT] = [ColumnId::Todo, ColumnId::InProgress, ColumnId::Done];

    /// Position of the column on the board, left to right.
    pub fn index(self) -> usize {
        match self {
            ColumnId::Todo => 0,
            ColumnId::InProgress => 1,
            ColumnId::Done => 2,
        }
    }

    /// Column at the given board position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable identifier used in files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::InProgress => "inProgress",
            ColumnId::Done => "done",
        }
    }

    /// Human readable column heading.
    pub fn title(self) -> &'static str {
        match self {
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Done => "Done",
        }
    }

    /// Neighbouring column to the left or right, stopping at the board edges.
    pub fn step(self, forward: bool) -> Option<Self> {
        let i = self.index();
        if forward {
            Self::from_index(i + 1)
        } else {
            i.checked_sub(1).and_then(Self::from_index)
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColumnId {
    type Err = BoardError;

    /// Accepts the canonical key plus the usual spelling variants
    /// (`in-progress`, `in_progress`, `In Progress`, any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "todo" => Ok(ColumnId::Todo),
            "inprogress" => Ok(ColumnId::InProgress),
            "done" => Ok(ColumnId::Done),
            _ => Err(BoardError::InvalidColumn { name: s.to_string() }),
        }
    }
}
