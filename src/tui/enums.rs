//! Enumerations for TUI state management.

use crate::fields::ColumnId;

/// Popup drawn over the board, if any.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Overlay {
    #[default]
    None,
    CardDetail,
    Help,
}

/// Which column, if any, is shown expanded with full cards.
///
/// At most one column is open at a time; toggling the open one closes it,
/// toggling another switches to it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ExpandedColumn {
    open: Option<ColumnId>,
}

impl ExpandedColumn {
    pub fn open(&self) -> Option<ColumnId> {
        self.open
    }

    pub fn is_open(&self, column: ColumnId) -> bool {
        self.open == Some(column)
    }

    pub fn toggle(&mut self, column: ColumnId) {
        self.open = if self.is_open(column) { None } else { Some(column) };
    }
}
