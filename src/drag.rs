//! Drag session controller.
//!
//! Turns a pointer or keyboard drag gesture into at most one [`MoveRequest`].
//! The session only tracks the gesture; it never touches the board. A gesture
//! that is cancelled, or released while no drop target is under the pointer,
//! produces nothing.

use tracing::trace;

use crate::board::{Board, MoveRequest, Slot};
use crate::fields::ColumnId;

/// Where the gesture currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: Slot,
        /// Drop slot under the pointer, `None` when outside every column
        target: Option<Slot>,
    },
}

/// Gesture tracker for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Slot the dragged card came from.
    pub fn source(&self) -> Option<Slot> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    /// Current drop target.
    pub fn target(&self) -> Option<Slot> {
        match self.state {
            DragState::Dragging { target, .. } => target,
            DragState::Idle => None,
        }
    }

    /// Pick up the card at `source`. The card starts over its own slot.
    ///
    /// Returns `false` and keeps the running gesture if one is already active.
    pub fn begin(&mut self, source: Slot) -> bool {
        if self.is_active() {
            return false;
        }
        trace!(?source, "drag started");
        self.state = DragState::Dragging {
            source,
            target: Some(source),
        };
        true
    }

    /// Update the drop target under the pointer. Ignored while idle.
    pub fn hover(&mut self, over: Option<Slot>) {
        if let DragState::Dragging { target, .. } = &mut self.state {
            *target = over;
        }
    }

    /// Move the drop target one column left or right, keeping a legal index.
    pub fn nudge_column(&mut self, board: &Board, forward: bool) {
        let Some(source) = self.source() else { return };
        let current = self.target().unwrap_or(source);
        if let Some(column) = current.column.step(forward) {
            let limit = board.drop_limit(source.column, column);
            self.hover(Some(Slot::new(column, current.index.min(limit))));
        }
    }

    /// Move the drop target one position up or down within its column.
    pub fn nudge_index(&mut self, board: &Board, down: bool) {
        let Some(source) = self.source() else { return };
        let current = self.target().unwrap_or(source);
        let limit = board.drop_limit(source.column, current.column);
        let index = if down {
            (current.index + 1).min(limit)
        } else {
            current.index.saturating_sub(1)
        };
        self.hover(Some(Slot::new(current.column, index)));
    }

    /// Finish the gesture. Yields exactly one request if it ended over a target.
    pub fn release(&mut self) -> Option<MoveRequest> {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Dragging { source, target: Some(target) } => {
                trace!(?source, ?target, "drag released over target");
                Some(MoveRequest::between(source, target))
            }
            DragState::Dragging { source, target: None } => {
                trace!(?source, "drag released outside any column");
                None
            }
            DragState::Idle => None,
        }
    }

    /// Abandon the gesture without producing a move.
    pub fn cancel(&mut self) {
        if self.is_active() {
            trace!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}

/// Clamp a raw drop position to the legal range for the dragged card.
pub fn clamp_drop(board: &Board, source: ColumnId, column: ColumnId, index: usize) -> Slot {
    Slot::new(column, index.min(board.drop_limit(source, column)))
}
