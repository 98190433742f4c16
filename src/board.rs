//! Board state store and the move algorithm.
//!
//! A [`Board`] partitions work items into the fixed set of [`ColumnId`]s, each an
//! ordered sequence where position is array order alone. The [`BoardStore`] owns
//! the board and is the only thing allowed to change it, through
//! [`BoardStore::move_item`].
//!
//! Invariants held between calls:
//! - every work item sits in exactly one column at exactly one position;
//! - a move relocates an item and never creates, drops or duplicates one;
//! - a rejected move leaves the board untouched.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{BoardError, IndexRole};
use crate::fields::ColumnId;
use crate::task::WorkItem;

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub column: ColumnId,
    pub index: usize,
}

impl Slot {
    pub fn new(column: ColumnId, index: usize) -> Self {
        Slot { column, index }
    }
}

/// A request to relocate one work item, as produced by a completed drag gesture.
///
/// `dest_index` is interpreted against the destination column *after* the item
/// has been removed from its source, so `dest_index == len` appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub source_column: ColumnId,
    pub source_index: usize,
    pub dest_column: ColumnId,
    pub dest_index: usize,
}

impl MoveRequest {
    pub fn new(source_column: ColumnId, source_index: usize, dest_column: ColumnId, dest_index: usize) -> Self {
        MoveRequest {
            source_column,
            source_index,
            dest_column,
            dest_index,
        }
    }

    /// Build a request from a source and destination slot.
    pub fn between(source: Slot, dest: Slot) -> Self {
        Self::new(source.column, source.index, dest.column, dest.index)
    }

    /// True when the request would put the item back where it already is.
    pub fn is_noop(&self) -> bool {
        self.source_column == self.dest_column && self.source_index == self.dest_index
    }
}

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The request named the item's current slot; nothing changed.
    Unchanged,
    /// The item now lives at `to`.
    Moved { id: String, from: Slot, to: Slot },
}

/// Mapping from column to its ordered work items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    columns: [Vec<WorkItem>; ColumnId::COUNT],
}

impl Board {
    /// Build a board from column contents, validating ids and progress values.
    ///
    /// Columns that are not mentioned start empty. A column listed twice has its
    /// items appended in the order given.
    pub fn from_columns<I>(columns: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (ColumnId, Vec<WorkItem>)>,
    {
        let mut board = Board::default();
        for (column, items) in columns {
            board.columns[column.index()].extend(items);
        }

        let mut seen = HashSet::new();
        for item in board.columns.iter().flatten() {
            if !seen.insert(item.id.as_str()) {
                return Err(BoardError::DuplicateId { id: item.id.clone() });
            }
            if item.progress_percent > 100 {
                return Err(BoardError::InvalidProgress {
                    id: item.id.clone(),
                    value: item.progress_percent,
                });
            }
        }
        Ok(board)
    }

    /// Items of one column in order.
    pub fn column(&self, column: ColumnId) -> &[WorkItem] {
        &self.columns[column.index()]
    }

    /// All columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &[WorkItem])> + '_ {
        ColumnId::ALL.into_iter().map(move |c| (c, self.column(c)))
    }

    /// Total number of work items on the board.
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a work item by id.
    pub fn get(&self, id: &str) -> Option<&WorkItem> {
        self.columns.iter().flatten().find(|item| item.id == id)
    }

    /// Find where a work item currently sits.
    pub fn locate(&self, id: &str) -> Option<Slot> {
        self.columns().find_map(|(column, items)| {
            items
                .iter()
                .position(|item| item.id == id)
                .map(|index| Slot::new(column, index))
        })
    }

    /// The work item at a slot, if the slot is occupied.
    pub fn item_at(&self, slot: Slot) -> Option<&WorkItem> {
        self.column(slot.column).get(slot.index)
    }

    /// Ids of one column in order.
    pub fn ids(&self, column: ColumnId) -> Vec<&str> {
        self.column(column).iter().map(|item| item.id.as_str()).collect()
    }

    /// Highest legal destination index for an item leaving `source` for `dest`.
    ///
    /// For a move within one column this is the post-removal length, otherwise
    /// the destination's current length (append).
    pub fn drop_limit(&self, source: ColumnId, dest: ColumnId) -> usize {
        let len = self.column(dest).len();
        if source == dest {
            len.saturating_sub(1)
        } else {
            len
        }
    }

    /// Check a request against the board without changing anything.
    pub fn validate(&self, request: &MoveRequest) -> Result<(), BoardError> {
        let source_len = self.column(request.source_column).len();
        if request.source_index >= source_len {
            return Err(BoardError::OutOfRange {
                role: IndexRole::Source,
                column: request.source_column,
                index: request.source_index,
                max: source_len.checked_sub(1),
            });
        }

        let limit = self.drop_limit(request.source_column, request.dest_column);
        if request.dest_index > limit {
            return Err(BoardError::OutOfRange {
                role: IndexRole::Destination,
                column: request.dest_column,
                index: request.dest_index,
                max: Some(limit),
            });
        }
        Ok(())
    }

    /// Remove then insert. Callers validate first; only the store calls this.
    fn relocate(&mut self, request: &MoveRequest) -> String {
        let item = self.columns[request.source_column.index()].remove(request.source_index);
        let id = item.id.clone();
        self.columns[request.dest_column.index()].insert(request.dest_index, item);
        id
    }
}

/// Owner of the current board and sole mutator of it.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    board: Board,
    revision: u64,
}

impl BoardStore {
    pub fn new(board: Board) -> Self {
        BoardStore { board, revision: 0 }
    }

    /// Current board snapshot.
    pub fn snapshot(&self) -> &Board {
        &self.board
    }

    /// Number of moves that actually changed the board since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Relocate one work item.
    ///
    /// Returns [`MoveOutcome::Unchanged`] without touching the board when the
    /// request names the item's current slot, and rejects out of range indices
    /// with [`BoardError::OutOfRange`] before anything is mutated.
    pub fn move_item(&mut self, request: MoveRequest) -> Result<MoveOutcome, BoardError> {
        if let Err(err) = self.board.validate(&request) {
            warn!(?request, %err, "rejected move");
            return Err(err);
        }

        if request.is_noop() {
            debug!(?request, "move is a no-op");
            return Ok(MoveOutcome::Unchanged);
        }

        let id = self.board.relocate(&request);
        self.revision += 1;
        debug!(
            id = %id,
            from = %request.source_column,
            from_index = request.source_index,
            to = %request.dest_column,
            to_index = request.dest_index,
            revision = self.revision,
            "moved work item"
        );

        Ok(MoveOutcome::Moved {
            id,
            from: Slot::new(request.source_column, request.source_index),
            to: Slot::new(request.dest_column, request.dest_index),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::fields::ColumnId::{Done, InProgress, Todo};

    fn board(layout: &[(ColumnId, &[&str])]) -> Board {
        Board::from_columns(
            layout.iter()
                .map(|(column, ids)| (*column, ids.iter().map(|id| WorkItem::new(*id, format!("Task {id}"))).collect())),
        )
        .unwrap()
    }

    fn sorted_ids(board: &Board) -> Vec<String> {
        let mut ids: Vec<String> = board.columns().flat_map(|(_, items)| items.iter().map(|i| i.id.clone())).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_cross_column_move() {
        let mut store = BoardStore::new(board(&[(Todo, &["A", "B"]), (InProgress, &["C"])]));
        let outcome = store.move_item(MoveRequest::new(Todo, 0, InProgress, 1)).unwrap();

        assert_eq!(store.snapshot().ids(Todo), vec!["B"]);
        assert_eq!(store.snapshot().ids(InProgress), vec!["C", "A"]);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                id: "A".into(),
                from: Slot::new(Todo, 0),
                to: Slot::new(InProgress, 1),
            }
        );
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_within_column_reorder() {
        let mut store = BoardStore::new(board(&[(Todo, &["A", "B", "C"])]));
        store.move_item(MoveRequest::new(Todo, 0, Todo, 2)).unwrap();
        assert_eq!(store.snapshot().ids(Todo), vec!["B", "C", "A"]);

        store.move_item(MoveRequest::new(Todo, 2, Todo, 0)).unwrap();
        assert_eq!(store.snapshot().ids(Todo), vec!["A", "B", "C"]);

        store.move_item(MoveRequest::new(Todo, 1, Todo, 2)).unwrap();
        assert_eq!(store.snapshot().ids(Todo), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_append_at_end_empties_source() {
        let mut store = BoardStore::new(board(&[(Todo, &["Y"]), (Done, &["X"])]));
        store.move_item(MoveRequest::new(Todo, 0, Done, 1)).unwrap();
        assert_eq!(store.snapshot().ids(Done), vec!["X", "Y"]);
        assert!(store.snapshot().column(Todo).is_empty());
    }

    #[test]
    fn test_insert_into_empty_column() {
        let mut store = BoardStore::new(board(&[(Todo, &["A"])]));
        store.move_item(MoveRequest::new(Todo, 0, InProgress, 0)).unwrap();
        assert_eq!(store.snapshot().ids(InProgress), vec!["A"]);
        assert!(store.snapshot().column(Todo).is_empty());
    }

    #[test]
    fn test_same_slot_is_noop() {
        let original = board(&[(Todo, &["A", "B", "C"]), (Done, &["D"])]);
        let mut store = BoardStore::new(original.clone());

        let outcome = store.move_item(MoveRequest::new(Todo, 1, Todo, 1)).unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(store.snapshot(), &original);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_source_out_of_range_is_rejected() {
        let original = board(&[(Todo, &["A", "B"]), (Done, &["X"])]);
        let mut store = BoardStore::new(original.clone());

        let err = store.move_item(MoveRequest::new(Todo, 5, Done, 0)).unwrap_err();

        assert_eq!(
            err,
            BoardError::OutOfRange {
                role: IndexRole::Source,
                column: Todo,
                index: 5,
                max: Some(1),
            }
        );
        assert_eq!(store.snapshot(), &original);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_destination_bounds() {
        let original = board(&[(Todo, &["A", "B"]), (Done, &["X"])]);
        let mut store = BoardStore::new(original.clone());

        // Same column: the post-removal length is 1, so 2 is past the end.
        let err = store.move_item(MoveRequest::new(Todo, 0, Todo, 2)).unwrap_err();
        assert!(matches!(
            err,
            BoardError::OutOfRange { role: IndexRole::Destination, max: Some(1), .. }
        ));

        // Cross column: appending at len is fine, len + 1 is not.
        let err = store.move_item(MoveRequest::new(Todo, 0, Done, 2)).unwrap_err();
        assert!(matches!(
            err,
            BoardError::OutOfRange { role: IndexRole::Destination, column: Done, index: 2, max: Some(1) }
        ));
        assert_eq!(store.snapshot(), &original);
    }

    #[test]
    fn test_move_from_empty_column_is_rejected() {
        let mut store = BoardStore::new(board(&[(Done, &["X"])]));
        let err = store.move_item(MoveRequest::new(Todo, 0, Done, 0)).unwrap_err();
        assert!(matches!(err, BoardError::OutOfRange { role: IndexRole::Source, max: None, .. }));
    }

    #[test]
    fn test_moved_item_keeps_its_fields() {
        let mut item = WorkItem::new("A", "Frame level 3");
        item.project_label = "Harbor Point".into();
        item.progress_percent = 65;
        let mut store = BoardStore::new(Board::from_columns([(Todo, vec![item.clone()])]).unwrap());

        store.move_item(MoveRequest::new(Todo, 0, Done, 0)).unwrap();

        assert_eq!(store.snapshot().item_at(Slot::new(Done, 0)), Some(&item));
    }

    #[test]
    fn test_duplicate_ids_rejected_across_columns() {
        let err = Board::from_columns([
            (Todo, vec![WorkItem::new("A", "one")]),
            (Done, vec![WorkItem::new("A", "two")]),
        ])
        .unwrap_err();
        assert_eq!(err, BoardError::DuplicateId { id: "A".into() });
    }

    #[test]
    fn test_progress_over_100_rejected() {
        let mut item = WorkItem::new("A", "one");
        item.progress_percent = 101;
        let err = Board::from_columns([(Todo, vec![item])]).unwrap_err();
        assert_eq!(err, BoardError::InvalidProgress { id: "A".into(), value: 101 });
    }

    #[test]
    fn test_locate_and_get() {
        let b = board(&[(Todo, &["A"]), (InProgress, &["B", "C"])]);
        assert_eq!(b.locate("C"), Some(Slot::new(InProgress, 1)));
        assert_eq!(b.locate("Z"), None);
        assert_eq!(b.get("B").map(|i| i.title.as_str()), Some("Task B"));
        assert_eq!(b.len(), 3);
        assert_eq!(b.drop_limit(InProgress, InProgress), 1);
        assert_eq!(b.drop_limit(Todo, InProgress), 2);
    }

    fn arb_request() -> impl Strategy<Value = MoveRequest> {
        (0usize..3, 0usize..8, 0usize..3, 0usize..8).prop_map(|(sc, si, dc, di)| {
            MoveRequest::new(
                ColumnId::from_index(sc).unwrap(),
                si,
                ColumnId::from_index(dc).unwrap(),
                di,
            )
        })
    }

    proptest! {
        /// Property: any sequence of moves, valid or not, conserves the set of ids
        /// and keeps every id at exactly one slot.
        #[test]
        fn test_moves_conserve_items(requests in prop::collection::vec(arb_request(), 0..40)) {
            let start = board(&[(Todo, &["A", "B", "C"]), (InProgress, &["D", "E"]), (Done, &["F"])]);
            let before = sorted_ids(&start);
            let mut store = BoardStore::new(start);

            for request in requests {
                let snapshot = store.snapshot().clone();
                match store.move_item(request) {
                    Ok(MoveOutcome::Moved { id, to, .. }) => {
                        prop_assert_eq!(store.snapshot().locate(&id), Some(to));
                    }
                    Ok(MoveOutcome::Unchanged) | Err(_) => {
                        prop_assert_eq!(store.snapshot(), &snapshot);
                    }
                }
            }

            let after = sorted_ids(store.snapshot());
            prop_assert_eq!(&after, &before);
            for id in &after {
                let hits = store
                    .snapshot()
                    .columns()
                    .map(|(_, items)| items.iter().filter(|i| &i.id == id).count())
                    .sum::<usize>();
                prop_assert_eq!(hits, 1);
            }
        }

        /// Property: a within-column move is a single-element rotation.
        #[test]
        fn test_same_column_move_is_rotation(len in 1usize..8, from in 0usize..8, to in 0usize..8) {
            let from = from % len;
            let to = to % len;
            let names: Vec<String> = (0..len).map(|i| format!("T{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut store = BoardStore::new(board(&[(Todo, refs.as_slice())]));

            store.move_item(MoveRequest::new(Todo, from, Todo, to)).unwrap();

            let mut expected = refs.clone();
            let moved = expected.remove(from);
            expected.insert(to, moved);
            prop_assert_eq!(store.snapshot().ids(Todo), expected);
        }
    }
}
