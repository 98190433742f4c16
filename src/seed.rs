//! Built-in seed board.
//!
//! Used whenever no board file exists yet, and written out by `tb init`.

use crate::board::Board;
use crate::error::BoardError;
use crate::fields::{ColumnId, Priority};
use crate::task::WorkItem;

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    title: &str,
    project: &str,
    assignee: &str,
    initials: &str,
    priority: Priority,
    code: &str,
    due: &str,
    progress: u8,
) -> WorkItem {
    WorkItem {
        id: id.to_string(),
        title: title.to_string(),
        project_label: project.to_string(),
        assignee_name: assignee.to_string(),
        assignee_initials: initials.to_string(),
        priority,
        code: code.to_string(),
        due_label: due.to_string(),
        progress_percent: progress,
    }
}

/// Column contents of the seed board.
pub fn seed_columns() -> Vec<(ColumnId, Vec<WorkItem>)> {
    vec![
        (
            ColumnId::Todo,
            vec![
                item("wi-101", "Submit rebar shop drawings for level 4 slab", "Harbor Point Tower",
                     "Dana Okafor", "DO", Priority::High, "HPT-101", "Due in 2 days", 0),
                item("wi-102", "Order curtain wall anchors", "Harbor Point Tower",
                     "Luis Romero", "LR", Priority::Medium, "HPT-108", "Due next week", 0),
                item("wi-103", "Schedule crane inspection", "Riverside Clinic",
                     "Amara Singh", "AS", Priority::High, "RSC-042", "Due tomorrow", 10),
                item("wi-104", "Update site logistics plan", "Riverside Clinic",
                     "Tom Becker", "TB", Priority::Low, "RSC-047", "Due in 10 days", 0),
            ],
        ),
        (
            ColumnId::InProgress,
            vec![
                item("wi-201", "Pour ground floor slab, grid lines A to D", "Harbor Point Tower",
                     "Dana Okafor", "DO", Priority::High, "HPT-096", "Due today", 60),
                item("wi-202", "Install temporary shoring on east excavation", "Maple Street Lofts",
                     "Grace Kim", "GK", Priority::Medium, "MSL-013", "Due in 3 days", 35),
                item("wi-203", "Reconcile March subcontractor invoices", "Maple Street Lofts",
                     "Luis Romero", "LR", Priority::Low, "MSL-020", "Due Friday", 80),
            ],
        ),
        (
            ColumnId::Done,
            vec![
                item("wi-301", "Geotechnical survey report", "Riverside Clinic",
                     "Amara Singh", "AS", Priority::Medium, "RSC-031", "Completed", 100),
                item("wi-302", "Mobilise site office and welfare units", "Maple Street Lofts",
                     "Tom Becker", "TB", Priority::Low, "MSL-002", "Completed", 100),
            ],
        ),
    ]
}

/// The seed board.
pub fn default_board() -> Result<Board, BoardError> {
    Board::from_columns(seed_columns())
}
