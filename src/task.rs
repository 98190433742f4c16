//! Work item data structure.
//!
//! This module defines the `WorkItem` struct that represents a single task card
//! on the board, with its assignee, scheduling label and progress.

use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// A single task tracked on the board.
///
/// The `id` is unique across the whole board and never changes after creation.
/// Moving an item changes only its column and position, never its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub project_label: String,
    pub assignee_name: String,
    pub assignee_initials: String,
    pub priority: Priority,
    pub code: String,
    pub due_label: String,
    /// Completion in percent, 0..=100
    pub progress_percent: u8,
}

impl WorkItem {
    /// Create a work item with the given id and title and neutral descriptive fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        WorkItem {
            id: id.into(),
            title: title.into(),
            project_label: String::new(),
            assignee_name: String::new(),
            assignee_initials: String::new(),
            priority: Priority::Medium,
            code: String::new(),
            due_label: String::new(),
            progress_percent: 0,
        }
    }

    /// Initials to show for the assignee, derived from the name when none were given.
    pub fn initials(&self) -> String {
        if !self.assignee_initials.trim().is_empty() {
            return self.assignee_initials.trim().to_uppercase();
        }
        self.assignee_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_camel_case() {
        let mut item = WorkItem::new("wi-1", "Pour footing");
        item.project_label = "Harbor Point".into();
        item.progress_percent = 40;
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["projectLabel"], "Harbor Point");
        assert_eq!(json["progressPercent"], 40);
        assert_eq!(json["priority"], "medium");
    }

    #[test]
    fn test_initials_fallback() {
        let mut item = WorkItem::new("wi-1", "Survey");
        item.assignee_name = "maria lopez".into();
        assert_eq!(item.initials(), "ML");
        item.assignee_initials = "mx".into();
        assert_eq!(item.initials(), "MX");
        item.assignee_name.clear();
        item.assignee_initials.clear();
        assert_eq!(item.initials(), "");
    }
}
