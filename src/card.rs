//! Card projection of a work item.
//!
//! [`render`] is a pure function: it reads a work item and returns a
//! [`CardView`] value, so calling it any number of times yields equal cards and
//! leaves the board alone. Both the terminal UI and the `card` command draw from it.

use crate::fields::Priority;
use crate::task::WorkItem;

/// Width of the textual progress bar, in cells.
pub const PROGRESS_BAR_WIDTH: usize = 10;

/// Maximum number of lines a title may wrap over on a card.
pub const MAX_TITLE_LINES: usize = 2;

/// Display-ready contents of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub code: String,
    pub priority: Priority,
    pub title: String,
    pub project: String,
    pub assignee: String,
    pub due: String,
    pub progress: u8,
}

/// Project a work item onto a card.
pub fn render(item: &WorkItem) -> CardView {
    let initials = item.initials();
    let assignee = match (initials.is_empty(), item.assignee_name.trim().is_empty()) {
        (true, true) => "Unassigned".to_string(),
        (true, false) => item.assignee_name.trim().to_string(),
        (false, true) => initials,
        (false, false) => format!("{} {}", initials, item.assignee_name.trim()),
    };

    CardView {
        id: item.id.clone(),
        code: or_dash(&item.code),
        priority: item.priority,
        title: item.title.trim().to_string(),
        project: or_dash(&item.project_label),
        assignee,
        due: or_dash(&item.due_label),
        progress: item.progress_percent.min(100),
    }
}

fn or_dash(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

/// Textual progress bar such as `[######----]  60%`.
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = (percent * PROGRESS_BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}

/// Greedy word wrap, truncating the last line with an ellipsis when text is left over.
pub fn wrap_words(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflow = false;

    for word in text.split_whitespace() {
        let word = truncate(word, width);
        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                overflow = true;
                break;
            }
            current = word;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if overflow {
        if let Some(last) = lines.last_mut() {
            let mut cut: String = last.chars().take(width.saturating_sub(1)).collect();
            cut.push('…');
            *last = cut;
        }
    }
    lines
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

impl CardView {
    /// Header line: code on the left, priority on the right.
    pub fn header(&self, width: usize) -> String {
        let priority = format_priority(self.priority);
        let room = width.saturating_sub(priority.chars().count() + 1);
        let code = truncate(&self.code, room);
        let gap = width.saturating_sub(code.chars().count() + priority.chars().count()).max(1);
        format!("{}{}{}", code, " ".repeat(gap), priority)
    }

    /// The card laid out as plain text lines no wider than `width`.
    pub fn lines(&self, width: usize) -> Vec<String> {
        let mut out = vec![self.header(width)];
        out.extend(wrap_words(&self.title, width, MAX_TITLE_LINES));
        out.push(truncate(&self.project, width));
        out.push(truncate(&format!("{} · {}", self.assignee, self.due), width));
        out.push(truncate(&progress_bar(self.progress), width));
        out
    }
}
