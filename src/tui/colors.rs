//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{ColumnId, Priority};

/// Accent for the To Do column
pub const SLATE_BLUE: Color = Color::Rgb(90, 110, 170);
/// Accent for the In Progress column
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Accent for the Done column
pub const DARK_GREEN: Color = Color::Rgb(0, 110, 0);
/// High priority label
pub const DARK_RED: Color = Color::Rgb(170, 20, 20);
/// Medium priority label
pub const AMBER: Color = Color::Rgb(215, 140, 0);
/// Drop marker while dragging
pub const DROP_MARKER: Color = Color::Rgb(0, 200, 200);

/// Accent color for a column.
pub fn column_color(column: ColumnId) -> Color {
    match column {
        ColumnId::Todo => SLATE_BLUE,
        ColumnId::InProgress => GOLD,
        ColumnId::Done => DARK_GREEN,
    }
}

/// Label color for a priority.
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => DARK_RED,
        Priority::Medium => AMBER,
        Priority::Low => Color::Gray,
    }
}

/// Readable text color on top of an accent background.
pub fn text_on(background: Color) -> Color {
    match background {
        GOLD | AMBER => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}
