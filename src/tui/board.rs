//! Kanban board interface.
//!
//! Renders the three board columns side by side and lets the user re-sequence
//! cards within a column or move them across columns, either by dragging with
//! the mouse or by picking a card up with the keyboard. Every completed drag
//! becomes one move on the board store; the board file is saved after each
//! accepted move.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info};

use crate::board::{BoardStore, MoveOutcome, MoveRequest, Slot};
use crate::card::{self, format_priority, progress_bar, wrap_words, CardView};
use crate::db;
use crate::drag::{clamp_drop, DragSession};
use crate::error::Result;
use crate::fields::ColumnId;
use crate::tui::colors::{column_color, priority_color, text_on, DROP_MARKER};
use crate::tui::enums::{ExpandedColumn, Overlay};
use crate::tui::utils::{centered_rect, contains};

/// Card height in rows, borders included, for a collapsed column.
const COMPACT_CARD_HEIGHT: u16 = 5;
/// Card height in rows, borders included, for the expanded column.
const FULL_CARD_HEIGHT: u16 = 8;

/// Main board application state
pub struct BoardApp {
    store: BoardStore,
    board_path: PathBuf,
    selected_column: ColumnId,
    selected_card: usize,                            // Selected card within the column
    column_scroll_offsets: [usize; ColumnId::COUNT], // Scroll offset for each column
    column_areas: [Rect; ColumnId::COUNT],           // Card area of each column from the last draw
    status_message: String,
    overlay: Overlay,
    expanded: ExpandedColumn,
    drag: DragSession,
    pointer_drag: bool, // Current drag was started by a mouse press
    should_quit: bool,
}

impl BoardApp {
    /// Load the board file (or the seed board) and build the app.
    pub fn open(board_path: &Path) -> Result<Self> {
        let board = db::load_board(board_path)?;
        Ok(Self::from_store(BoardStore::new(board), board_path.to_path_buf()))
    }

    pub fn from_store(store: BoardStore, board_path: PathBuf) -> Self {
        let mut app = BoardApp {
            store,
            board_path,
            selected_column: ColumnId::Todo,
            selected_card: 0,
            column_scroll_offsets: [0; ColumnId::COUNT],
            column_areas: [Rect::default(); ColumnId::COUNT],
            status_message: String::new(),
            overlay: Overlay::None,
            expanded: ExpandedColumn::default(),
            drag: DragSession::new(),
            pointer_drag: false,
            should_quit: false,
        };
        app.clamp_selection();
        app
    }

    /// Number of board changes made in this session.
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Ensure the selected card index is valid for the selected column
    fn clamp_selection(&mut self) {
        let column_len = self.store.snapshot().column(self.selected_column).len();
        if column_len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    fn selected_slot(&self) -> Option<Slot> {
        let slot = Slot::new(self.selected_column, self.selected_card);
        self.store.snapshot().item_at(slot).map(|_| slot)
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn card_height(&self, column: ColumnId) -> u16 {
        if self.expanded.is_open(column) {
            FULL_CARD_HEIGHT
        } else {
            COMPACT_CARD_HEIGHT
        }
    }

    /// Hand one move request to the store, then persist and follow the card.
    fn apply_move(&mut self, request: MoveRequest) {
        match self.store.move_item(request) {
            Ok(MoveOutcome::Moved { id, to, .. }) => {
                self.selected_column = to.column;
                self.selected_card = to.index;
                match db::save_board(self.store.snapshot(), &self.board_path) {
                    Ok(()) => self.set_status_message(format!("Moved {} to {} #{}", id, to.column.title(), to.index + 1)),
                    Err(e) => {
                        error!(error = %e, path = %self.board_path.display(), "failed to save board");
                        self.set_status_message(format!("Moved {} but saving failed: {}", id, e));
                    }
                }
            }
            Ok(MoveOutcome::Unchanged) => {
                self.set_status_message("Card dropped in place");
            }
            Err(e) => {
                // The store rejected the move and left the board as it was.
                error!(error = %e, ?request, "drag produced an invalid move");
                self.set_status_message(format!("Move rejected, card snapped back: {}", e));
            }
        }
        self.clamp_selection();
    }

    /// Pick up the selected card.
    fn pick_up(&mut self) {
        match self.selected_slot() {
            Some(slot) => {
                self.drag.begin(slot);
                self.set_status_message("Dragging: arrows choose a slot, Space/Enter drops, Esc cancels");
            }
            None => self.set_status_message("No card selected"),
        }
    }

    /// Drop the dragged card at the current target.
    fn drop_card(&mut self) {
        self.pointer_drag = false;
        match self.drag.release() {
            Some(request) => self.apply_move(request),
            None => self.set_status_message("Dropped outside the board, nothing moved"),
        }
    }

    /// Move the selected card to the end of the neighbouring column.
    fn move_card_across(&mut self, forward: bool) {
        let Some(source) = self.selected_slot() else { return };
        let Some(dest) = source.column.step(forward) else { return };
        let dest_index = self.store.snapshot().drop_limit(source.column, dest);
        self.apply_move(MoveRequest::new(source.column, source.index, dest, dest_index));
    }

    /// Move the selected card one position up or down in its column.
    fn move_card_within(&mut self, down: bool) {
        let Some(source) = self.selected_slot() else { return };
        let dest_index = if down {
            source.index + 1
        } else if source.index > 0 {
            source.index - 1
        } else {
            return;
        };
        if dest_index > self.store.snapshot().drop_limit(source.column, source.column) {
            return;
        }
        self.apply_move(MoveRequest::new(source.column, source.index, source.column, dest_index));
    }

    /// Handle a key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.drag.cancel();
            self.pointer_drag = false;
            self.should_quit = true;
            return true;
        }

        match self.overlay {
            Overlay::Help => {
                self.overlay = Overlay::None;
                return false;
            }
            Overlay::CardDetail => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    self.overlay = Overlay::None;
                }
                return false;
            }
            Overlay::None => {}
        }

        if self.drag.is_active() {
            let board = self.store.snapshot();
            match key.code {
                KeyCode::Left => self.drag.nudge_column(board, false),
                KeyCode::Right => self.drag.nudge_column(board, true),
                KeyCode::Up => self.drag.nudge_index(board, false),
                KeyCode::Down => self.drag.nudge_index(board, true),
                KeyCode::Char(' ') | KeyCode::Enter => self.drop_card(),
                KeyCode::Esc => {
                    self.drag.cancel();
                    self.pointer_drag = false;
                    self.set_status_message("Drag cancelled");
                }
                _ => {}
            }
            return false;
        }

        self.clear_status_message();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return true;
            }

            // Card movement (check first, before regular navigation)
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card_across(false),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card_across(true),
            KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card_within(false),
            KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card_within(true),

            KeyCode::Left => {
                if let Some(column) = self.selected_column.step(false) {
                    self.selected_column = column;
                    self.clamp_selection();
                }
            }
            KeyCode::Right => {
                if let Some(column) = self.selected_column.step(true) {
                    self.selected_column = column;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down => {
                let column_len = self.store.snapshot().column(self.selected_column).len();
                if column_len > 0 && self.selected_card < column_len - 1 {
                    self.selected_card += 1;
                }
            }

            KeyCode::Char(' ') => self.pick_up(),
            KeyCode::Enter => {
                if self.selected_slot().is_some() {
                    self.overlay = Overlay::CardDetail;
                }
            }
            KeyCode::Char('x') => {
                self.expanded.toggle(self.selected_column);
                let msg = match self.expanded.open() {
                    Some(column) => format!("Expanded {}", column.title()),
                    None => "Collapsed columns".to_string(),
                };
                self.set_status_message(msg);
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.overlay = Overlay::Help,
            _ => {}
        }
        false
    }

    /// Raw board position under a terminal cell: the column and the card row
    /// the pointer is over, which may be past the last card.
    fn position_at(&self, x: u16, y: u16) -> Option<(ColumnId, usize)> {
        ColumnId::ALL.into_iter().find_map(|column| {
            let area = self.column_areas[column.index()];
            if !contains(area, x, y) {
                return None;
            }
            let row = ((y - area.y) / self.card_height(column)) as usize;
            Some((column, row + self.column_scroll_offsets[column.index()]))
        })
    }

    /// Handle a mouse event: press on a card starts a drag, release finishes it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.overlay != Overlay::None {
            return;
        }
        let position = self.position_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if !self.drag.is_active() => {
                let Some((column, index)) = position else { return };
                self.selected_column = column;
                if index < self.store.snapshot().column(column).len() {
                    self.selected_card = index;
                    self.pointer_drag = self.drag.begin(Slot::new(column, index));
                    self.set_status_message("Dragging: release over a column to drop");
                } else {
                    self.clamp_selection();
                }
            }
            // Only a gesture the mouse started can be steered or finished by it.
            MouseEventKind::Drag(MouseButton::Left) if self.pointer_drag => self.hover_at(position),
            MouseEventKind::Up(MouseButton::Left) if self.pointer_drag => {
                self.hover_at(position);
                self.drop_card();
            }
            _ => {}
        }
    }

    fn hover_at(&mut self, position: Option<(ColumnId, usize)>) {
        let Some(source) = self.drag.source() else { return };
        let target = position.map(|(column, index)| clamp_drop(self.store.snapshot(), source.column, column, index));
        self.drag.hover(target);
    }

    /// Handle keyboard and mouse input
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => return Ok(self.handle_key(key)),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(self.should_quit)
    }

    /// Render the board
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.overlay {
            Overlay::CardDetail => self.render_card_detail_popup(f),
            Overlay::Help => self.render_help(f),
            Overlay::None => {}
        }
    }

    /// Render the header
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let board = self.store.snapshot();
        let context_display = format!(
            "Board: {}  Items: {}  Changes: {}",
            self.board_path.display(),
            board.len(),
            self.store.revision()
        );

        let header_text = vec![Line::from(vec![
            Span::styled("SITE TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(context_display, Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Render the columns side by side; an expanded column takes half the width.
    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = match self.expanded.open() {
            Some(open) => ColumnId::ALL
                .iter()
                .map(|&c| if c == open { Constraint::Percentage(50) } else { Constraint::Percentage(25) })
                .collect(),
            None => ColumnId::ALL.iter().map(|_| Constraint::Ratio(1, ColumnId::COUNT as u32)).collect(),
        };

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (column, &column_area) in ColumnId::ALL.iter().zip(columns_layout.iter()) {
            self.render_column(f, column_area, *column);
        }
    }

    /// Row the drop marker sits on for a target slot, in the column's visual order.
    fn marker_row(&self, target: Slot) -> usize {
        match self.drag.source() {
            Some(source) if source.column == target.column && target.index > source.index => target.index + 1,
            _ => target.index,
        }
    }

    /// Render a single column
    fn render_column(&mut self, f: &mut Frame, area: Rect, column: ColumnId) {
        let is_selected = column == self.selected_column;
        let accent = column_color(column);
        let drop_target = self.drag.target().filter(|t| t.column == column);

        let border_style = if drop_target.is_some() {
            Style::default().fg(DROP_MARKER).add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let items = self.store.snapshot().column(column).len();
        let title = if self.expanded.is_open(column) {
            format!(" {} ({}) [expanded] ", column.title(), items)
        } else {
            format!(" {} ({}) ", column.title(), items)
        };
        let block = Block::default().borders(Borders::ALL).title(title).border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);
        self.column_areas[column.index()] = inner;

        let card_height = self.card_height(column) as usize;
        let available_height = inner.height as usize;
        let visible_cards = (available_height / card_height).max(1);

        // Keep the focused row (drop marker or selected card) in view.
        let focus_row = match drop_target {
            Some(target) => Some(self.marker_row(target).min(items.saturating_sub(1))),
            None if is_selected => Some(self.selected_card),
            None => None,
        };
        let ci = column.index();
        if let Some(row) = focus_row {
            let start_visible = self.column_scroll_offsets[ci];
            if row < start_visible {
                self.column_scroll_offsets[ci] = row;
            } else if row >= start_visible + visible_cards {
                self.column_scroll_offsets[ci] = row + 1 - visible_cards;
            }
        }
        if self.column_scroll_offsets[ci] >= items.max(1) {
            self.column_scroll_offsets[ci] = items.saturating_sub(1);
        }
        let scroll_offset = self.column_scroll_offsets[ci];

        if items == 0 {
            let empty = Paragraph::new("(empty)").style(Style::default().fg(Color::DarkGray));
            f.render_widget(empty, Rect { height: inner.height.min(1), ..inner });
        }

        let mut current_y = 0;
        let mut rendered_cards = 0;
        let dragged = self.drag.source();

        for index in scroll_offset..items {
            if current_y + card_height > available_height {
                break;
            }
            let slot = Slot::new(column, index);
            let Some(item) = self.store.snapshot().item_at(slot) else { break };
            let view = card::render(item);

            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: card_height as u16,
            };

            let is_this_card_selected = is_selected && index == self.selected_card && !self.drag.is_active();
            self.render_card(f, card_area, &view, column, is_this_card_selected, dragged == Some(slot));

            current_y += card_height;
            rendered_cards += 1;
        }

        if let Some(target) = drop_target {
            let row = self.marker_row(target);
            if row >= scroll_offset {
                let y = ((row - scroll_offset) * card_height).min(available_height.saturating_sub(1));
                let marker = Paragraph::new(format!("▶ drop here (#{})", target.index + 1))
                    .style(Style::default().fg(Color::Black).bg(DROP_MARKER).add_modifier(Modifier::BOLD));
                f.render_widget(marker, Rect { x: inner.x, y: inner.y + y as u16, width: inner.width, height: inner.height.min(1) });
            }
        }

        // Show scroll indicators
        if scroll_offset > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", scroll_offset)).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y, width: inner.width, height: 1 });
        }

        let remaining = items.saturating_sub(scroll_offset + rendered_cards);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining)).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y + inner.height - 1, width: inner.width, height: 1 });
        }
    }

    /// Render a single card
    fn render_card(&self, f: &mut Frame, area: Rect, view: &CardView, column: ColumnId, is_selected: bool, is_dragged: bool) {
        let accent = column_color(column);
        let style = if is_dragged {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else if is_selected {
            Style::default().bg(accent).fg(text_on(accent)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::Rgb(40, 40, 40))
        };

        let width = area.width.saturating_sub(2) as usize;
        let mut card_text: Vec<Line> = Vec::new();

        // Header: code plus a priority label colored by priority
        let priority = format_priority(view.priority);
        let code_width = width.saturating_sub(priority.len() + 1);
        card_text.push(Line::from(vec![
            Span::raw(format!("{:<w$} ", card::truncate(&view.code, code_width), w = code_width)),
            Span::styled(priority, Style::default().fg(priority_color(view.priority)).add_modifier(Modifier::BOLD)),
        ]));

        if self.expanded.is_open(column) {
            for line in view.lines(width).into_iter().skip(1) {
                card_text.push(Line::from(line));
            }
        } else {
            for line in wrap_words(&view.title, width, 1) {
                card_text.push(Line::from(line));
            }
            card_text.push(Line::from(card::truncate(&progress_bar(view.progress), width)));
        }

        let title = if is_dragged { " moving " } else { "" };
        let card_block = Paragraph::new(card_text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(style);

        f.render_widget(card_block, area);
    }

    /// Render the status bar
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.drag.is_active() {
            "Dragging: arrows choose a slot | Space/Enter: drop | Esc: cancel".to_string()
        } else {
            "Space: pick up | Ctrl+arrows: move | Enter: details | x: expand | h: help | q: quit".to_string()
        };

        let accent = if self.drag.is_active() { DROP_MARKER } else { column_color(self.selected_column) };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(accent).fg(text_on(accent)))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Render the card detail popup
    fn render_card_detail_popup(&self, f: &mut Frame) {
        let Some(slot) = self.selected_slot() else { return };
        let Some(item) = self.store.snapshot().item_at(slot) else { return };
        let view = card::render(item);

        let popup_area = centered_rect(70, 60, f.area());
        f.render_widget(Clear, popup_area);

        let detail_lines = vec![
            Line::from(vec![Span::styled(
                format!("{}: {}", view.code, view.title),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!("ID:        {}", view.id)),
            Line::from(format!("Column:    {} (position {})", slot.column.title(), slot.index + 1)),
            Line::from(vec![
                Span::raw("Priority:  "),
                Span::styled(format_priority(view.priority), Style::default().fg(priority_color(view.priority))),
            ]),
            Line::from(format!("Project:   {}", view.project)),
            Line::from(format!("Assignee:  {}", view.assignee)),
            Line::from(format!("Due:       {}", view.due)),
            Line::from(format!("Progress:  {}", progress_bar(view.progress))),
        ];

        let accent = column_color(slot.column);
        let popup_block = Block::default()
            .borders(Borders::ALL)
            .title("Card Details (Press Enter to close)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

        let popup_paragraph = Paragraph::new(detail_lines)
            .block(popup_block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));

        f.render_widget(popup_paragraph, popup_area);
    }

    /// Render the help popup
    fn render_help(&self, f: &mut Frame) {
        let popup_area = centered_rect(60, 70, f.area());
        f.render_widget(Clear, popup_area);

        let help = vec![
            Line::from(Span::styled("Navigation", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Left/Right     select column"),
            Line::from("  Up/Down        select card"),
            Line::from("  Enter          card details"),
            Line::from("  x              expand / collapse the selected column"),
            Line::from(""),
            Line::from(Span::styled("Moving cards", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Space          pick up card, Space/Enter again to drop"),
            Line::from("  arrows         while dragging, choose the drop slot"),
            Line::from("  Esc            cancel the drag"),
            Line::from("  Ctrl+Left/Right  send card to the end of the next column"),
            Line::from("  Ctrl+Up/Down     reorder card within its column"),
            Line::from("  Mouse          press on a card, drag, release over a column"),
            Line::from(""),
            Line::from("  q / Esc        quit"),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Help (any key to close)")
            .title_alignment(Alignment::Center);
        f.render_widget(Paragraph::new(help).block(block).style(Style::default().bg(Color::Black)), popup_area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        info!(path = %self.board_path.display(), items = self.store.snapshot().len(), "board UI opened");
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::fields::ColumnId::{Done, InProgress, Todo};
    use crate::seed;
    use crate::task::WorkItem;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    fn app(dir: &TempDir, board: Board) -> BoardApp {
        BoardApp::from_store(BoardStore::new(board), dir.path().join("board.json"))
    }

    fn small_board() -> Board {
        Board::from_columns([
            (Todo, vec![WorkItem::new("A", "Alpha"), WorkItem::new("B", "Bravo")]),
            (InProgress, vec![WorkItem::new("C", "Charlie")]),
        ])
        .unwrap()
    }

    fn draw(app: &mut BoardApp) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
    }

    #[test]
    fn test_render_seed_board_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, seed::default_board().unwrap());
        draw(&mut app);

        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Enter));
        draw(&mut app);
        assert_eq!(app.overlay, Overlay::CardDetail);
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, seed::default_board().unwrap());
        app.handle_key(key(KeyCode::Char(' ')));
        let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    #[test]
    fn test_keyboard_drag_moves_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, small_board());

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.drag.is_active());
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        let board = app.store.snapshot();
        assert_eq!(board.ids(Todo), vec!["B"]);
        assert_eq!(board.ids(InProgress), vec!["C", "A"]);
        assert_eq!((app.selected_column, app.selected_card), (InProgress, 1));
        assert!(!app.drag.is_active());

        let saved = db::load_board(&dir.path().join("board.json")).unwrap();
        assert_eq!(&saved, app.store.snapshot());
    }

    #[test]
    fn test_escape_cancels_drag_without_moving() {
        let dir = TempDir::new().unwrap();
        let original = small_board();
        let mut app = app(&dir, original.clone());

        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Right));
        assert!(!app.handle_key(key(KeyCode::Esc)));

        assert!(!app.drag.is_active());
        assert_eq!(app.store.snapshot(), &original);
        assert_eq!(app.revision(), 0);
        assert!(!dir.path().join("board.json").exists());
    }

    #[test]
    fn test_drop_in_place_leaves_board_unchanged() {
        let dir = TempDir::new().unwrap();
        let original = small_board();
        let mut app = app(&dir, original.clone());

        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(app.store.snapshot(), &original);
        assert_eq!(app.revision(), 0);
        assert_eq!(app.status_message, "Card dropped in place");
    }

    #[test]
    fn test_ctrl_arrows_move_card() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, small_board());

        app.handle_key(ctrl(KeyCode::Down));
        assert_eq!(app.store.snapshot().ids(Todo), vec!["B", "A"]);
        assert_eq!(app.selected_card, 1);

        app.handle_key(ctrl(KeyCode::Right));
        app.handle_key(ctrl(KeyCode::Right));
        assert_eq!(app.store.snapshot().ids(Done), vec!["A"]);
        assert_eq!(app.selected_column, Done);

        // Already in the last column: nothing happens.
        app.handle_key(ctrl(KeyCode::Right));
        assert_eq!(app.revision(), 3);
    }

    #[test]
    fn test_mouse_drag_across_columns() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, small_board());
        draw(&mut app);

        let todo = app.column_areas[Todo.index()];
        let doing = app.column_areas[InProgress.index()];
        let h = COMPACT_CARD_HEIGHT;

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), todo.x + 2, todo.y + h + 1));
        assert_eq!(app.drag.source(), Some(Slot::new(Todo, 1)));

        // Far below the last card: clamps to an append.
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), doing.x + 2, doing.y + 3 * h));
        assert_eq!(app.drag.target(), Some(Slot::new(InProgress, 1)));

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), doing.x + 2, doing.y + 1));
        assert_eq!(app.store.snapshot().ids(InProgress), vec!["B", "C"]);
        assert_eq!(app.store.snapshot().ids(Todo), vec!["A"]);
    }

    #[test]
    fn test_mouse_ignored_during_keyboard_drag() {
        let dir = TempDir::new().unwrap();
        let original = small_board();
        let mut app = app(&dir, original.clone());
        draw(&mut app);

        app.handle_key(key(KeyCode::Char(' ')));
        let done = app.column_areas[Done.index()];
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), done.x + 1, done.y + 1));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), done.x + 1, done.y + 1));

        assert!(app.drag.is_active());
        assert_eq!(app.drag.target(), Some(Slot::new(Todo, 0)));
        assert_eq!(app.store.snapshot(), &original);
        assert_eq!(app.revision(), 0);
        assert!(!dir.path().join("board.json").exists());

        // The keyboard still finishes its own gesture.
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.store.snapshot().ids(InProgress), vec!["A", "C"]);
    }

    #[test]
    fn test_mouse_release_outside_board_does_nothing() {
        let dir = TempDir::new().unwrap();
        let original = small_board();
        let mut app = app(&dir, original.clone());
        draw(&mut app);

        let todo = app.column_areas[Todo.index()];
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), todo.x + 1, todo.y + 1));
        assert!(app.drag.is_active());

        // Row 0 is the header, outside every column.
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), todo.x + 1, 0));
        assert!(!app.drag.is_active());
        assert_eq!(app.store.snapshot(), &original);
    }

    #[test]
    fn test_mouse_press_on_empty_space_does_not_start_drag() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, small_board());
        draw(&mut app);

        let done = app.column_areas[Done.index()];
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), done.x + 1, done.y + 1));
        assert!(!app.drag.is_active());
        assert_eq!(app.selected_column, Done);
    }

    #[test]
    fn test_help_overlay_swallows_next_key() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, small_board());
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.overlay, Overlay::Help);
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }
}
