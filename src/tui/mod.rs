// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{entry_icon, format_file_size, format_modified, media_label};
pub use input::{
    handle_confirm_input, handle_key_event, handle_path_input, Click, ClickTracker, KeyAction,
    PathEditAction,
};

use crate::controller::{Notice, NoticeLevel};
use crate::domain::{DirectoryEntry, EntryKind, Listing, MediaKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main directory browsing view
    Browsing,
    /// Path bar focused for typing a directory
    EditingPath,
    /// Help overlay visible
    Help,
    /// Confirmation dialog for deleting the file at this row
    ConfirmDelete(usize),
    /// Modal warning or error waiting to be dismissed
    Notice(Notice),
}

/// Presentation state that lives between frames.
///
/// Holds nothing the controller needs: selection, scroll, the path bar
/// buffer and the last status message.
#[derive(Debug, Default)]
pub struct BrowserView {
    pub table_state: TableState,
    pub path_input: String,
    pub status: Option<Notice>,
    shown_directory: Option<PathBuf>,
    table_area: Rect,
    clicks: ClickTracker,
}

impl BrowserView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Keeps the selection valid for a freshly produced listing.
    ///
    /// A new directory starts at the top; the same directory keeps the
    /// cursor where it was, clamped to the new length.
    pub fn sync(&mut self, listing: &Listing) {
        let len = listing.len();
        let same_directory = self.shown_directory.as_deref() == Some(listing.directory());

        if !same_directory {
            self.shown_directory = Some(listing.directory().to_path_buf());
            *self.table_state.offset_mut() = 0;
            self.table_state.select(if len > 0 { Some(0) } else { None });
            return;
        }

        let selected = match (self.table_state.selected(), len) {
            (_, 0) => None,
            (Some(row), len) => Some(row.min(len - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.selected() {
            Some(row) if row + 1 < len => row + 1,
            Some(row) => row,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let previous = self.selected().map(|row| row.saturating_sub(1)).unwrap_or(0);
        self.table_state.select(Some(previous));
    }

    pub fn select_first(&mut self, len: usize) {
        if len > 0 {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self, len: usize) {
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }

    pub fn select(&mut self, row: usize) {
        self.table_state.select(Some(row));
    }

    /// Fills the path bar with `directory` before editing
    pub fn begin_path_edit(&mut self, directory: &Path) {
        self.path_input = directory.display().to_string();
    }

    /// Maps a terminal cell to the listing row drawn there
    pub fn row_at(&self, column: u16, row: u16, len: usize) -> Option<usize> {
        let area = self.table_area;
        // First line of the table area is the header
        let first_row_y = area.y.saturating_add(1);
        if column < area.x
            || column >= area.x.saturating_add(area.width)
            || row < first_row_y
            || row >= area.y.saturating_add(area.height)
        {
            return None;
        }

        let index = self.table_state.offset() + (row - first_row_y) as usize;
        (index < len).then_some(index)
    }

    pub fn click(&mut self, row: usize, now: Instant) -> Click {
        self.clicks.click(row, now)
    }
}

/// Renders the browser and the overlay for the current view state
pub fn render(frame: &mut Frame, listing: &Listing, view: &mut BrowserView, state: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Path bar
            Constraint::Min(0),    // Listing + details
            Constraint::Length(4), // Status + controls
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[1]);

    render_path_bar(frame, chunks[0], listing, view, state == &ViewState::EditingPath);
    render_listing(frame, body[0], listing, view);
    let selected = view.selected().and_then(|row| listing.get(row));
    render_details(frame, body[1], selected);
    render_footer(frame, chunks[2], view.status.as_ref(), state);

    match state {
        ViewState::Help => render_help_overlay(frame),
        ViewState::ConfirmDelete(row) => {
            if let Some(entry) = listing.get(*row) {
                render_confirm_delete_overlay(frame, entry);
            }
        }
        ViewState::Notice(notice) => render_notice_overlay(frame, notice),
        ViewState::Browsing | ViewState::EditingPath => {}
    }
}

fn render_path_bar(
    frame: &mut Frame,
    area: Rect,
    listing: &Listing,
    view: &BrowserView,
    editing: bool,
) {
    let (text, border) = if editing {
        (view.path_input.clone(), ACCENT_HIGHLIGHT)
    } else {
        (listing.directory().display().to_string(), BORDER_COLOR)
    };

    let title = if editing {
        " Go to directory (Enter to open, Esc to cancel) "
    } else {
        " Sample Checker "
    };

    let path_bar = Paragraph::new(Line::from(Span::styled(
        text.clone(),
        Style::default().fg(TEXT_PRIMARY),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    frame.render_widget(path_bar, area);

    if editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 1).saturating_add(text.chars().count() as u16).min(max_x);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_listing(frame: &mut Frame, area: Rect, listing: &Listing, view: &mut BrowserView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(format!(" {} entries ", listing.len().saturating_sub(1)));

    view.table_area = block.inner(area);

    if listing.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Nothing to show",
            Style::default().fg(TEXT_SECONDARY),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = listing.iter().map(listing_row).collect();

    let table = Table::new(rows, [Constraint::Length(2), Constraint::Min(10)])
        .header(
            Row::new(vec![Cell::from(""), Cell::from("Files")]).style(
                Style::default()
                    .fg(TEXT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(block)
        .highlight_style(
            Style::default()
                .bg(SELECTION_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    frame.render_stateful_widget(table, area, &mut view.table_state);
}

fn listing_row(entry: &DirectoryEntry) -> Row<'static> {
    let color = entry_color(entry.kind(), entry.media());
    Row::new(vec![
        Cell::from(entry_icon(entry.kind(), entry.media())).style(Style::default().fg(color)),
        Cell::from(entry.display_name().to_string()).style(Style::default().fg(
            if entry.is_navigable() {
                ACCENT_HIGHLIGHT
            } else {
                TEXT_PRIMARY
            },
        )),
    ])
}

fn entry_color(kind: EntryKind, media: MediaKind) -> Color {
    match kind {
        EntryKind::ParentLink | EntryKind::Directory => ACCENT_HIGHLIGHT,
        EntryKind::File if media.is_playable() => ACCENT_SECONDARY,
        EntryKind::File => TEXT_SECONDARY,
    }
}

fn render_details(frame: &mut Frame, area: Rect, entry: Option<&DirectoryEntry>) {
    let label = Style::default().fg(TEXT_SECONDARY);
    let value = Style::default().fg(TEXT_PRIMARY);

    let lines = match entry {
        Some(entry) => {
            let metadata = fs::metadata(entry.absolute_path()).ok();
            let mut lines = vec![
                Line::from(Span::styled(
                    entry.display_name().to_string(),
                    Style::default()
                        .fg(TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Type: ", label),
                    Span::styled(media_label(entry.media()), value),
                ]),
            ];

            if entry.is_file() {
                let size = metadata
                    .as_ref()
                    .map(|m| format_file_size(m.len()))
                    .unwrap_or_else(|| "unavailable".to_string());
                lines.push(Line::from(vec![
                    Span::styled("Size: ", label),
                    Span::styled(size, value),
                ]));
            }

            if let Some(modified) = metadata.as_ref().and_then(|m| m.modified().ok()) {
                lines.push(Line::from(vec![
                    Span::styled("Modified: ", label),
                    Span::styled(format_modified(modified), value),
                ]));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                entry.absolute_path().display().to_string(),
                label,
            )));
            lines
        }
        None => vec![Line::from(Span::styled("No selection", label))],
    };

    let details = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Details "),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(details, area);
}

fn render_footer(frame: &mut Frame, area: Rect, status: Option<&Notice>, state: &ViewState) {
    let status_line = match status {
        Some(notice) => Line::from(vec![
            Span::styled(
                format!("{}: ", notice.title),
                Style::default()
                    .fg(notice_color(notice.level))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(notice.message.clone(), Style::default().fg(TEXT_PRIMARY)),
        ]),
        None => Line::from(""),
    };

    let controls = if state == &ViewState::EditingPath {
        "Enter: Open | Esc: Cancel | Ctrl+U: Clear"
    } else {
        "Space: Play | Enter: Open | ←: Up | d: Delete | o: File Explorer | e: Path | ?: Help | q: Quit"
    };

    let footer = Paragraph::new(vec![
        status_line,
        Line::from(Span::styled(controls, Style::default().fg(TEXT_SECONDARY))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(footer, area);
}

fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => ACCENT_HIGHLIGHT,
        NoticeLevel::Warning => ACCENT_WARNING,
        NoticeLevel::Error => ACCENT_PRIMARY,
    }
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let help_area = centered_rect(50, 70, area);

    // Clear background
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let key = |k: &'static str, color: Color| Span::styled(k, Style::default().fg(color));

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            key("  ↑↓ / k j  ", TEXT_SECONDARY),
            Span::raw("Move"),
        ]),
        Line::from(vec![
            key("  Space / p ", ACCENT_SECONDARY),
            Span::raw("Play file"),
        ]),
        Line::from(vec![
            key("  Enter / → ", ACCENT_HIGHLIGHT),
            Span::raw("Open folder"),
        ]),
        Line::from(vec![
            key("  ← / Bksp  ", ACCENT_HIGHLIGHT),
            Span::raw("Parent folder"),
        ]),
        Line::from(vec![
            key("  Del / d   ", ACCENT_PRIMARY),
            Span::raw("Delete file"),
        ]),
        Line::from(vec![
            key("  o         ", TEXT_SECONDARY),
            Span::raw("Open in file explorer"),
        ]),
        Line::from(vec![
            key("  e / /     ", TEXT_SECONDARY),
            Span::raw("Type a path"),
        ]),
        Line::from(vec![
            key("  r / F5    ", TEXT_SECONDARY),
            Span::raw("Refresh"),
        ]),
        Line::from(vec![
            key("  q / Esc   ", TEXT_SECONDARY),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Mouse: click to play, double-click to open, right-click to delete",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Left)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders the confirmation dialog for deleting a file
pub fn render_confirm_delete_overlay(frame: &mut Frame, entry: &DirectoryEntry) {
    let area = frame.area();
    let confirm_area = centered_rect(50, 40, area);

    // Clear background
    frame.render_widget(Clear, confirm_area);

    let block = Block::default()
        .title(" ⚠ Confirm Delete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this file?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            entry.display_name().to_string(),
            Style::default().fg(TEXT_PRIMARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_PRIMARY)),
        ]),
    ];

    let paragraph = Paragraph::new(confirm_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders a warning or error that must be acknowledged
pub fn render_notice_overlay(frame: &mut Frame, notice: &Notice) {
    let area = centered_rect(60, 30, frame.area());
    let color = notice_color(notice.level);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", notice.title))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.clone(),
            Style::default().fg(TEXT_PRIMARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
