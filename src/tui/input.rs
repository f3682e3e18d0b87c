use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Two clicks on the same row within this window count as a double click
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move cursor up
    Up,
    /// Move cursor down
    Down,
    /// Jump to first row
    Top,
    /// Jump to last row
    Bottom,
    /// Preview the selected file
    Preview,
    /// Enter the selected directory
    Activate,
    /// Go to the parent directory
    Parent,
    /// Delete the selected file
    Delete,
    /// Confirm delete action
    ConfirmDelete,
    /// Cancel delete action
    CancelDelete,
    /// Open the current directory in the file manager
    OpenExplorer,
    /// Type a directory path
    EditPath,
    /// Re-read the current directory
    Refresh,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Cursor
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Home, KeyModifiers::NONE) => KeyAction::Top,
        (KeyCode::End, KeyModifiers::NONE) => KeyAction::Bottom,
        (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::Top,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => KeyAction::Bottom,
        (KeyCode::Char('G'), KeyModifiers::NONE) => KeyAction::Bottom,

        // Preview: Space or p
        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::Preview,
        (KeyCode::Char('p'), KeyModifiers::NONE) => KeyAction::Preview,

        // Enter directory: Enter, Right arrow or l
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Activate,
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Activate,
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Activate,

        // Parent: Backspace, Left arrow or h
        (KeyCode::Backspace, KeyModifiers::NONE) => KeyAction::Parent,
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Parent,
        (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Parent,

        // Delete: Delete key or d
        (KeyCode::Delete, KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,

        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::OpenExplorer,

        // Path bar: e or /
        (KeyCode::Char('e'), KeyModifiers::NONE) => KeyAction::EditPath,
        (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::EditPath,

        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,
        (KeyCode::F(5), KeyModifiers::NONE) => KeyAction::Refresh,

        // Help: ?
        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used when ViewState is ConfirmDelete
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::ConfirmDelete,
        (KeyCode::Char('Y'), _) => KeyAction::ConfirmDelete,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::ConfirmDelete,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::CancelDelete,
        (KeyCode::Char('N'), _) => KeyAction::CancelDelete,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::CancelDelete,

        _ => KeyAction::None,
    }
}

/// Edits made to the path bar while it has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEditAction {
    Insert(char),
    Backspace,
    Clear,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events while the path bar is focused
pub fn handle_path_input(key: KeyEvent) -> PathEditAction {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => PathEditAction::Submit,
        (KeyCode::Esc, _) => PathEditAction::Cancel,
        (KeyCode::Backspace, _) => PathEditAction::Backspace,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => PathEditAction::Clear,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => PathEditAction::Cancel,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            PathEditAction::Insert(c)
        }
        _ => PathEditAction::None,
    }
}

/// Result of a left click on a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Single(usize),
    Double(usize),
}

/// Turns a stream of row clicks into single and double clicks
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(usize, Instant)>,
}

impl ClickTracker {
    pub fn click(&mut self, row: usize, now: Instant) -> Click {
        match self.last {
            Some((last_row, at))
                if last_row == row && now.saturating_duration_since(at) <= DOUBLE_CLICK_WINDOW =>
            {
                self.last = None;
                Click::Double(row)
            }
            _ => {
                self.last = Some((row, now));
                Click::Single(row)
            }
        }
    }
}
