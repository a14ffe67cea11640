use crate::session::ViewState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the current view, or the application from the main view
    Quit,
    /// Ctrl+C: exit immediately from any view
    ForceQuit,
    Keep,
    Delete,
    Move,
    Next,
    Previous,
    /// Open the current file in its default application
    Open,
    /// Drop files that disappeared from disk
    Refresh,
    Help,
    ConfirmDelete,
    CancelDelete,
    InputChar(char),
    InputBackspace,
    InputSubmit,
    InputCancel,
    /// Any other key
    None,
}

/// Picks the key map that applies to `view`
pub fn map_key(view: &ViewState, key: KeyEvent) -> KeyAction {
    match view {
        ViewState::ConfirmDelete => handle_confirm_input(key),
        ViewState::MoveInput => handle_text_input(key),
        _ => handle_key_event(key),
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Maps keyboard events to actions in the main view
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    if is_ctrl_c(&key) {
        return KeyAction::ForceQuit;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Keep,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Keep,

        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Delete, _) => KeyAction::Delete,

        (KeyCode::Char('m'), KeyModifiers::NONE) => KeyAction::Move,

        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('i'), KeyModifiers::NONE) => KeyAction::Previous,

        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,

        // Some terminals report '?' with SHIFT held
        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events while the delete confirmation is showing
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    if is_ctrl_c(&key) {
        return KeyAction::ForceQuit;
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => KeyAction::ConfirmDelete,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => KeyAction::CancelDelete,
        _ => KeyAction::None,
    }
}

/// Maps keyboard events while typing the move destination
pub fn handle_text_input(key: KeyEvent) -> KeyAction {
    if is_ctrl_c(&key) {
        return KeyAction::ForceQuit;
    }

    match key.code {
        KeyCode::Enter => KeyAction::InputSubmit,
        KeyCode::Esc => KeyAction::InputCancel,
        KeyCode::Backspace => KeyAction::InputBackspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::InputChar(c)
        }
        _ => KeyAction::None,
    }
}
