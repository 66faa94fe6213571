//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::CounterAction;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Wallet
    /// Connect the wallet at this position in the wallet list
    ConnectWallet(usize),
    Disconnect,

    // Counter
    Counter(CounterAction),
    Refresh,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, connected: bool, show_help: bool) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        _ if connected => connected_keys(key.code),
        _ => disconnected_keys(key.code),
    }
}

fn disconnected_keys(code: KeyCode) -> Option<UiEvent> {
    match code {
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10).map(|d| d as usize - 1)?;
            Some(UiEvent::ConnectWallet(index))
        }
        KeyCode::Enter => Some(UiEvent::ConnectWallet(0)),
        _ => None,
    }
}

fn connected_keys(code: KeyCode) -> Option<UiEvent> {
    match code {
        KeyCode::Char('d') => Some(UiEvent::Disconnect),
        KeyCode::Char('i') => Some(UiEvent::Counter(CounterAction::Initialize)),
        KeyCode::Char('+') | KeyCode::Char('k') | KeyCode::Up => {
            Some(UiEvent::Counter(CounterAction::Increment))
        }
        KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => {
            Some(UiEvent::Counter(CounterAction::Decrement))
        }
        KeyCode::Char('r') => Some(UiEvent::Counter(CounterAction::Reset)),
        KeyCode::Char('f') => Some(UiEvent::Refresh),
        _ => None,
    }
}
