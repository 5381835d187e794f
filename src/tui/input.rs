//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{ViewMode, ViewState};

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Unbound key, nothing changed.
    None,
    /// Quit the application.
    Quit,
    /// State changed; redraw now without taking a sample.
    Redraw,
}

/// Handles key input and updates state. Letter bindings ignore case.
pub fn handle_key(state: &mut ViewState, key: KeyEvent) -> KeyAction {
    let KeyCode::Char(c) = key.code else {
        return KeyAction::None;
    };
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match c {
            'c' | 'C' => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    match c.to_ascii_lowercase() {
        'q' => KeyAction::Quit,
        'p' => {
            state.toggle_pause();
            KeyAction::Redraw
        }
        'u' => {
            state.toggle_units();
            KeyAction::Redraw
        }
        'd' => {
            state.toggle_view(ViewMode::Raw);
            KeyAction::Redraw
        }
        'i' => {
            state.toggle_view(ViewMode::Address);
            KeyAction::Redraw
        }
        _ => KeyAction::None,
    }
}
