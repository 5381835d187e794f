//! Event handling for TUI.
//!
//! Polls crossterm on the UI thread: a zero-timeout drain at the top of each
//! tick, then a bounded wait until the next sample is due.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input (presses and repeats only).
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
}

fn translate(evt: CrosstermEvent) -> Option<Event> {
    match evt {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Reads events from the terminal without a background thread.
#[derive(Debug, Default)]
pub struct EventSource;

impl EventSource {
    pub fn new() -> Self {
        Self
    }

    /// Returns every event that is already pending.
    pub fn drain(&self) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(evt) = translate(event::read()?) {
                events.push(evt);
            }
        }
        Ok(events)
    }

    /// Blocks for at most `timeout`; returns `true` if input arrived.
    ///
    /// The event itself is left queued for the next [`drain`](Self::drain).
    pub fn wait(&self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEvent, MouseEventKind};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('p'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_translate_ignores_key_release() {
        let press = key(KeyEventKind::Press);
        assert_eq!(
            translate(CrosstermEvent::Key(press)),
            Some(Event::Key(press))
        );
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Release))), None);
    }

    #[test]
    fn test_translate_resize_and_other() {
        assert_eq!(
            translate(CrosstermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        );
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate(CrosstermEvent::Mouse(mouse)), None);
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
    }
}
