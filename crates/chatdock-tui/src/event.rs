//! Event handling for the chatdock TUI.

use chatdock_engine::KeyPolicy;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling is blocking, keep it off the runtime
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                                Some(Event::Key(key))
                            }
                            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                } else if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, blocking until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Action the widget performs in response to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    ScrollUp,
    ScrollDown,
    None,
}

/// Convert a key event to an action.
///
/// Enter submits only when `policy` allows it for the current viewport;
/// otherwise it inserts a newline.
pub fn key_to_action(key: KeyEvent, policy: KeyPolicy, viewport_width_px: Option<u32>) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        return match key.code {
            KeyCode::Char('c' | 'q') => Action::Quit,
            KeyCode::Char('s') => Action::Submit,
            KeyCode::Char('j') | KeyCode::Enter => Action::Newline,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => {
            if policy.enter_submits(shift, viewport_width_px) {
                Action::Submit
            } else {
                Action::Newline
            }
        }
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Up | KeyCode::PageUp => Action::ScrollUp,
        KeyCode::Down | KeyCode::PageDown => Action::ScrollDown,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_enter_submits_on_wide_viewport() {
        let action = key_to_action(
            key(KeyCode::Enter, KeyModifiers::NONE),
            KeyPolicy::default(),
            Some(1280),
        );
        assert_eq!(action, Action::Submit);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let action = key_to_action(
            key(KeyCode::Enter, KeyModifiers::SHIFT),
            KeyPolicy::default(),
            Some(1280),
        );
        assert_eq!(action, Action::Newline);
    }

    #[test]
    fn test_enter_on_narrow_viewport_inserts_newline() {
        let action = key_to_action(
            key(KeyCode::Enter, KeyModifiers::NONE),
            KeyPolicy::default(),
            Some(640),
        );
        assert_eq!(action, Action::Newline);
    }

    #[test]
    fn test_control_shortcuts() {
        let policy = KeyPolicy::default();
        assert_eq!(
            key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL), policy, None),
            Action::Quit
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('s'), KeyModifiers::CONTROL), policy, Some(320)),
            Action::Submit
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('j'), KeyModifiers::CONTROL), policy, None),
            Action::Newline
        );
    }

    #[test]
    fn test_printable_keys_insert() {
        let policy = KeyPolicy::default();
        assert_eq!(
            key_to_action(key(KeyCode::Char('q'), KeyModifiers::NONE), policy, None),
            Action::Insert('q')
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('Q'), KeyModifiers::SHIFT), policy, None),
            Action::Insert('Q')
        );
    }
}
