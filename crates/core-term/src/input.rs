//! Maps a raw crossterm key event onto the small set of actions the
//! command loop understands. Kept as a pure function so the mapping is
//! testable without a real terminal.

use core_cmd::NavKey;
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Nav(NavKey),
    Char(char),
    Backspace,
    Submit,
    None,
}

pub fn translate(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Up => InputAction::Nav(NavKey::Up),
        KeyCode::Down => InputAction::Nav(NavKey::Down),
        KeyCode::PageUp => InputAction::Nav(NavKey::PageUp),
        KeyCode::PageDown => InputAction::Nav(NavKey::PageDown),
        KeyCode::Enter => InputAction::Submit,
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::Char(c) => InputAction::Char(c),
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn arrows_map_to_nav() {
        assert_eq!(translate(key(KeyCode::Up)), InputAction::Nav(NavKey::Up));
        assert_eq!(translate(key(KeyCode::PageDown)), InputAction::Nav(NavKey::PageDown));
    }

    #[test]
    fn printable_char_passes_through() {
        assert_eq!(translate(key(KeyCode::Char('g'))), InputAction::Char('g'));
    }

    #[test]
    fn enter_submits_and_esc_is_ignored() {
        assert_eq!(translate(key(KeyCode::Enter)), InputAction::Submit);
        assert_eq!(translate(key(KeyCode::Esc)), InputAction::None);
    }
}
