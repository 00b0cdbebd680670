use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

use crate::core::editor::EditKey;

/// Lines moved per page key.
const PAGE: u16 = 10;
/// Lines moved per mouse wheel notch.
const WHEEL: u16 = 3;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Core actions (passed to core::update)
    Send,
    Quit,
    Clear,
    Escape,
    Edit(EditKey),
    Resize(u16, u16),

    // TUI-local events (handled directly in TUI)
    ScrollUp(u16),
    ScrollDown(u16),
}

/// Poll for an event, waiting at most `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        Ok(map_event(event::read()?))
    } else {
        Ok(None)
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Translates a raw crossterm event. Events schat doesn't use map to `None`.
pub fn map_event(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp(WHEEL)),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown(WHEEL)),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Edit(EditKey::Paste(data))),
        Event::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement reports releases too
    if key.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let edit = |k| Some(TuiEvent::Edit(k));

    match key.code {
        KeyCode::Char('s') if ctrl => Some(TuiEvent::Send),
        KeyCode::Char('q') if ctrl => Some(TuiEvent::Quit),
        KeyCode::Char('l') if ctrl => Some(TuiEvent::Clear),
        // Ctrl+J is ASCII LF; some terminals send it for Ctrl+Enter
        KeyCode::Char('j') if ctrl => edit(EditKey::Newline),
        KeyCode::Char('w') if ctrl => edit(EditKey::DeleteWordBack),
        KeyCode::Char('a') if ctrl => edit(EditKey::Home),
        KeyCode::Char('e') if ctrl => edit(EditKey::End),
        KeyCode::Char(_) if ctrl || alt => None,
        KeyCode::Char(c) => edit(EditKey::Char(c)),
        KeyCode::Tab => edit(EditKey::Char('\t')),
        KeyCode::Enter => edit(EditKey::Newline),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Backspace if ctrl || alt => edit(EditKey::DeleteWordBack),
        KeyCode::Backspace => edit(EditKey::Backspace),
        KeyCode::Delete => edit(EditKey::Delete),
        KeyCode::Left if ctrl || alt => edit(EditKey::WordLeft),
        KeyCode::Right if ctrl || alt => edit(EditKey::WordRight),
        KeyCode::Left => edit(EditKey::Left),
        KeyCode::Right => edit(EditKey::Right),
        KeyCode::Up => edit(EditKey::Up),
        KeyCode::Down => edit(EditKey::Down),
        KeyCode::Home => edit(EditKey::Home),
        KeyCode::End => edit(EditKey::End),
        KeyCode::PageUp => Some(TuiEvent::ScrollUp(PAGE)),
        KeyCode::PageDown => Some(TuiEvent::ScrollDown(PAGE)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn ctrl(c: char) -> Event {
        key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn bindings_match_footer() {
        assert_eq!(map_event(ctrl('s')), Some(TuiEvent::Send));
        assert_eq!(map_event(ctrl('q')), Some(TuiEvent::Quit));
        assert_eq!(map_event(ctrl('l')), Some(TuiEvent::Clear));
        assert_eq!(
            map_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(TuiEvent::Escape)
        );
    }

    #[test]
    fn enter_and_ctrl_j_insert_newline() {
        let newline = Some(TuiEvent::Edit(EditKey::Newline));
        assert_eq!(map_event(key(KeyCode::Enter, KeyModifiers::NONE)), newline);
        assert_eq!(map_event(ctrl('j')), newline);
    }

    #[test]
    fn ctrl_c_is_not_bound() {
        assert_eq!(map_event(ctrl('c')), None);
    }

    #[test]
    fn plain_and_shifted_chars_are_typed() {
        assert_eq!(
            map_event(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(TuiEvent::Edit(EditKey::Char('a')))
        );
        assert_eq!(
            map_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TuiEvent::Edit(EditKey::Char('A')))
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_event(Event::Key(release)), None);
    }

    #[test]
    fn paste_keeps_text() {
        assert_eq!(
            map_event(Event::Paste("a\nb".into())),
            Some(TuiEvent::Edit(EditKey::Paste("a\nb".into())))
        );
    }

    #[test]
    fn resize_and_wheel() {
        assert_eq!(map_event(Event::Resize(80, 24)), Some(TuiEvent::Resize(80, 24)));
        let wheel = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(map_event(wheel), Some(TuiEvent::ScrollUp(WHEEL)));
    }

    #[test]
    fn word_editing_shortcuts() {
        assert_eq!(
            map_event(key(KeyCode::Left, KeyModifiers::CONTROL)),
            Some(TuiEvent::Edit(EditKey::WordLeft))
        );
        assert_eq!(
            map_event(ctrl('w')),
            Some(TuiEvent::Edit(EditKey::DeleteWordBack))
        );
    }
}
