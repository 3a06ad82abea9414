#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Surfaces translate whatever their backend produces into these types
//! before invoking registered handlers. Application event enums are built
//! from them inside subscription map functions.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Control key.
        const CTRL  = 0b0010;
        /// Alt/Option key.
        const ALT   = 0b0100;
    }
}

/// A key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character key.
    Char(char),
    /// Enter / return.
    Enter,
    /// Escape.
    Esc,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// A function key (F1-F12).
    F(u8),
}

/// A key press delivered to key-down handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the press.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers to this event.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod crossterm_compat {
    use super::{KeyCode, KeyEvent, Modifiers};
    use crossterm::event as cte;

    impl KeyEvent {
        /// Convert a crossterm key event, returning `None` for keys tatami
        /// does not model (media keys, releases are filtered by the caller).
        #[must_use]
        pub fn from_crossterm(event: cte::KeyEvent) -> Option<Self> {
            let code = match event.code {
                cte::KeyCode::Char(c) => KeyCode::Char(c),
                cte::KeyCode::Enter => KeyCode::Enter,
                cte::KeyCode::Esc => KeyCode::Esc,
                cte::KeyCode::Backspace => KeyCode::Backspace,
                cte::KeyCode::Tab => KeyCode::Tab,
                cte::KeyCode::Up => KeyCode::Up,
                cte::KeyCode::Down => KeyCode::Down,
                cte::KeyCode::Left => KeyCode::Left,
                cte::KeyCode::Right => KeyCode::Right,
                cte::KeyCode::Home => KeyCode::Home,
                cte::KeyCode::End => KeyCode::End,
                cte::KeyCode::PageUp => KeyCode::PageUp,
                cte::KeyCode::PageDown => KeyCode::PageDown,
                cte::KeyCode::Delete => KeyCode::Delete,
                cte::KeyCode::Insert => KeyCode::Insert,
                cte::KeyCode::F(n) => KeyCode::F(n),
                _ => return None,
            };

            let mut modifiers = Modifiers::NONE;
            if event.modifiers.contains(cte::KeyModifiers::SHIFT) {
                modifiers |= Modifiers::SHIFT;
            }
            if event.modifiers.contains(cte::KeyModifiers::CONTROL) {
                modifiers |= Modifiers::CTRL;
            }
            if event.modifiers.contains(cte::KeyModifiers::ALT) {
                modifiers |= Modifiers::ALT;
            }

            Some(Self { code, modifiers })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_char_check() {
        let ev = KeyEvent::new(KeyCode::Char('q'));
        assert!(ev.is_char('q'));
        assert!(!ev.is_char('x'));
        assert!(!KeyEvent::new(KeyCode::Enter).is_char('q'));
    }

    #[test]
    fn key_event_modifier_checks() {
        let ev = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(ev.ctrl());
        assert!(!ev.alt());
        assert!(!ev.shift());
    }

    #[test]
    fn modifiers_combine() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.contains(Modifiers::CTRL));
        assert!(m.contains(Modifiers::SHIFT));
        assert!(!m.contains(Modifiers::ALT));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn crossterm_char_conversion() {
        use crossterm::event as cte;

        let ct = cte::KeyEvent::new(cte::KeyCode::Char('a'), cte::KeyModifiers::CONTROL);
        let ev = KeyEvent::from_crossterm(ct).expect("char key converts");
        assert!(ev.is_char('a'));
        assert!(ev.ctrl());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn crossterm_unmodeled_key_is_none() {
        use crossterm::event as cte;

        let ct = cte::KeyEvent::new(cte::KeyCode::CapsLock, cte::KeyModifiers::NONE);
        assert_eq!(KeyEvent::from_crossterm(ct), None);
    }
}
