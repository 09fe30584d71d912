//! Keyboard input types.
//!
//! Key input reaches the toolkit as a [`KeyState`] (key, modifiers, press or
//! release). The focus layer wraps it in a [`KeyEvent`] addressed to the
//! focused view; any stage of handling may mark it consumed.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::view::ViewId;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: true,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Ctrl or Meta, the "toggle" modifiers for pointer selection.
    pub fn toggles(&self) -> bool {
        self.control || self.meta
    }
}

/// Keyboard keys recognized by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab, Space, Escape,
}

impl Key {
    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }

    /// Canonical name, as accepted by [`Key::from_name`].
    pub fn name(&self) -> &'static str {
        const LETTERS: [&str; 26] = [
            "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q",
            "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
        ];
        const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        const FUNCTION: [&str; 12] = [
            "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
        ];

        if let Some(index) = Self::LETTERS.iter().position(|k| k == self) {
            return LETTERS[index];
        }
        if let Some(index) = Self::DIGITS.iter().position(|k| k == self) {
            return DIGITS[index];
        }
        if let Some(index) = Self::FUNCTION.iter().position(|k| k == self) {
            return FUNCTION[index];
        }
        match self {
            Key::ArrowUp => "Up",
            Key::ArrowDown => "Down",
            Key::ArrowLeft => "Left",
            Key::ArrowRight => "Right",
            Key::Home => "Home",
            Key::End => "End",
            Key::PageUp => "PageUp",
            Key::PageDown => "PageDown",
            Key::Backspace => "Backspace",
            Key::Delete => "Delete",
            Key::Insert => "Insert",
            Key::Enter => "Enter",
            Key::Tab => "Tab",
            Key::Space => "Space",
            Key::Escape => "Escape",
            _ => "?",
        }
    }

    /// Parse a key name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Key> {
        let lower = name.trim().to_lowercase();

        let mut chars = lower.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_ascii_lowercase() {
                return Some(Self::LETTERS[(ch as u8 - b'a') as usize]);
            }
            if ch.is_ascii_digit() {
                return Some(Self::DIGITS[(ch as u8 - b'0') as usize]);
            }
        }

        if let Some(number) = lower.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
            return Self::FUNCTION.get(number.checked_sub(1)?).copied();
        }

        match lower.as_str() {
            "up" | "arrowup" => Some(Key::ArrowUp),
            "down" | "arrowdown" => Some(Key::ArrowDown),
            "left" | "arrowleft" => Some(Key::ArrowLeft),
            "right" | "arrowright" => Some(Key::ArrowRight),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "pageup" | "pgup" => Some(Key::PageUp),
            "pagedown" | "pgdn" => Some(Key::PageDown),
            "backspace" | "back" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "insert" | "ins" => Some(Key::Insert),
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "space" | "spacebar" => Some(Key::Space),
            "escape" | "esc" => Some(Key::Escape),
            _ => None,
        }
    }

    #[rustfmt::skip]
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];

    #[rustfmt::skip]
    const DIGITS: [Key; 10] = [
        Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
        Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
    ];

    #[rustfmt::skip]
    const FUNCTION: [Key; 12] = [
        Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
        Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
    ];
}

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// The key was pressed.
    #[default]
    Pressed,
    /// The key was released.
    Released,
}

/// A key combination together with its press/release kind.
///
/// This is both the raw input delivered by a key input service and the unit
/// traversal bindings are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyState {
    /// The key.
    pub key: Key,
    /// Modifiers held with it.
    pub modifiers: KeyboardModifiers,
    /// Press or release.
    pub kind: KeyEventKind,
}

impl KeyState {
    /// A key press with the given modifiers.
    pub fn pressed(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            kind: KeyEventKind::Pressed,
        }
    }

    /// A key release with the given modifiers.
    pub fn released(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            kind: KeyEventKind::Released,
        }
    }

    /// A key press with no modifiers.
    pub fn key_only(key: Key) -> Self {
        Self::pressed(key, KeyboardModifiers::NONE)
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.control {
            parts.push("Ctrl");
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        if self.modifiers.meta {
            parts.push("Meta");
        }

        parts.push(self.key.name());

        write!(f, "{}", parts.join("+"))
    }
}

impl FromStr for KeyState {
    type Err = ConfigError;

    /// Parse a key press like `"Shift+Tab"` or `"Ctrl+Alt+F4"`.
    ///
    /// Modifiers are `Ctrl`/`Control`, `Alt`/`Option`, `Shift` and
    /// `Meta`/`Cmd`/`Super`; the last part names the key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut modifiers = KeyboardModifiers::NONE;
        let mut key: Option<(&str, Key)> = None;

        for part in s.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "command" | "super" => modifiers.meta = true,
                _ => {
                    if let Some((previous, _)) = key {
                        return Err(ConfigError::UnknownModifier(previous.to_string()));
                    }
                    let parsed =
                        Key::from_name(part).ok_or_else(|| ConfigError::UnknownKey(part.to_string()))?;
                    key = Some((part, parsed));
                }
            }
        }

        match key {
            Some((_, key)) => Ok(KeyState::pressed(key, modifiers)),
            None => Err(ConfigError::NoKey(s.to_string())),
        }
    }
}

/// A key event delivered to a view.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    target: ViewId,
    state: KeyState,
    consumed: bool,
}

impl KeyEvent {
    /// Create an unconsumed event addressed to `target`.
    pub fn new(target: ViewId, state: KeyState) -> Self {
        Self {
            target,
            state,
            consumed: false,
        }
    }

    /// The view the event is addressed to.
    pub fn target(&self) -> ViewId {
        self.target
    }

    /// The key input.
    pub fn state(&self) -> KeyState {
        self.state
    }

    /// The key.
    pub fn key(&self) -> Key {
        self.state.key
    }

    /// Modifiers held with the key.
    pub fn modifiers(&self) -> KeyboardModifiers {
        self.state.modifiers
    }

    /// Check if a handler has consumed the event.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Consume the event, stopping further handling.
    pub fn consume(&mut self) {
        self.consumed = true;
    }
}
