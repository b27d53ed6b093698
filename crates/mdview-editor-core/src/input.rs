//! Keyboard input and editor commands.
//!
//! Platform-agnostic key definitions plus the mapping from key combinations
//! to the commands the editor understands.

use smol_str::SmolStr;

/// Key values, following the names of the W3C `KeyboardEvent.key` values.
///
/// Only keys the editor reacts to get their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),
    /// Unknown/unidentified key.
    Unidentified,
    Escape,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a `KeyboardEvent.key` string.
    pub fn from_key_value(value: &str) -> Self {
        match value {
            "Escape" | "Esc" => Self::Escape,
            s if s.chars().count() == 1 => Self::character(s),
            _ => Self::Unidentified,
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };

    pub const META_SHIFT: Self = Self {
        meta: true,
        shift: true,
        ..Self::NONE
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    /// Get the primary modifier + Shift for the platform.
    pub fn primary_shift(is_mac: bool) -> Self {
        if is_mac {
            Self::META_SHIFT
        } else {
            Self::CTRL_SHIFT
        }
    }
}

/// A key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary(is_mac))
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary_shift(is_mac))
    }
}

/// Commands the editor session executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    Redo,
    Clear,
    ToggleSyncScroll,
    ToggleEditorFullscreen,
    TogglePreviewFullscreen,
    ExitFullscreen,
}

/// Map a key combination to a command.
///
/// Character keys are matched case-insensitively because Shift changes the
/// reported key value on most platforms.
pub fn command_for(combo: &KeyCombo, is_mac: bool) -> Option<EditorCommand> {
    if combo.key == Key::Escape && combo.modifiers == Modifiers::NONE {
        return Some(EditorCommand::ExitFullscreen);
    }

    let Key::Character(c) = &combo.key else {
        return None;
    };
    let c = c.to_ascii_lowercase();

    if combo.modifiers == Modifiers::primary(is_mac) {
        match c.as_str() {
            "z" => Some(EditorCommand::Undo),
            "y" => Some(EditorCommand::Redo),
            _ => None,
        }
    } else if combo.modifiers == Modifiers::primary_shift(is_mac) {
        match c.as_str() {
            "z" => Some(EditorCommand::Redo),
            "f" => Some(EditorCommand::ToggleEditorFullscreen),
            "p" => Some(EditorCommand::TogglePreviewFullscreen),
            "s" => Some(EditorCommand::ToggleSyncScroll),
            _ => None,
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_bindings() {
        let undo = KeyCombo::primary(Key::character("z"), false);
        assert_eq!(command_for(&undo, false), Some(EditorCommand::Undo));

        let redo = KeyCombo::primary_shift(Key::character("Z"), true);
        assert_eq!(command_for(&redo, true), Some(EditorCommand::Redo));

        let redo_y = KeyCombo::primary(Key::character("y"), false);
        assert_eq!(command_for(&redo_y, false), Some(EditorCommand::Redo));

        // Ctrl on a Mac is not the primary modifier.
        assert_eq!(command_for(&undo, true), None);
    }

    #[test]
    fn test_escape_exits_fullscreen() {
        let esc = KeyCombo::new(Key::from_key_value("Escape"));
        assert_eq!(command_for(&esc, false), Some(EditorCommand::ExitFullscreen));

        let shifted = KeyCombo::with_modifiers(Key::Escape, Modifiers::CTRL);
        assert_eq!(command_for(&shifted, false), None);
    }

    #[test]
    fn test_plain_typing_has_no_command() {
        let typed = KeyCombo::new(Key::from_key_value("z"));
        assert_eq!(command_for(&typed, false), None);
        assert_eq!(Key::from_key_value("F13"), Key::Unidentified);
        assert_eq!(Key::from_key_value("PageDown"), Key::Unidentified);
    }
}
