//! Keyboard input primitives.
use std::{fmt, ops::Add};

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Mods {
    /// Is any modifier active?
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, key: KeyCode) -> Self::Output {
        Key { mods: self, key }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, other: char) -> Self::Output {
        Key {
            mods: self,
            key: other.into(),
        }
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// Logical key codes.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter/return key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up key.
    PageUp,
    /// Page down key.
    PageDown,
    /// Tab key.
    Tab,
    /// Shift + Tab key.
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// Function key; `F(1)` is F1.
    F(u8),
    /// A character.
    Char(char),
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => write!(f, "space"),
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "f{n}"),
            Self::Backspace => write!(f, "backspace"),
            Self::Enter => write!(f, "enter"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Home => write!(f, "home"),
            Self::End => write!(f, "end"),
            Self::PageUp => write!(f, "pageup"),
            Self::PageDown => write!(f, "pagedown"),
            Self::Tab => write!(f, "tab"),
            Self::BackTab => write!(f, "backtab"),
            Self::Delete => write!(f, "delete"),
            Self::Insert => write!(f, "insert"),
            Self::Esc => write!(f, "esc"),
        }
    }
}

/// Keys that keep their shift modifier under normalization.
const LEAVE_INTACT: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// Normalize shifted input for matching: shifted lowercase ASCII becomes
    /// uppercase without shift, space and enter keep shift, and every other
    /// key simply drops it.
    ///
    /// | input             | normalization    |
    /// |-------------------|------------------|
    /// | shift + a         | A                |
    /// | shift + )         | )                |
    /// | shift + enter     | shift + enter    |
    /// | shift + ctrl + A  | ctrl + A         |
    pub fn normalize(&self) -> Self {
        if !self.mods.shift || LEAVE_INTACT.contains(&self.key) {
            return *self;
        }
        let mods = Mods {
            shift: false,
            ..self.mods
        };
        let key = match self.key {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_uppercase()),
            other => other,
        };
        Self { mods, key }
    }

    /// The same key with the alt modifier added. Used to fold an escape
    /// prefix into the key that follows it.
    pub fn with_alt(self) -> Self {
        Self {
            mods: self.mods + Alt,
            key: self.key,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            write!(f, "ctrl-")?;
        }
        if self.mods.alt {
            write!(f, "alt-")?;
        }
        if self.mods.shift {
            write!(f, "shift-")?;
        }
        write!(f, "{}", self.key)
    }
}

impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        // If there are modifiers, we never match.
        if self.mods != Empty {
            return false;
        }
        *c == self.key
    }
}

impl PartialEq<char> for Key {
    fn eq(&self, c: &char) -> bool {
        *self == KeyCode::Char(*c)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self {
            mods: Empty,
            key: KeyCode::Char(c),
        }
    }
}

impl From<KeyCode> for Key {
    fn from(c: KeyCode) -> Self {
        Self {
            mods: Empty,
            key: c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!((Shift + 'A').normalize(), 'A');
        assert_eq!((Shift + 'a').normalize(), 'A');
        assert_eq!((Shift + ')').normalize(), ')');
        assert_eq!((Shift + ' ').normalize(), Shift + ' ');
        assert_eq!((Shift + KeyCode::Enter).normalize(), Shift + KeyCode::Enter);
        assert_eq!((Shift + Alt + 'A').normalize(), Alt + 'A');
        assert_eq!((Shift + KeyCode::Left).normalize(), KeyCode::Left);
    }

    #[test]
    fn display() {
        assert_eq!(Key::from('x').to_string(), "x");
        assert_eq!((Ctrl + 'c').to_string(), "ctrl-c");
        assert_eq!((Ctrl + Alt + KeyCode::F(2)).to_string(), "ctrl-alt-f2");
        assert_eq!(Key::from(' ').to_string(), "space");
    }

    #[test]
    fn escape_folding() {
        assert_eq!(Key::from('x').with_alt(), Alt + 'x');
        assert_eq!((Ctrl + 'x').with_alt(), Ctrl + Alt + 'x');
        assert!(!Key::from('x').mods.any());
    }
}
