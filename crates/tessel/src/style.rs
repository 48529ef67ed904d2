//! Cell styling.
//!
//! A [`Style`] is attached to every run written to a surface. The set is
//! kept small: the named terminal palette plus RGB, and the attributes
//! crossterm can express everywhere.

use serde::Deserialize;

/// A terminal color.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// The terminal's default color.
    #[default]
    Reset,
    /// Black.
    Black,
    /// Dark grey.
    DarkGrey,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
    /// Grey.
    Grey,
    /// RGB color.
    Rgb {
        /// Red channel.
        r: u8,
        /// Green channel.
        g: u8,
        /// Blue channel.
        b: u8,
    },
}

/// A set of active text attributes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Deserialize)]
#[serde(default)]
pub struct AttrSet {
    /// Bold flag.
    pub bold: bool,
    /// Dim flag.
    pub dim: bool,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
    /// Reverse video flag.
    pub reverse: bool,
}

impl AttrSet {
    /// Is this attribute set empty?
    pub fn is_empty(&self) -> bool {
        !(self.bold || self.dim || self.italic || self.underline || self.reverse)
    }
}

/// Colors and attributes for a run of cells.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text attributes.
    pub attrs: AttrSet,
}

impl Style {
    /// The terminal's default style.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Replace the foreground color.
    pub fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Replace the background color.
    pub fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Turn on bold.
    pub fn bold(mut self) -> Self {
        self.attrs.bold = true;
        self
    }

    /// Turn on reverse video.
    pub fn reverse(mut self) -> Self {
        self.attrs.reverse = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let s = Style::plain().fg(Color::Red).bold();
        assert_eq!(s.fg, Color::Red);
        assert_eq!(s.bg, Color::Reset);
        assert!(s.attrs.bold);
        assert!(!s.attrs.is_empty());
        assert!(Style::plain().attrs.is_empty());
    }

    #[test]
    fn deserialize() {
        let s: Style = toml::from_str(
            r#"
            fg = "cyan"
            bg = { rgb = { r = 1, g = 2, b = 3 } }
            attrs = { reverse = true }
            "#,
        )
        .unwrap();
        assert_eq!(s.fg, Color::Cyan);
        assert_eq!(s.bg, Color::Rgb { r: 1, g: 2, b: 3 });
        assert!(s.attrs.reverse);
        assert!(!s.attrs.bold);
    }
}
