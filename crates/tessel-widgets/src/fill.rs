use tessel::{
    Render, RenderDirective, Widget,
    error::{Error, Result},
    style::Style,
};

/// A widget that fills its whole area with one character.
#[derive(Debug, Clone)]
pub struct Fill {
    /// Fill character.
    ch: char,
    /// Fill style.
    style: Style,
}

impl Fill {
    /// Construct a fill from a string holding exactly one character.
    pub fn new(ch: &str) -> Result<Self> {
        let mut chars = ch.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::from_char(c)),
            _ => Err(Error::Invalid(format!(
                "fill needs a single character, got {ch:?}"
            ))),
        }
    }

    /// Construct a fill from a character.
    pub fn from_char(ch: char) -> Self {
        Self {
            ch,
            style: Style::default(),
        }
    }

    /// Set the fill style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::from_char('*')
    }
}

impl Widget for Fill {
    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        for d in directives {
            r.fill_all(d, self.ch, self.style)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_only() {
        assert!(Fill::new("#").is_ok());
        assert!(Fill::new("").is_err());
        assert!(Fill::new("ab").is_err());
        assert_eq!(Fill::new("é").map(|f| f.ch).ok(), Some('é'));
        assert_eq!(Fill::default().ch, '*');
    }
}
