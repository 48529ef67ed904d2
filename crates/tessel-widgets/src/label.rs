use tessel::{
    Context, FocusDirective, FocusSource, Render, RenderDirective, Widget,
    error::Result,
    geom::{Position, Size},
    style::Style,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A one-line text label. Text is drawn on the first row; everything else
/// is blank.
pub struct Label {
    /// Label text.
    text: String,
    /// Style when unfocused.
    style: Style,
    /// Style while focused.
    focus_style: Style,
    /// Does the label accept focus?
    focusable: bool,
}

impl Label {
    /// Construct an unfocusable label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
            focus_style: Style::default().reverse(),
            focusable: false,
        }
    }

    /// Let the label take focus.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Set the unfocused style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the focused style.
    pub fn with_focus_style(mut self, style: Style) -> Self {
        self.focus_style = style;
        self
    }

    /// The label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and redraw.
    pub fn set_text(&mut self, text: impl Into<String>, ctx: &mut dyn Context) {
        self.text = text.into();
        ctx.invalidate();
    }
}

/// The longest prefix of `s` that fits in `width` columns.
pub fn fit(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, c) in s.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &s[..i];
        }
    }
    s
}

impl Widget for Label {
    fn preferred_size(&self) -> Option<Size> {
        Some(Size::new(1, self.text.width() as u32))
    }

    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        let style = if r.is_focused() {
            self.focus_style
        } else {
            self.style
        };
        for d in directives {
            r.fill_all(d, ' ', style)?;
            let visible = fit(&self.text, d.source.right().max(0) as usize);
            r.text(d, Position::zero(), visible, style)?;
        }
        Ok(())
    }

    fn direct_focus(&self, _source: FocusSource) -> FocusDirective {
        if self.focusable {
            FocusDirective::Accept
        } else {
            FocusDirective::Reject
        }
    }

    fn on_focus(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.invalidate();
        Ok(())
    }

    fn on_blur(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tessel::{Core, FocusManager, WidgetRect, geom::Rectangle, testing::TestSurface};

    use super::*;

    #[test]
    fn fit_counts_columns() {
        assert_eq!(fit("hello", 3), "hel");
        assert_eq!(fit("hello", 10), "hello");
        assert_eq!(fit("日本語", 4), "日本");
        assert_eq!(fit("", 0), "");
    }

    #[test]
    fn partial_redraw_of_wide_text() -> Result<()> {
        let size = Size::new(1, 6);
        let mut core = Core::new(size);
        let mut surface = TestSurface::new(size);
        let l = core.add(Label::new("日本語"));
        core.set_top_widget(l)?;
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.lines(), vec!["日本語"]);

        surface.clear_writes();
        core.invalidate(&[WidgetRect::new(l, Rectangle::new(0, 2, 1, 4))], false);
        core.render_invalidated(&mut surface)?;
        let texts: Vec<String> = surface.writes().into_iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["    ", "本語"]);
        assert_eq!(surface.lines(), vec!["日本語"]);
        Ok(())
    }

    #[test]
    fn preferred_width() {
        assert_eq!(Label::new("abc").preferred_size(), Some(Size::new(1, 3)));
        assert_eq!(Label::new("日本").preferred_size(), Some(Size::new(1, 4)));
    }

    #[test]
    fn render_and_update() -> Result<()> {
        let size = Size::new(2, 6);
        let mut core = Core::new(size);
        let mut surface = TestSurface::new(size);
        let l = core.add(Label::new("hi").focusable());
        core.set_top_widget(l)?;
        assert_eq!(core.focused(), Some(l.id()));
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.lines(), vec!["hi    ", "      "]);
        assert_eq!(surface.style_at(Position::zero()), Some(Style::default().reverse()));

        core.with_widget_mut(l, |l, ctx| l.set_text("longer text", ctx))?;
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.lines(), vec!["longer", "      "]);
        Ok(())
    }
}
