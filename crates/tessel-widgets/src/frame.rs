use tessel::{
    Context, FocusDirective, FocusSource, Mapping, MappingEntry, Render, RenderDirective, Widget,
    error::Result,
    geom::{Position, Rectangle, Size},
    style::{Color, Style},
};

use crate::label::fit;

/// Defines the set of glyphs used to draw the frame
#[derive(Debug, Clone, Copy)]
pub struct FrameGlyphs {
    /// Top left corner.
    pub topleft: char,
    /// Top right corner.
    pub topright: char,
    /// Bottom left corner.
    pub bottomleft: char,
    /// Bottom right corner.
    pub bottomright: char,
    /// Top and bottom edges.
    pub horizontal: char,
    /// Left and right edges.
    pub vertical: char,
}

/// Single line thin Unicode box drawing frame set
pub const SINGLE: FrameGlyphs = FrameGlyphs {
    topleft: '┌',
    topright: '┐',
    bottomleft: '└',
    bottomright: '┘',
    horizontal: '─',
    vertical: '│',
};

/// Double line Unicode box drawing frame set
pub const DOUBLE: FrameGlyphs = FrameGlyphs {
    topleft: '╔',
    topright: '╗',
    bottomleft: '╚',
    bottomright: '╝',
    horizontal: '═',
    vertical: '║',
};

/// Plain ASCII frame set
pub const ASCII: FrameGlyphs = FrameGlyphs {
    topleft: '+',
    topright: '+',
    bottomleft: '+',
    bottomright: '+',
    horizontal: '-',
    vertical: '|',
};

/// A one-cell border around the first child.
///
/// The border is drawn by the frame itself; the inner area is delegated to
/// the child. While anything inside the frame holds focus, the border is
/// drawn in the focus style.
pub struct Frame {
    /// Border glyphs.
    glyphs: FrameGlyphs,
    /// Title drawn on the top edge.
    title: Option<String>,
    /// Border style.
    style: Style,
    /// Border style while on the focus path.
    focus_style: Style,
    /// Current size.
    size: Size,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Construct a frame with thin single-line glyphs.
    pub fn new() -> Self {
        Self {
            glyphs: SINGLE,
            title: None,
            style: Style::default(),
            focus_style: Style::default().fg(Color::Yellow).bold(),
            size: Size::default(),
        }
    }

    /// Build a frame with a specified glyph set
    pub fn with_glyphs(mut self, glyphs: FrameGlyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Build a frame with a specified title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the border style used while the frame is on the focus path.
    pub fn with_focus_style(mut self, style: Style) -> Self {
        self.focus_style = style;
        self
    }

    /// The area given to the child.
    fn inner(size: Size) -> Rectangle {
        Rectangle::new(
            1,
            1,
            size.height.saturating_sub(2),
            size.width.saturating_sub(2),
        )
    }

    /// The four border strips: top, bottom, left, right. Strips may be
    /// empty on tiny frames.
    fn edges(size: Size) -> [Rectangle; 4] {
        let (h, w) = (size.height, size.width);
        let side = h.saturating_sub(2);
        [
            Rectangle::new(0, 0, h.min(1), w),
            Rectangle::new(h as i32 - 1, 0, h.saturating_sub(1).min(1), w),
            Rectangle::new(1, 0, side, w.min(1)),
            Rectangle::new(1, w as i32 - 1, side, w.saturating_sub(1).min(1)),
        ]
    }
}

impl Widget for Frame {
    fn resize(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        self.size = size;
        let inner = Self::inner(size);
        let mut mapping = Mapping::new();
        for edge in Self::edges(size) {
            if !edge.is_empty() {
                mapping.push(MappingEntry::local(edge));
            }
        }
        match ctx.children().first().copied() {
            Some(child) => {
                ctx.set_child_size(child, inner.size())?;
                if !inner.is_empty() {
                    mapping.push(MappingEntry::new(inner, Position::zero(), child));
                }
            }
            // Without a child the frame blanks its interior.
            None if !inner.is_empty() => mapping.push(MappingEntry::local(inner)),
            None => {}
        }
        ctx.set_mapping(Some(mapping));
        Ok(())
    }

    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        let style = if r.in_focus_path() {
            self.focus_style
        } else {
            self.style
        };
        let g = self.glyphs;
        let [top, bottom, left, right] = Self::edges(self.size);
        let (last_row, last_col) = (self.size.height as i32 - 1, self.size.width as i32 - 1);
        let inner = Self::inner(self.size);
        for d in directives {
            r.fill(d, inner, ' ', self.style)?;
            r.fill(d, top, g.horizontal, style)?;
            r.fill(d, bottom, g.horizontal, style)?;
            r.fill(d, left, g.vertical, style)?;
            r.fill(d, right, g.vertical, style)?;
            for (p, ch) in [
                (Position::new(0, 0), g.topleft),
                (Position::new(0, last_col), g.topright),
                (Position::new(last_row, 0), g.bottomleft),
                (Position::new(last_row, last_col), g.bottomright),
            ] {
                r.fill(d, Rectangle::from_parts(p, Size::new(1, 1)), ch, style)?;
            }
            if let Some(title) = &self.title {
                let room = self.size.width.saturating_sub(4) as usize;
                r.text(d, Position::new(0, 2), fit(title, room), style)?;
            }
        }
        Ok(())
    }

    fn direct_focus(&self, _source: FocusSource) -> FocusDirective {
        FocusDirective::Pass
    }

    fn on_in_focus_path(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.invalidate();
        Ok(())
    }

    fn on_out_focus_path(&mut self, ctx: &mut dyn Context) -> Result<()> {
        ctx.invalidate();
        Ok(())
    }
}
