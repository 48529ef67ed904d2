use std::iter;

use unicode_width::UnicodeWidthChar;

use crate::{
    backend::Surface,
    error::Result,
    geom::{Position, Rectangle, Size},
    style::Style,
};

/// An instruction to redraw part of a widget: the widget-local rectangle
/// `source` appears on the surface with its top-left cell at `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderDirective {
    /// Rectangle in the widget's local coordinates.
    pub source: Rectangle,
    /// Surface position of the rectangle's top-left cell.
    pub target: Position,
}

impl RenderDirective {
    /// Construct a directive.
    pub fn new(source: Rectangle, target: Position) -> Self {
        Self { source, target }
    }

    /// Translate a widget-local position to the surface.
    pub fn to_surface(&self, local: Position) -> Position {
        self.target + (local - self.source.pos())
    }

    /// The area this directive covers on the surface.
    pub fn surface_rect(&self) -> Rectangle {
        self.source.at(self.target)
    }
}

/// The drawing handle given to [`crate::Widget::render`].
///
/// Every write names the directive it serves, takes widget-local
/// coordinates, and is clipped to that directive's source rectangle, so a
/// widget can only touch the cells it was asked to redraw. Writes are also
/// clipped to the surface, and the bottom-right cell is skipped on devices
/// that guard it.
pub struct Render<'a> {
    /// Output device.
    surface: &'a mut dyn Surface,
    /// Surface dimensions, captured at construction.
    bounds: Size,
    /// Skip the bottom-right surface cell.
    guard_last_cell: bool,
    /// Does the widget being rendered have focus?
    focused: bool,
    /// Is the widget being rendered on the focus path?
    in_focus_path: bool,
}

impl<'a> Render<'a> {
    /// Construct a renderer for an unfocused widget.
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        let bounds = surface.size();
        let guard_last_cell = surface.guards_last_cell();
        Self {
            surface,
            bounds,
            guard_last_cell,
            focused: false,
            in_focus_path: false,
        }
    }

    /// Set the focus flags reported to the widget.
    pub fn with_focus(mut self, focused: bool, in_focus_path: bool) -> Self {
        self.focused = focused;
        self.in_focus_path = in_focus_path;
        self
    }

    /// Does the widget being rendered have focus?
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Is the widget being rendered on the focus path?
    pub fn in_focus_path(&self) -> bool {
        self.in_focus_path
    }

    /// Print `txt` starting at the widget-local position `at`.
    pub fn text(&mut self, d: &RenderDirective, at: Position, txt: &str, style: Style) -> Result<()> {
        if at.row < d.source.row || at.row >= d.source.bottom() {
            return Ok(());
        }
        let lo = d.source.column.max(at.column);
        let hi = d.source.right();
        if lo >= hi {
            return Ok(());
        }
        let from = lo.abs_diff(at.column);
        let run = clip_columns(txt, from, from.saturating_add(hi.abs_diff(lo)));
        if run.is_empty() {
            return Ok(());
        }
        self.put(d.to_surface(Position::new(at.row, lo)), &run, style)
    }

    /// Fill the widget-local rectangle `rect` with `ch`.
    pub fn fill(&mut self, d: &RenderDirective, rect: Rectangle, ch: char, style: Style) -> Result<()> {
        let Some(isec) = rect.intersect(&d.source) else {
            return Ok(());
        };
        let run: String = iter::repeat_n(ch, isec.width as usize).collect();
        for row in isec.row..isec.bottom() {
            self.put(d.to_surface(Position::new(row, isec.column)), &run, style)?;
        }
        Ok(())
    }

    /// Fill everything the directive covers with `ch`.
    pub fn fill_all(&mut self, d: &RenderDirective, ch: char, style: Style) -> Result<()> {
        self.fill(d, d.source, ch, style)
    }

    /// Write a run at a surface position, clipped to the surface.
    fn put(&mut self, pos: Position, run: &str, style: Style) -> Result<()> {
        let height = self.bounds.height as i32;
        let mut width = self.bounds.width as i32;
        if pos.row < 0 || pos.row >= height {
            return Ok(());
        }
        if self.guard_last_cell && pos.row == height - 1 {
            width -= 1;
        }
        let skip = pos.column.min(0).unsigned_abs();
        let column = pos.column.max(0);
        if column >= width {
            return Ok(());
        }
        let clipped = clip_columns(run, skip, skip.saturating_add(width.abs_diff(column)));
        if clipped.is_empty() {
            return Ok(());
        }
        self.surface
            .write_run(Position::new(pos.row, column), &clipped, style)
    }
}

/// The part of `txt` covering display columns `from..to`, counted from the
/// start of the text. Wide characters cut by either edge become spaces.
fn clip_columns(txt: &str, from: u32, to: u32) -> String {
    let mut out = String::new();
    let mut col = 0u32;
    let mut kept = false;
    for c in txt.chars() {
        let w = c.width().unwrap_or(0) as u32;
        if w == 0 {
            // Combining marks stay with the character they follow.
            if kept {
                out.push(c);
            }
            continue;
        }
        if col >= to {
            break;
        }
        let end = col + w;
        if col >= from && end <= to {
            out.push(c);
            kept = true;
        } else {
            let covered = end.min(to).saturating_sub(col.max(from));
            out.extend(iter::repeat_n(' ', covered as usize));
            kept = false;
        }
        col = end;
    }
    out
}
