//! Containers that lay their children out in a row or a column.

use tessel::{
    Context, EventOutcome, FocusDirective, FocusSource, Key, KeyCode, Mapping, MappingEntry,
    Render, RenderDirective, WidgetId, Widget,
    error::Result,
    geom::{Position, Rectangle, Size, split_extent},
    style::Style,
};

/// Layout axis of a [`Stack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Children side by side, left to right.
    Horizontal,
    /// Children top to bottom.
    Vertical,
}

impl Direction {
    /// Extent of `size` along the axis.
    fn main(self, size: Size) -> u32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Rectangle at `offset` along the axis, `len` long, spanning the whole
    /// cross axis of `size`.
    fn slot(self, size: Size, offset: u32, len: u32) -> Rectangle {
        match self {
            Self::Horizontal => Rectangle::new(0, offset as i32, size.height, len),
            Self::Vertical => Rectangle::new(offset as i32, 0, len, size.width),
        }
    }
}

/// Lay out extents along one axis. Children with a preferred extent get it,
/// bounded below by their minimum and above by what is left; the others
/// share the remainder evenly. Returns the extents and any unused length.
pub fn allocate(total: u32, wants: &[(Option<u32>, u32)]) -> Result<(Vec<u32>, u32)> {
    let mut remaining = total;
    let mut out = vec![0; wants.len()];
    let mut flexible = Vec::new();
    for (i, (preferred, minimal)) in wants.iter().enumerate() {
        match preferred {
            Some(p) => {
                let len = (*p).max(*minimal).min(remaining);
                out[i] = len;
                remaining -= len;
            }
            None => flexible.push(i),
        }
    }
    if !flexible.is_empty() {
        let parts = split_extent(remaining, flexible.len() as u32)?;
        for (i, len) in flexible.into_iter().zip(parts) {
            out[i] = len;
        }
        remaining = 0;
    }
    Ok((out, remaining))
}

/// A horizontal or vertical stack of children. Space the children do not
/// use is drawn blank by the stack itself. Focus passes to the children, and
/// Tab and BackTab move it between them.
pub struct Stack {
    /// Layout axis.
    direction: Direction,
    /// Style of the blank leftover area.
    style: Style,
}

impl Stack {
    /// Construct a stack along `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            style: Style::default(),
        }
    }

    /// Children side by side.
    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    /// Children top to bottom.
    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// Set the style of the leftover area.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Move focus to the next (or previous) child that can take it. Only a
    /// stack without a parent wraps around.
    fn cycle(ctx: &mut dyn Context, forward: bool) -> EventOutcome {
        let children = ctx.children();
        let Some(current) = children.iter().position(|c| ctx.is_in_focus_path(*c)) else {
            return EventOutcome::Ignore;
        };
        let n = children.len();
        let wrap = ctx.parent().is_none();
        let candidates: Vec<usize> = if forward {
            let mut v: Vec<usize> = (current + 1..n).collect();
            if wrap {
                v.extend(0..current);
            }
            v
        } else {
            let mut v: Vec<usize> = (0..current).rev().collect();
            if wrap {
                v.extend((current + 1..n).rev());
            }
            v
        };
        let next: Option<WidgetId> = candidates
            .into_iter()
            .map(|i| children[i])
            .find(|c| ctx.can_focus(*c));
        match next {
            Some(c) => {
                ctx.focus(c);
                EventOutcome::Handle
            }
            None => EventOutcome::Ignore,
        }
    }
}

impl Widget for Stack {
    fn resize(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        let children = ctx.children();
        let wants: Vec<(Option<u32>, u32)> = children
            .iter()
            .map(|c| {
                (
                    ctx.preferred_size_of(*c).map(|s| self.direction.main(s)),
                    self.direction.main(ctx.minimal_size_of(*c)),
                )
            })
            .collect();
        let (extents, leftover) = allocate(self.direction.main(size), &wants)?;

        let mut mapping = Mapping::new();
        let mut offset = 0;
        for (child, len) in children.iter().zip(extents) {
            let slot = self.direction.slot(size, offset, len);
            ctx.set_child_size(*child, slot.size())?;
            if !slot.is_empty() {
                mapping.push(MappingEntry::new(slot, Position::zero(), *child));
            }
            offset += len;
        }
        let rest = self.direction.slot(size, offset, leftover);
        if !rest.is_empty() {
            mapping.push(MappingEntry::local(rest));
        }
        ctx.set_mapping(Some(mapping));
        Ok(())
    }

    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        for d in directives {
            r.fill_all(d, ' ', self.style)?;
        }
        Ok(())
    }

    fn direct_focus(&self, _source: FocusSource) -> FocusDirective {
        FocusDirective::Pass
    }

    fn on_keypress(&mut self, key: Key, ctx: &mut dyn Context) -> Result<EventOutcome> {
        Ok(match key {
            k if k == KeyCode::Tab => Self::cycle(ctx, true),
            k if k == KeyCode::BackTab => Self::cycle(ctx, false),
            _ => EventOutcome::Ignore,
        })
    }
}
