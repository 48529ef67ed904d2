//! A widget that draws into an off-screen buffer once and copies damaged
//! regions out of it on every render pass.

use tessel::{
    Context, Render, RenderDirective, Widget,
    error::Result,
    geom::{Position, Size},
};
use tracing::trace;

use crate::termbuf::TermBuf;

/// Content source for a [`Buffered`] widget.
pub trait Paint: 'static {
    /// Draw the full content into `buf`, which has the widget's size.
    fn paint(&mut self, buf: &mut TermBuf) -> Result<()>;
}

/// Wraps a [`Paint`] implementation with an off-screen buffer sized to the
/// widget. The buffer is reallocated and repainted when the size changes.
pub struct Buffered<P: Paint> {
    /// Content source.
    painter: P,
    /// Off-screen content, `None` until the first resize.
    buf: Option<TermBuf>,
}

impl<P: Paint> Buffered<P> {
    /// Wrap a painter.
    pub fn new(painter: P) -> Self {
        Self { painter, buf: None }
    }

    /// The painter.
    pub fn painter(&self) -> &P {
        &self.painter
    }

    /// The painter, mutably. Call [`Self::repaint`] afterwards to show the
    /// changes.
    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    /// The off-screen buffer.
    pub fn buffer(&self) -> Option<&TermBuf> {
        self.buf.as_ref()
    }

    /// Repaint the buffer and redraw the widget.
    pub fn repaint(&mut self, ctx: &mut dyn Context) -> Result<()> {
        if let Some(buf) = &mut self.buf {
            self.painter.paint(buf)?;
            ctx.invalidate();
        }
        Ok(())
    }
}

impl<P: Paint> Widget for Buffered<P> {
    fn resize(&mut self, size: Size, _ctx: &mut dyn Context) -> Result<()> {
        if self.buf.as_ref().is_some_and(|b| b.size() == size) {
            return Ok(());
        }
        trace!("reallocating buffer at {}", size);
        let mut buf = TermBuf::blank(size);
        self.painter.paint(&mut buf)?;
        self.buf = Some(buf);
        Ok(())
    }

    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        let Some(buf) = &self.buf else {
            return Ok(());
        };
        for d in directives {
            let columns = (d.source.column, d.source.right());
            for row in d.source.row..d.source.bottom() {
                for (column, text, style) in buf.runs(row, columns) {
                    r.text(d, Position::new(row, column), &text, style)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tessel::{
        Core, WidgetRect,
        geom::Rectangle,
        style::Style,
        testing::TestSurface,
    };

    use super::*;

    /// Paints a diagonal and counts how often it was asked to.
    struct Diagonal {
        /// Number of paints.
        paints: usize,
    }

    impl Paint for Diagonal {
        fn paint(&mut self, buf: &mut TermBuf) -> Result<()> {
            self.paints += 1;
            buf.fill(buf.rect(), '.', Style::default());
            for i in 0..buf.size().height.min(buf.size().width) as i32 {
                buf.put(Position::new(i, i), '\\', Style::default());
            }
            Ok(())
        }
    }

    #[test]
    fn copies_damaged_regions() -> Result<()> {
        let size = Size::new(3, 3);
        let mut core = Core::new(size);
        let mut surface = TestSurface::new(size);
        let b = core.add(Buffered::new(Diagonal { paints: 0 }));
        core.set_top_widget(b)?;
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.lines(), vec!["\\..", ".\\.", "..\\"]);

        surface.clear_writes();
        core.invalidate(&[WidgetRect::new(b, Rectangle::new(1, 1, 1, 2))], false);
        core.render_invalidated(&mut surface)?;
        let writes = surface.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].pos, Position::new(1, 1));
        assert_eq!(writes[0].text, "\\.");
        Ok(())
    }

    #[test]
    fn repaints_only_on_size_change() -> Result<()> {
        let mut core = Core::new(Size::new(3, 3));
        let b = core.add(Buffered::new(Diagonal { paints: 0 }));
        core.set_top_widget(b)?;
        core.resize_screen(Size::new(3, 3))?;
        assert_eq!(core.with_widget(b, |b| b.painter().paints)?, 1);
        core.resize_screen(Size::new(4, 5))?;
        assert_eq!(core.with_widget(b, |b| b.painter().paints)?, 2);
        assert_eq!(
            core.with_widget(b, |b| b.buffer().map(TermBuf::size))?,
            Some(Size::new(4, 5))
        );
        core.with_widget_mut(b, |b, ctx| b.repaint(ctx))??;
        assert_eq!(core.with_widget(b, |b| b.painter().paints)?, 3);
        assert_eq!(core.pending().area(), 20);
        Ok(())
    }
}
