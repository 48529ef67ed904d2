use tessel::{
    Context, Core, EventOutcome, FocusDirective, FocusSource, Key, KeyCode, Render,
    RenderDirective, Widget, WidgetId,
    error::Result,
    geom::Size,
};
use tessel_widgets::{Frame, Label, Stack};
use tracing::info;

use crate::config::DemoConfig;

/// Width of each cell. Longer text is cut off.
const CELL_WIDTH: u32 = 14;

/// A focusable label that shows the last key it received. `q` stops the
/// event loop; Tab and BackTab bubble up to the enclosing stacks.
pub struct KeyLabel {
    /// Cell name, shown before the key.
    name: String,
    /// Display.
    label: Label,
}

impl KeyLabel {
    /// Construct a label for a named cell.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: Label::new(name.clone()).focusable(),
            name,
        }
    }

    /// Current label text.
    pub fn text(&self) -> &str {
        self.label.text()
    }
}

impl Widget for KeyLabel {
    fn preferred_size(&self) -> Option<Size> {
        Some(Size::new(1, CELL_WIDTH))
    }

    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        self.label.render(directives, r)
    }

    fn direct_focus(&self, source: FocusSource) -> FocusDirective {
        self.label.direct_focus(source)
    }

    fn on_focus(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.label.on_focus(ctx)
    }

    fn on_blur(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.label.on_blur(ctx)
    }

    fn on_keypress(&mut self, key: Key, ctx: &mut dyn Context) -> Result<EventOutcome> {
        if key == 'q' {
            info!("{} asked to quit", self.name);
            ctx.stop();
            return Ok(EventOutcome::Handle);
        }
        if key == KeyCode::Tab || key == KeyCode::BackTab {
            return Ok(EventOutcome::Ignore);
        }
        self.label.set_text(format!("{}: {key}", self.name), ctx);
        Ok(EventOutcome::Handle)
    }

    fn name(&self) -> String {
        format!("key_label_{}", self.name)
    }
}

/// Build the playground: a vertical stack of framed rows, each a
/// horizontal stack of [`KeyLabel`]s. Returns the top widget and the labels
/// in row-major order.
pub fn build(core: &mut Core, cfg: &DemoConfig) -> Result<(WidgetId, Vec<WidgetId>)> {
    let top = core.add(Stack::vertical());
    let mut labels = Vec::new();
    for row in 0..cfg.rows {
        let frame = core.add(Frame::new().with_title(format!("row {row}")));
        let stack = core.add(Stack::horizontal());
        core.attach(frame, stack)?;
        for column in 0..cfg.columns {
            let label = core.add(KeyLabel::new(format!("{row}.{column}")));
            core.attach(stack, label)?;
            labels.push(label.id());
        }
        core.attach(top, frame)?;
    }
    Ok((top.id(), labels))
}
