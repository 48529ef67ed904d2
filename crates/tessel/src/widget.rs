//! Widget trait, the context handed to widgets, and focus negotiation types.

use std::any::{Any, type_name};

use convert_case::{Case, Casing};

use crate::{
    error::Result,
    event::key::Key,
    geom::{Rectangle, Size},
    id::WidgetId,
    mapping::{Mapping, WidgetRect},
    render::{Render, RenderDirective},
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was not handled and will bubble up the tree.
    Ignore,
}

/// Why a widget is being asked whether it wants focus.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FocusSource {
    /// The widget itself was the target of the focus request.
    Direct,
    /// The widget's parent passed focus down to its first child.
    Parent,
    /// A child passed focus up.
    Child,
    /// A sibling rejected focus and the search moved on to this widget.
    Kin,
}

/// A widget's answer to a focus query.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FocusDirective {
    /// Take focus.
    Accept,
    /// Decline; the search moves on to the next sibling.
    Reject,
    /// Decline, but let the search descend into this widget's children.
    Pass,
}

/// Access to the core given to widgets during layout and event dispatch.
///
/// Calls that change focus take effect once the current widget method has
/// returned, because the focus hooks may need to run on the caller itself.
pub trait Context {
    /// The widget this context was created for.
    fn id(&self) -> WidgetId;

    /// Size of the current widget, `None` while detached.
    fn size(&self) -> Option<Size>;

    /// Children of the current widget in order.
    fn children(&self) -> Vec<WidgetId> {
        self.children_of(self.id())
    }

    /// Children of a specific widget in order.
    fn children_of(&self, widget: WidgetId) -> Vec<WidgetId>;

    /// Parent of the current widget.
    fn parent(&self) -> Option<WidgetId>;

    /// Mark the whole current widget for redraw.
    fn invalidate(&mut self) {
        if let Some(size) = self.size() {
            self.invalidate_rects(&[size.rect()], false);
        }
    }

    /// Mark rectangles of the current widget for redraw. With `mapped`, the
    /// rectangles may cover areas the widget delegates to children.
    fn invalidate_rects(&mut self, rects: &[Rectangle], mapped: bool) {
        let id = self.id();
        let regions: Vec<WidgetRect> = rects.iter().map(|r| WidgetRect::new(id, *r)).collect();
        self.invalidate_regions(&regions, mapped);
    }

    /// Mark rectangles of arbitrary widgets for redraw.
    fn invalidate_regions(&mut self, regions: &[WidgetRect], mapped: bool);

    /// Signal that the screen mapping must be recomputed.
    fn invalidate_mapping(&mut self);

    /// Publish the current widget's mapping. `None` means the widget renders
    /// its whole area itself.
    fn set_mapping(&mut self, mapping: Option<Mapping>);

    /// Assign a size to a child, running its layout.
    fn set_child_size(&mut self, child: WidgetId, size: Size) -> Result<()>;

    /// The preferred size of a widget.
    fn preferred_size_of(&self, widget: WidgetId) -> Option<Size>;

    /// The minimal size of a widget.
    fn minimal_size_of(&self, widget: WidgetId) -> Size;

    /// Would a focus search starting at `target` find a widget?
    fn can_focus(&self, target: WidgetId) -> bool;

    /// Focus `target` or the first widget below it that accepts.
    fn focus(&mut self, target: WidgetId);

    /// Does the current widget have focus?
    fn is_focused(&self) -> bool;

    /// Is the current widget on the focus path?
    fn in_focus_path(&self) -> bool {
        self.is_in_focus_path(self.id())
    }

    /// Is a specific widget on the focus path?
    fn is_in_focus_path(&self, widget: WidgetId) -> bool;

    /// The focused widget, if any.
    fn focused(&self) -> Option<WidgetId>;

    /// Ask the screen's event loop to stop.
    fn stop(&mut self);
}

/// Widgets are the behavior attached to nodes in the core arena.
pub trait Widget: Any {
    /// The size the widget would like, if it has an opinion.
    fn preferred_size(&self) -> Option<Size> {
        None
    }

    /// The smallest size the widget can render in.
    fn minimal_size(&self) -> Size {
        Size::default()
    }

    /// The widget was given a new size. Containers lay out their children
    /// here and publish a mapping through the context.
    fn resize(&mut self, _size: Size, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Redraw the widget-local rectangles named by `directives`. All the
    /// directives for one render pass arrive in a single call.
    fn render(&mut self, _directives: &[RenderDirective], _r: &mut Render) -> Result<()> {
        Ok(())
    }

    /// Decide whether to take focus.
    fn direct_focus(&self, _source: FocusSource) -> FocusDirective {
        FocusDirective::Reject
    }

    /// The widget received focus.
    fn on_focus(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// The widget lost focus.
    fn on_blur(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// The widget joined the focus path.
    fn on_in_focus_path(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// The widget left the focus path.
    fn on_out_focus_path(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Handle a keystroke. Unhandled keys bubble to the parent.
    fn on_keypress(&mut self, _key: Key, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Name used in tree dumps and logs.
    fn name(&self) -> String {
        convert_name(type_name::<Self>())
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// Turn a type path into a snake case widget name, dropping the module path
/// and any generic arguments.
pub(crate) fn convert_name(name: &str) -> String {
    let base = name.split('<').next().unwrap_or(name);
    let short = base.rsplit("::").next().unwrap_or(base);
    let converted: String = short
        .to_case(Case::Snake)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if converted.is_empty() {
        "widget".into()
    } else {
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A widget with no overrides.
    struct FancyBox;

    impl Widget for FancyBox {}

    #[test]
    fn names() {
        assert_eq!(FancyBox.name(), "fancy_box");
        assert_eq!(convert_name("a::b::Stack<u8>"), "stack");
        assert_eq!(convert_name("!!!"), "widget");
    }

    #[test]
    fn defaults() {
        assert_eq!(FancyBox.direct_focus(FocusSource::Direct), FocusDirective::Reject);
        assert_eq!(FancyBox.preferred_size(), None);
        assert_eq!(FancyBox.minimal_size(), Size::new(0, 0));
    }
}
