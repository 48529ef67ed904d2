use super::{Core, focus::FocusManager};
use crate::{
    error::Result,
    geom::Size,
    id::WidgetId,
    mapping::{Mapping, WidgetRect},
    widget::Context,
};

/// Context implementation backed by the core, scoped to one widget.
pub struct CoreContext<'a> {
    /// Core being operated on.
    core: &'a mut Core,
    /// The widget the context belongs to.
    node: WidgetId,
}

impl<'a> CoreContext<'a> {
    /// Construct a context for `node`.
    pub fn new(core: &'a mut Core, node: WidgetId) -> Self {
        Self { core, node }
    }
}

impl Context for CoreContext<'_> {
    fn id(&self) -> WidgetId {
        self.node
    }

    fn size(&self) -> Option<Size> {
        self.core.size(self.node)
    }

    fn children_of(&self, widget: WidgetId) -> Vec<WidgetId> {
        self.core.children(widget)
    }

    fn parent(&self) -> Option<WidgetId> {
        self.core.parent(self.node)
    }

    fn invalidate_regions(&mut self, regions: &[WidgetRect], mapped: bool) {
        self.core.invalidate(regions, mapped);
    }

    fn invalidate_mapping(&mut self) {
        self.core.invalidate_mapping();
    }

    fn set_mapping(&mut self, mapping: Option<Mapping>) {
        if let Some(node) = self.core.nodes.get_mut(self.node) {
            node.mapping = mapping;
        }
        self.core.invalidate_mapping();
    }

    fn set_child_size(&mut self, child: WidgetId, size: Size) -> Result<()> {
        self.core.set_size(child, size)
    }

    fn preferred_size_of(&self, widget: WidgetId) -> Option<Size> {
        self.core
            .widget_ref(widget)
            .ok()
            .and_then(|w| w.preferred_size())
    }

    fn minimal_size_of(&self, widget: WidgetId) -> Size {
        self.core
            .widget_ref(widget)
            .map(|w| w.minimal_size())
            .unwrap_or_default()
    }

    fn can_focus(&self, target: WidgetId) -> bool {
        matches!(self.core.find_focus(target), Ok(Some(_)))
    }

    fn focus(&mut self, target: WidgetId) {
        self.core.pending_focus = Some(target);
    }

    fn is_focused(&self) -> bool {
        self.core.is_focused(self.node)
    }

    fn is_in_focus_path(&self, widget: WidgetId) -> bool {
        self.core.is_in_focus_path(widget)
    }

    fn focused(&self) -> Option<WidgetId> {
        self.core.focused()
    }

    fn stop(&mut self) {
        self.core.running = false;
    }
}
