use crate::{geom::Size, id::WidgetId, mapping::Mapping, widget::Widget};

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state. Empty while the widget is executing.
    pub(crate) widget: Option<Box<dyn Widget>>,

    /// Parent in the arena tree.
    pub(crate) parent: Option<WidgetId>,
    /// Children in the arena tree.
    pub(crate) children: Vec<WidgetId>,

    /// Assigned size; `None` while detached.
    pub(crate) size: Option<Size>,
    /// Published mapping; `None` means the widget renders its whole area.
    pub(crate) mapping: Option<Mapping>,

    /// Is the node reachable from the top widget?
    pub(crate) attached: bool,
    /// Does the node hold focus?
    pub(crate) has_focus: bool,
    /// Is the node on the path from the top widget to the focused one?
    pub(crate) in_focus_path: bool,

    /// Widget name, captured at insertion.
    pub(crate) name: String,
}

impl Node {
    /// Wrap a widget in a detached node.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        Self {
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            size: None,
            mapping: None,
            attached: false,
            has_focus: false,
            in_focus_path: false,
            name,
        }
    }

    /// Return the node's widget name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// Return the assigned size.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Return the published mapping.
    pub fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    /// Return true if the node is reachable from the top widget.
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Return true if the node holds focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Return true if the node is on the focus path.
    pub fn in_focus_path(&self) -> bool {
        self.in_focus_path
    }
}
