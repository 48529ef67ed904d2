//! The widget arena and the compositor state built on top of it.
//!
//! [`Core`] owns every widget, the tree structure, the cached screen mapping
//! and the pending damage. The [`crate::Screen`] drives it from the event
//! loop; tests drive it directly.

/// Context implementation handed to widgets.
pub mod context;
/// Focus search and commit.
pub mod focus;
/// Arena node data.
pub mod node;

use std::{
    any::{Any, type_name},
    collections::HashMap,
    mem,
};

use slotmap::SlotMap;
use tracing::{debug, trace};

pub use self::{context::CoreContext, focus::FocusManager, node::Node};
use crate::{
    backend::Surface,
    error::{Error, Result},
    event::key::Key,
    geom::{Position, Rectangle, Size},
    id::{TypedId, WidgetId},
    mapping::{Mapping, MappingEntry, MappingLookup, WidgetRect},
    render::{Render, RenderDirective},
    widget::{Context, EventOutcome, Widget},
};

/// The widget arena plus screen composition state.
pub struct Core {
    /// Arena of nodes.
    pub(crate) nodes: SlotMap<WidgetId, Node>,
    /// The widget covering the whole screen.
    pub(crate) top: Option<WidgetId>,
    /// Current dimensions of the screen.
    pub(crate) screen_size: Size,
    /// Screen mapping resolved down to drawing widgets.
    pub(crate) unfolded: Mapping,
    /// Damage waiting for the next render pass, a sub-mapping of `unfolded`.
    pub(crate) invalidated: Mapping,
    /// Must `unfolded` be recomputed before use?
    pub(crate) mapping_dirty: bool,
    /// Number of times `unfolded` has been recomputed.
    pub(crate) mapping_gen: u64,
    /// The focused widget.
    pub(crate) focus: Option<WidgetId>,
    /// Focus request made by a widget, applied once it returns.
    pub(crate) pending_focus: Option<WidgetId>,
    /// Cleared to stop the event loop.
    pub(crate) running: bool,
}

impl MappingLookup for Core {
    fn mapping_of(&self, widget: WidgetId) -> Option<&Mapping> {
        self.nodes.get(widget).and_then(|n| n.mapping.as_ref())
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Core {
    /// Create an empty core for a screen of the given size.
    pub fn new(screen_size: Size) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            top: None,
            screen_size,
            unfolded: Mapping::new(),
            invalidated: Mapping::new(),
            mapping_dirty: false,
            mapping_gen: 0,
            focus: None,
            pending_focus: None,
            running: false,
        }
    }

    /// Add a detached widget to the arena.
    pub fn add<W: Widget>(&mut self, widget: W) -> TypedId<W> {
        TypedId::new(self.add_boxed(Box::new(widget)))
    }

    /// Add a boxed widget to the arena.
    pub fn add_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        self.nodes.insert(Node::new(widget))
    }

    /// Look up a node.
    pub fn node(&self, id: impl Into<WidgetId>) -> Option<&Node> {
        self.nodes.get(id.into())
    }

    /// Look up a node, failing if it does not exist.
    pub(crate) fn node_ref(&self, id: WidgetId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Borrow a widget that is not currently executing.
    pub(crate) fn widget_ref(&self, id: WidgetId) -> Result<&dyn Widget> {
        self.node_ref(id)?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidget(id))
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The top widget.
    pub fn top(&self) -> Option<WidgetId> {
        self.top
    }

    /// Current screen dimensions.
    pub fn screen_size(&self) -> Size {
        self.screen_size
    }

    /// The rectangle covering the whole screen.
    pub fn whole_screen(&self) -> Rectangle {
        self.screen_size.rect()
    }

    /// Parent of a widget.
    pub fn parent(&self, id: impl Into<WidgetId>) -> Option<WidgetId> {
        self.nodes.get(id.into()).and_then(|n| n.parent)
    }

    /// Children of a widget in order.
    pub fn children(&self, id: impl Into<WidgetId>) -> Vec<WidgetId> {
        self.nodes
            .get(id.into())
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Assigned size of a widget.
    pub fn size(&self, id: impl Into<WidgetId>) -> Option<Size> {
        self.nodes.get(id.into()).and_then(|n| n.size)
    }

    /// Is the widget reachable from the top widget?
    pub fn is_attached(&self, id: impl Into<WidgetId>) -> bool {
        self.nodes.get(id.into()).is_some_and(|n| n.attached)
    }

    /// The widget and its ancestors, starting with the widget and ending
    /// with the root of its tree.
    pub fn ancestors(&self, id: impl Into<WidgetId>) -> Vec<WidgetId> {
        let mut ret = Vec::new();
        let mut current = Some(id.into());
        while let Some(id) = current {
            if !self.nodes.contains_key(id) {
                break;
            }
            ret.push(id);
            current = self.nodes[id].parent;
        }
        ret
    }

    /// The widget and all its descendants in pre-order.
    pub fn descendants(&self, id: impl Into<WidgetId>) -> Vec<WidgetId> {
        let mut ret = Vec::new();
        let mut stack = vec![id.into()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            ret.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        ret
    }

    /// The resolved screen mapping. May be stale while a recomputation is
    /// pending; see [`Self::update_mapping`].
    pub fn unfolded_mapping(&self) -> &Mapping {
        &self.unfolded
    }

    /// Damage waiting for the next render pass.
    pub fn pending(&self) -> &Mapping {
        &self.invalidated
    }

    /// Number of times the screen mapping has been recomputed.
    pub fn mapping_generation(&self) -> u64 {
        self.mapping_gen
    }

    /// Does the screen mapping need recomputation?
    pub fn mapping_dirty(&self) -> bool {
        self.mapping_dirty
    }

    /// Is the event loop running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask the event loop to stop.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Set the attached flag on a subtree.
    fn mark_attached(&mut self, root: WidgetId, attached: bool) {
        for id in self.descendants(root) {
            if let Some(n) = self.nodes.get_mut(id) {
                n.attached = attached;
            }
        }
    }

    /// Does the subtree at `root` contain the focused widget?
    fn contains_focus(&self, root: WidgetId) -> bool {
        self.focus
            .is_some_and(|f| self.ancestors(f).contains(&root))
    }

    /// Re-run the layout of a sized widget and redraw it.
    fn relayout(&mut self, id: WidgetId) -> Result<()> {
        self.invalidate_mapping();
        if let Some(size) = self.size(id) {
            self.set_size(id, size)?;
            if self.is_attached(id) {
                self.invalidate(&[WidgetRect::new(id, size.rect())], true);
            }
        }
        Ok(())
    }

    /// Append `child` to `parent`'s children. The child must be detached
    /// and must not be an ancestor of `parent`. The parent is laid out again
    /// if it already has a size.
    pub fn attach(&mut self, parent: impl Into<WidgetId>, child: impl Into<WidgetId>) -> Result<()> {
        let (parent, child) = (parent.into(), child.into());
        self.node_ref(parent)?;
        let node = self.node_ref(child)?;
        if node.parent.is_some() || self.top == Some(child) {
            return Err(Error::Invalid(format!("{} is already attached", node.name)));
        }
        if self.ancestors(parent).contains(&child) {
            return Err(Error::Invalid(format!(
                "attaching {} would create a cycle",
                node.name
            )));
        }
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        let attached = self.nodes[parent].attached;
        self.mark_attached(child, attached);
        self.relayout(parent)
    }

    /// Detach a widget from its parent, or from the screen if it is the top
    /// widget. The widget loses its size. If it contained the focus, focus is
    /// cleared and searched for again from the top widget.
    pub fn detach(&mut self, child: impl Into<WidgetId>) -> Result<()> {
        let child = child.into();
        let parent = self.node_ref(child)?.parent;
        if parent.is_none() && self.top != Some(child) {
            return Ok(());
        }
        let refocus = self.contains_focus(child);
        if refocus {
            self.commit_focus(None)?;
        }
        if self.pending_focus.is_some_and(|p| self.ancestors(p).contains(&child)) {
            self.pending_focus = None;
        }

        if let Some(p) = parent {
            self.nodes[p].children.retain(|c| *c != child);
        } else {
            self.top = None;
        }
        {
            let node = &mut self.nodes[child];
            node.parent = None;
            node.size = None;
        }
        self.mark_attached(child, false);

        match parent {
            Some(p) => self.relayout(p)?,
            None => {
                self.invalidate_mapping();
                self.invalidated = Mapping::new();
            }
        }
        if refocus && let Some(top) = self.top {
            self.focus(top)?;
        }
        Ok(())
    }

    /// Detach a widget and drop it and all its descendants from the arena.
    pub fn remove_subtree(&mut self, id: impl Into<WidgetId>) -> Result<()> {
        let id = id.into();
        self.node_ref(id)?;
        self.detach(id)?;
        for n in self.descendants(id) {
            self.nodes.remove(n);
        }
        Ok(())
    }

    /// Make `id` the widget covering the whole screen. Any previous top
    /// widget is detached. The new top is sized to the screen, focus is
    /// searched from it, and the whole screen is invalidated.
    pub fn set_top_widget(&mut self, id: impl Into<WidgetId>) -> Result<()> {
        let id = id.into();
        if self.node_ref(id)?.parent.is_some() {
            return Err(Error::Invalid(format!(
                "{} has a parent and cannot be the top widget",
                self.nodes[id].name
            )));
        }
        if let Some(old) = self.top
            && old != id
        {
            self.detach(old)?;
        }
        self.top = Some(id);
        self.mark_attached(id, true);
        self.set_size(id, self.screen_size)?;
        self.focus(id)?;
        self.invalidate(&[WidgetRect::new(id, self.whole_screen())], true);
        Ok(())
    }

    /// Assign a size to a widget and run its layout.
    pub fn set_size(&mut self, id: impl Into<WidgetId>, size: Size) -> Result<()> {
        let id = id.into();
        self.nodes
            .get_mut(id)
            .ok_or(Error::NodeNotFound(id))?
            .size = Some(size);
        self.invalidate_mapping();
        self.with_dyn_widget_mut(id, |w, core| {
            let mut ctx = CoreContext::new(core, id);
            w.resize(size, &mut ctx)
        })?
    }

    /// The screen changed size: resize the top widget and invalidate
    /// everything.
    pub fn resize_screen(&mut self, size: Size) -> Result<()> {
        debug!("screen resized to {}", size);
        self.screen_size = size;
        self.invalidate_mapping();
        if let Some(top) = self.top {
            self.set_size(top, size)?;
            self.invalidate(&[WidgetRect::new(top, self.whole_screen())], true);
        }
        Ok(())
    }

    /// Publish a widget's mapping.
    pub fn set_mapping(&mut self, id: impl Into<WidgetId>, mapping: Option<Mapping>) -> Result<()> {
        let id = id.into();
        self.nodes
            .get_mut(id)
            .ok_or(Error::NodeNotFound(id))?
            .mapping = mapping;
        self.invalidate_mapping();
        Ok(())
    }

    /// Signal that the screen mapping must be recomputed before next use.
    pub fn invalidate_mapping(&mut self) {
        self.mapping_dirty = true;
    }

    /// Recompute the screen mapping by unfolding the top widget over the
    /// whole screen. Pending damage is re-resolved against the new mapping
    /// so that it never refers to stale offsets or departed widgets.
    pub fn update_mapping(&mut self) {
        let unfolded = match self.top {
            Some(top) => Mapping::from(vec![MappingEntry::new(
                self.whole_screen(),
                Position::zero(),
                top,
            )])
            .unfolded(self),
            None => Mapping::new(),
        };
        if !self.invalidated.is_empty() {
            let outside = &unfolded - &self.invalidated;
            self.invalidated = &unfolded - &outside;
        }
        self.unfolded = unfolded;
        self.mapping_dirty = false;
        self.mapping_gen += 1;
        debug!(
            "mapping recomputed: {} entries, generation {}",
            self.unfolded.len(),
            self.mapping_gen
        );
    }

    /// Invalidate rectangles given as widget-local regions. With `mapped`
    /// false, the rectangles must be drawn by the named widgets themselves;
    /// with `mapped` true, they are first unfolded through the widgets' own
    /// mappings at some extra cost. Regions of detached widgets are ignored.
    pub fn invalidate(&mut self, regions: &[WidgetRect], mapped: bool) {
        let regions: Vec<WidgetRect> = regions
            .iter()
            .filter(|wr| self.is_attached(wr.widget))
            .copied()
            .collect();
        if regions.is_empty() {
            return;
        }
        if self.mapping_dirty {
            self.update_mapping();
        }
        let regions = if mapped {
            let tmp: Mapping = regions
                .iter()
                .map(|wr| MappingEntry::new(wr.rect.size().rect(), wr.rect.pos(), wr.widget))
                .collect();
            tmp.unfolded(self)
                .iter()
                .filter_map(|e| e.widget.map(|w| WidgetRect::new(w, e.target_rect())))
                .collect()
        } else {
            regions
        };
        let damage = self.unfolded.restrict_image(&regions);
        self.invalidated.extend(&damage);
    }

    /// Invalidate the whole of a widget's own area.
    pub fn invalidate_widget(&mut self, id: impl Into<WidgetId>) {
        let id = id.into();
        if let Some(size) = self.size(id) {
            self.invalidate(&[WidgetRect::new(id, size.rect())], false);
        }
    }

    /// Invalidate the entire screen.
    pub fn invalidate_all(&mut self) {
        if let Some(top) = self.top {
            self.invalidate(&[WidgetRect::new(top, self.whole_screen())], true);
        }
    }

    /// Render all pending damage. Each widget's `render` is called once
    /// with every directive addressed to it, in order of first appearance.
    /// Returns true if anything was rendered.
    pub fn render_invalidated(&mut self, surface: &mut dyn Surface) -> Result<bool> {
        if self.mapping_dirty {
            self.update_mapping();
        }
        if self.invalidated.is_empty() {
            return Ok(false);
        }
        let pending = mem::take(&mut self.invalidated);
        let mut order = Vec::new();
        let mut batches: HashMap<WidgetId, Vec<RenderDirective>> = HashMap::new();
        for entry in &pending {
            let Some(widget) = entry.widget else {
                continue;
            };
            batches
                .entry(widget)
                .or_insert_with(|| {
                    order.push(widget);
                    Vec::new()
                })
                .push(RenderDirective::new(entry.target_rect(), entry.source.pos()));
        }
        for widget in order {
            let Some(node) = self.nodes.get(widget) else {
                debug!("skipping render for removed widget {:?}", widget);
                continue;
            };
            let (focused, in_path) = (node.has_focus, node.in_focus_path);
            let batch = batches.remove(&widget).unwrap_or_default();
            trace!("render {}: {} directives", node.name, batch.len());
            self.with_dyn_widget_mut(widget, |w, _| {
                let mut r = Render::new(surface).with_focus(focused, in_path);
                w.render(&batch, &mut r)
            })??;
        }
        Ok(true)
    }

    /// Deliver a key to the focused widget, bubbling it to ancestors until
    /// one handles it.
    pub fn dispatch_key(&mut self, key: Key) -> Result<EventOutcome> {
        let mut current = self.focus;
        while let Some(id) = current {
            let outcome = self.with_dyn_widget_mut(id, |w, core| {
                let mut ctx = CoreContext::new(core, id);
                w.on_keypress(key, &mut ctx)
            })??;
            self.apply_pending_focus()?;
            if outcome == EventOutcome::Handle {
                return Ok(outcome);
            }
            current = self.parent(id);
        }
        debug!("unhandled key: {}", key);
        Ok(EventOutcome::Ignore)
    }

    /// Apply focus requests made through a context.
    pub(crate) fn apply_pending_focus(&mut self) -> Result<()> {
        while let Some(target) = self.pending_focus.take() {
            if self.is_attached(target) {
                self.focus(target)?;
            }
        }
        Ok(())
    }

    /// Run a closure with a widget taken out of its slot, so that the core
    /// can be borrowed mutably alongside it.
    pub(crate) fn with_dyn_widget_mut<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let mut widget = self
            .nodes
            .get_mut(id)
            .ok_or(Error::NodeNotFound(id))?
            .widget
            .take()
            .ok_or(Error::ReentrantWidget(id))?;
        let ret = f(widget.as_mut(), self);
        // The node may have been removed while the widget was out.
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        Ok(ret)
    }

    /// Borrow a widget by typed id.
    pub fn with_widget<W: Widget, R>(&self, id: TypedId<W>, f: impl FnOnce(&W) -> R) -> Result<R> {
        let any = self.widget_ref(id.id())? as &dyn Any;
        let w = any
            .downcast_ref::<W>()
            .ok_or_else(|| Error::Invalid(format!("expected widget type {}", type_name::<W>())))?;
        Ok(f(w))
    }

    /// Mutate a widget by typed id. The closure gets a context for the
    /// widget, so it can invalidate itself or change focus.
    pub fn with_widget_mut<W: Widget, R>(
        &mut self,
        id: TypedId<W>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> R,
    ) -> Result<R> {
        let node = id.id();
        let ret = self.with_dyn_widget_mut(node, |w, core| {
            let any = w as &mut dyn Any;
            any.downcast_mut::<W>().map(|w| {
                let mut ctx = CoreContext::new(core, node);
                f(w, &mut ctx)
            })
        })?;
        self.apply_pending_focus()?;
        ret.ok_or_else(|| Error::Invalid(format!("expected widget type {}", type_name::<W>())))
    }
}
