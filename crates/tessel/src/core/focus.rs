use tracing::debug;

use super::{Core, context::CoreContext};
use crate::{
    error::{Error, Result},
    id::WidgetId,
    widget::{FocusDirective, FocusSource, Widget},
};

/// Trait for managing focus.
pub trait FocusManager {
    /// The focused widget, if any.
    fn focused(&self) -> Option<WidgetId>;

    /// Does the widget have focus?
    fn is_focused(&self, node: WidgetId) -> bool;

    /// Is the widget on the focus path?
    fn is_in_focus_path(&self, node: WidgetId) -> bool;

    /// The focus path from the top widget down to the focused widget.
    fn focus_path(&self) -> Vec<WidgetId>;

    /// Search the subtree at `target` for the widget that would take focus,
    /// without changing anything.
    ///
    /// `target` is asked first with [`FocusSource::Direct`]. A widget that
    /// passes has its children asked in order, the first with
    /// [`FocusSource::Parent`] and later ones with [`FocusSource::Kin`]. The
    /// first widget in pre-order that accepts wins.
    fn find_focus(&self, target: WidgetId) -> Result<Option<WidgetId>>;

    /// Focus `target` or the first widget below it that accepts. If nothing
    /// accepts, focus is cleared. Returns the newly focused widget.
    fn focus(&mut self, target: WidgetId) -> Result<Option<WidgetId>>;

    /// Move focus to exactly `target`, updating focus state and firing the
    /// focus hooks. Does nothing if `target` is already focused.
    fn commit_focus(&mut self, target: Option<WidgetId>) -> Result<()>;
}

/// Call a focus hook on a widget with a context for that widget.
fn fire(
    core: &mut Core,
    node: WidgetId,
    hook: fn(&mut dyn Widget, &mut CoreContext<'_>) -> Result<()>,
) -> Result<()> {
    core.with_dyn_widget_mut(node, |w, core| {
        let mut ctx = CoreContext::new(core, node);
        hook(w, &mut ctx)
    })?
}

impl FocusManager for Core {
    fn focused(&self) -> Option<WidgetId> {
        self.focus
    }

    fn is_focused(&self, node: WidgetId) -> bool {
        self.focus == Some(node)
    }

    fn is_in_focus_path(&self, node: WidgetId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.in_focus_path)
    }

    fn focus_path(&self) -> Vec<WidgetId> {
        match self.focus {
            Some(f) => {
                let mut path = self.ancestors(f);
                path.reverse();
                path
            }
            None => Vec::new(),
        }
    }

    fn find_focus(&self, target: WidgetId) -> Result<Option<WidgetId>> {
        // Frames are (node, index). An index of None asks the node itself;
        // Some(i) asks the node's i-th child.
        let mut stack: Vec<(WidgetId, Option<usize>)> = vec![(target, None)];
        while let Some(&(node, index)) = stack.last() {
            let (candidate, source) = match index {
                None => {
                    let source = if stack.len() == 1 {
                        FocusSource::Direct
                    } else {
                        FocusSource::Parent
                    };
                    (node, source)
                }
                Some(i) => {
                    let Some(&child) = self.node_ref(node)?.children.get(i) else {
                        stack.pop();
                        continue;
                    };
                    let source = if i == 0 {
                        FocusSource::Parent
                    } else {
                        FocusSource::Kin
                    };
                    (child, source)
                }
            };
            let directive = self.widget_ref(candidate)?.direct_focus(source);
            let last = stack.len() - 1;
            match directive {
                FocusDirective::Accept => return Ok(Some(candidate)),
                FocusDirective::Reject => match index {
                    None => {
                        stack.pop();
                    }
                    Some(i) => stack[last].1 = Some(i + 1),
                },
                FocusDirective::Pass => match index {
                    None => stack[last].1 = Some(0),
                    Some(i) => {
                        // Advance past the passing child first, so that
                        // once its frame is exhausted the search resumes at
                        // its next sibling.
                        stack[last].1 = Some(i + 1);
                        stack.push((candidate, Some(0)));
                    }
                },
            }
        }
        Ok(None)
    }

    fn focus(&mut self, target: WidgetId) -> Result<Option<WidgetId>> {
        if !self.node_ref(target)?.attached {
            return Err(Error::Focus(format!(
                "cannot focus detached widget {target:?}"
            )));
        }
        let found = self.find_focus(target)?;
        self.commit_focus(found)?;
        Ok(found)
    }

    fn commit_focus(&mut self, target: Option<WidgetId>) -> Result<()> {
        if self.focus == target {
            return Ok(());
        }
        let old_path = self.focus_path();
        let new_path = match target {
            Some(t) => {
                let mut p = self.ancestors(t);
                p.reverse();
                p
            }
            None => Vec::new(),
        };
        let fork = old_path
            .iter()
            .zip(&new_path)
            .take_while(|(a, b)| a == b)
            .count();

        for id in &old_path[fork..] {
            if let Some(n) = self.nodes.get_mut(*id) {
                n.in_focus_path = false;
            }
        }
        if let Some(n) = self.focus.and_then(|f| self.nodes.get_mut(f)) {
            n.has_focus = false;
        }
        for id in &new_path[fork..] {
            if let Some(n) = self.nodes.get_mut(*id) {
                n.in_focus_path = true;
            }
        }
        if let Some(n) = target.and_then(|t| self.nodes.get_mut(t)) {
            n.has_focus = true;
        }
        self.focus = target;
        debug!(
            "focus: {:?} -> {:?} (fork at depth {})",
            old_path.last(),
            target,
            fork
        );

        for id in &old_path[fork..] {
            fire(self, *id, |w, ctx| w.on_out_focus_path(ctx))?;
        }
        if let Some(old) = old_path.last() {
            fire(self, *old, |w, ctx| w.on_blur(ctx))?;
        }
        for id in &new_path[fork..] {
            fire(self, *id, |w, ctx| w.on_in_focus_path(ctx))?;
        }
        if let Some(new) = new_path.last() {
            fire(self, *new, |w, ctx| w.on_focus(ctx))?;
        }
        Ok(())
    }
}
