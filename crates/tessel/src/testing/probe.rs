use std::{
    mem,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    error::Result,
    event::key::Key,
    geom::{Position, Rectangle, Size, split_extent},
    mapping::{Mapping, MappingEntry},
    render::{Render, RenderDirective},
    style::Style,
    widget::{Context, EventOutcome, FocusDirective, FocusSource, Widget},
};

/// A shared, ordered log of "label:event" strings, for tests that check the
/// order of hooks across several widgets.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    /// Append an entry.
    pub fn push(&self, entry: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Take all entries, leaving the log empty.
    pub fn take(&self) -> Vec<String> {
        mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// A leaf widget that fills its area with one character and records what
/// happens to it.
#[derive(Debug)]
pub struct Probe {
    /// Label used in the event log.
    pub label: String,
    /// Fill character.
    pub fill: char,
    /// Answer to every focus query.
    pub directive: FocusDirective,
    /// Preferred size to report.
    pub preferred: Option<Size>,
    /// Keys that this probe handles; others are ignored.
    pub handles: Vec<Key>,
    /// Key that stops the event loop.
    pub stop_on: Option<Key>,
    /// Every render batch, in order.
    pub renders: Vec<Vec<RenderDirective>>,
    /// Every size received.
    pub sizes: Vec<Size>,
    /// Every key received, handled or not.
    pub keys: Vec<Key>,
    /// Optional shared log.
    pub log: Option<EventLog>,
}

impl Probe {
    /// A probe that rejects focus.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.into(),
            fill: label.chars().next().unwrap_or('.'),
            directive: FocusDirective::Reject,
            preferred: None,
            handles: Vec::new(),
            stop_on: None,
            renders: Vec::new(),
            sizes: Vec::new(),
            keys: Vec::new(),
            log: None,
        }
    }

    /// Answer focus queries with `directive`.
    pub fn focus(mut self, directive: FocusDirective) -> Self {
        self.directive = directive;
        self
    }

    /// A probe that accepts focus.
    pub fn focusable(self) -> Self {
        self.focus(FocusDirective::Accept)
    }

    /// Handle `key` instead of letting it bubble.
    pub fn handle(mut self, key: impl Into<Key>) -> Self {
        self.handles.push(key.into());
        self
    }

    /// Stop the event loop when `key` arrives.
    pub fn stop_on(mut self, key: impl Into<Key>) -> Self {
        self.stop_on = Some(key.into());
        self
    }

    /// Report a preferred size.
    pub fn preferred(mut self, size: Size) -> Self {
        self.preferred = Some(size);
        self
    }

    /// Record hooks into a shared log.
    pub fn log(mut self, log: &EventLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Surface rectangles covered by all render batches so far.
    pub fn rendered_rects(&self) -> Vec<Rectangle> {
        self.renders
            .iter()
            .flatten()
            .map(RenderDirective::surface_rect)
            .collect()
    }

    /// Record a hook in the shared log.
    fn note(&self, event: &str) {
        if let Some(log) = &self.log {
            log.push(format!("{}:{}", self.label, event));
        }
    }
}

impl Widget for Probe {
    fn preferred_size(&self) -> Option<Size> {
        self.preferred
    }

    fn resize(&mut self, size: Size, _ctx: &mut dyn Context) -> Result<()> {
        self.sizes.push(size);
        Ok(())
    }

    fn render(&mut self, directives: &[RenderDirective], r: &mut Render) -> Result<()> {
        self.renders.push(directives.to_vec());
        for d in directives {
            r.fill_all(d, self.fill, Style::default())?;
        }
        Ok(())
    }

    fn direct_focus(&self, source: FocusSource) -> FocusDirective {
        if let Some(log) = &self.log {
            log.push(format!("{}:ask:{:?}", self.label, source));
        }
        self.directive
    }

    fn on_focus(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.note("focus");
        Ok(())
    }

    fn on_blur(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.note("blur");
        Ok(())
    }

    fn on_in_focus_path(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.note("in");
        Ok(())
    }

    fn on_out_focus_path(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.note("out");
        Ok(())
    }

    fn on_keypress(&mut self, key: Key, ctx: &mut dyn Context) -> Result<EventOutcome> {
        self.keys.push(key);
        self.note(&format!("key:{key}"));
        if self.stop_on == Some(key) {
            ctx.stop();
            return Ok(EventOutcome::Handle);
        }
        Ok(if self.handles.contains(&key) {
            EventOutcome::Handle
        } else {
            EventOutcome::Ignore
        })
    }

    fn name(&self) -> String {
        format!("probe_{}", self.label)
    }
}

/// A container that splits its area evenly among its children, side by side
/// or stacked, and passes focus to them.
#[derive(Debug)]
pub struct Split {
    /// Lay children out left to right rather than top to bottom.
    pub horizontal: bool,
    /// Answer to focus queries.
    pub directive: FocusDirective,
    /// Every size received.
    pub sizes: Vec<Size>,
    /// Optional shared log.
    pub log: Option<EventLog>,
}

impl Split {
    /// Children side by side.
    pub fn horizontal() -> Self {
        Self {
            horizontal: true,
            directive: FocusDirective::Pass,
            sizes: Vec::new(),
            log: None,
        }
    }

    /// Children stacked top to bottom.
    pub fn vertical() -> Self {
        Self {
            horizontal: false,
            ..Self::horizontal()
        }
    }

    /// Answer focus queries with `directive`.
    pub fn focus(mut self, directive: FocusDirective) -> Self {
        self.directive = directive;
        self
    }

    /// Record hooks into a shared log.
    pub fn log(mut self, log: &EventLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Record a hook in the shared log.
    fn note(&self, event: &str) {
        if let Some(log) = &self.log {
            log.push(format!("split:{event}"));
        }
    }
}

impl Widget for Split {
    fn resize(&mut self, size: Size, ctx: &mut dyn Context) -> Result<()> {
        self.sizes.push(size);
        let children = ctx.children();
        if children.is_empty() {
            ctx.set_mapping(None);
            return Ok(());
        }
        let extent = if self.horizontal { size.width } else { size.height };
        let parts = split_extent(extent, children.len() as u32)?;
        let mut mapping = Mapping::new();
        let mut offset = 0i32;
        for (child, part) in children.iter().zip(parts) {
            let (rect, child_size) = if self.horizontal {
                (
                    Rectangle::new(0, offset, size.height, part),
                    Size::new(size.height, part),
                )
            } else {
                (
                    Rectangle::new(offset, 0, part, size.width),
                    Size::new(part, size.width),
                )
            };
            ctx.set_child_size(*child, child_size)?;
            if !rect.is_empty() {
                mapping.push(MappingEntry::new(rect, Position::zero(), *child));
            }
            offset += part as i32;
        }
        ctx.set_mapping(Some(mapping));
        Ok(())
    }

    fn direct_focus(&self, source: FocusSource) -> FocusDirective {
        if let Some(log) = &self.log {
            log.push(format!("split:ask:{source:?}"));
        }
        self.directive
    }

    fn on_in_focus_path(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.note("in");
        Ok(())
    }

    fn on_out_focus_path(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.note("out");
        Ok(())
    }

    fn on_keypress(&mut self, key: Key, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        self.note(&format!("key:{key}"));
        Ok(EventOutcome::Ignore)
    }
}
