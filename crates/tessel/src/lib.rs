//! Tessel: a small terminal compositor.
//!
//! Tessel renders a tree of rectangular widgets onto a character grid. It
//! keeps track of which screen cells belong to which widget, redraws only
//! damaged cells, and routes keyboard focus through the tree.
//!
//! - [`Core`] owns the widget arena, the resolved screen [`Mapping`] and the
//!   pending damage.
//! - [`Widget`] is implemented by leaves and containers.
//! - [`Screen`] owns a [`Surface`] and runs the event loop.

#![warn(missing_docs)]

pub use tessel_geom as geom;

pub mod backend;
pub mod core;
/// Plain-text and coloured dumps of the widget tree.
pub mod dump;
/// Error types.
pub mod error;
pub mod event;
/// Widget identifiers.
pub mod id;
pub mod mapping;
/// Clipped drawing handle given to widgets.
pub mod render;
/// The screen coordinator and event loop.
pub mod screen;
pub mod style;
/// Test surfaces and probe widgets.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod widget;

pub use backend::{ReadMode, Surface};
pub use core::{Core, CoreContext, FocusManager};
pub use error::{Error, Result};
pub use event::{
    Event,
    key::{Key, KeyCode},
};
pub use id::{TypedId, WidgetId};
pub use mapping::{Mapping, MappingEntry, MappingLookup, WidgetRect};
pub use render::{Render, RenderDirective};
pub use screen::{CtrlCBehavior, Screen, ScreenOptions};
pub use style::{Color, Style};
pub use widget::{Context, EventOutcome, FocusDirective, FocusSource, Widget};
