use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::{geom, id::WidgetId};

/// Result type for tessel operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("focus: {0}")]
    /// Focus-related failure.
    Focus(String),
    #[error("render: {0}")]
    /// Rendering or terminal output failure.
    Render(String),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("runloop: {0}")]
    /// Run loop failure.
    RunLoop(String),
    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),
    /// The widget id does not name a node in the arena.
    #[error("widget not found: {0:?}")]
    NodeNotFound(WidgetId),
    /// The widget is already checked out of its slot, which means a widget
    /// method re-entered itself.
    #[error("widget re-entered: {0:?}")]
    ReentrantWidget(WidgetId),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Render(e.to_string())
    }
}
