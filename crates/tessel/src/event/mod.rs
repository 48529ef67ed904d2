//! Input events delivered by a surface.

/// Keyboard primitives.
pub mod key;

use crate::geom::Size;

/// An input event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Event {
    /// A keystroke.
    Key(key::Key),
    /// The surface changed size.
    Resize(Size),
    /// The input source is exhausted and no further events will arrive.
    Closed,
}

impl From<key::Key> for Event {
    fn from(k: key::Key) -> Self {
        Self::Key(k)
    }
}
