//! Leaf widgets and containers built on the tessel core.

#![warn(missing_docs)]

/// Off-screen buffered widget.
pub mod buffered;
/// Constant character fill.
mod fill;
/// One-cell border around a child.
pub mod frame;
/// One-line text label.
mod label;
/// Horizontal and vertical stacks.
pub mod stack;
/// Off-screen cell grid.
pub mod termbuf;

pub use buffered::{Buffered, Paint};
pub use fill::Fill;
pub use frame::Frame;
pub use label::Label;
pub use stack::{Direction, Stack};
pub use termbuf::TermBuf;
