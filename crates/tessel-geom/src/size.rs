use std::fmt;

use super::{Position, Rectangle};

/// A `Size` has a height and a width but no location. `(0, 0)` is valid and
/// has no area.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Size {
    /// Number of rows.
    pub height: u32,
    /// Number of columns.
    pub width: u32,
}

impl Size {
    /// Construct a new size.
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// The area of this size.
    pub fn area(&self) -> u64 {
        u64::from(self.height) * u64::from(self.width)
    }

    /// True if this size covers no cells.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Return a `Rectangle` with these dimensions located at the origin.
    pub fn rect(&self) -> Rectangle {
        Rectangle::from_parts(Position::zero(), *self)
    }

    /// True if this size can enclose `other` in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.height >= other.height && self.width >= other.width
    }

    /// Componentwise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self {
            height: self.height.max(other.height),
            width: self.width.max(other.width),
        }
    }

    /// Componentwise minimum.
    pub fn min(&self, other: Self) -> Self {
        Self {
            height: self.height.min(other.height),
            width: self.width.min(other.width),
        }
    }
}

impl From<Rectangle> for Size {
    fn from(r: Rectangle) -> Self {
        r.size()
    }
}

impl From<(u32, u32)> for Size {
    fn from(v: (u32, u32)) -> Self {
        Self {
            height: v.0,
            width: v.1,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.height, self.width)
    }
}
