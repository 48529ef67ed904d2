use std::fmt;

use super::{Position, Size};

/// A rectangle on the grid: a top-left position plus a size. A rectangle is
/// non-empty iff both its height and width are positive; operations that can
/// produce an empty overlap report it as `None` rather than as a zero-sized
/// rectangle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rectangle {
    /// Top row.
    pub row: i32,
    /// Left column.
    pub column: i32,
    /// Number of rows.
    pub height: u32,
    /// Number of columns.
    pub width: u32,
}

impl Rectangle {
    /// Construct a new rectangle.
    pub const fn new(row: i32, column: i32, height: u32, width: u32) -> Self {
        Self {
            row,
            column,
            height,
            width,
        }
    }

    /// Construct a rectangle from a position and a size.
    pub const fn from_parts(pos: Position, size: Size) -> Self {
        Self::new(pos.row, pos.column, size.height, size.width)
    }

    /// The top-left corner.
    pub fn pos(&self) -> Position {
        Position::new(self.row, self.column)
    }

    /// The dimensions of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.height, self.width)
    }

    /// One past the last row, saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        self.row.saturating_add_unsigned(self.height)
    }

    /// One past the last column, saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.column.saturating_add_unsigned(self.width)
    }

    /// Number of cells covered.
    pub fn area(&self) -> u64 {
        self.size().area()
    }

    /// True if the rectangle covers no cells.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Move the rectangle by an offset, keeping its size.
    pub fn translate(&self, by: Position) -> Self {
        Self::from_parts(self.pos() + by, self.size())
    }

    /// Return the same-sized rectangle with its top-left corner at `pos`.
    pub fn at(&self, pos: Position) -> Self {
        Self::from_parts(pos, self.size())
    }

    /// Does this rectangle contain the cell at `p`?
    pub fn contains(&self, p: Position) -> bool {
        p.row >= self.row && p.row < self.bottom() && p.column >= self.column && p.column < self.right()
    }

    /// Does this rectangle completely enclose `other`? Empty rectangles are
    /// enclosed by everything.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.is_empty()
            || (other.row >= self.row
                && other.bottom() <= self.bottom()
                && other.column >= self.column
                && other.right() <= self.right())
    }

    /// The largest rectangle contained in both `self` and `other`, or `None`
    /// if they overlap in neither a row nor a column.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let top = self.row.max(other.row);
        let bottom = self.bottom().min(other.bottom());
        if bottom <= top {
            return None;
        }
        let left = self.column.max(other.column);
        let right = self.right().min(other.right());
        if right <= left {
            return None;
        }
        Some(Self::new(
            top,
            left,
            bottom.abs_diff(top),
            right.abs_diff(left),
        ))
    }

    /// Split this rectangle into disjoint pieces such that, if `other`
    /// intersects it, the intersection is among them.
    ///
    /// If `other` is strictly inside this rectangle there are five pieces:
    ///
    /// ```text
    /// +--+---+-----+
    /// |  1   |     |
    /// +--+---+     |
    /// |  |   |  2  |
    /// |4 | 5 |     |
    /// |  +---+-----+
    /// |  |   3     |
    /// +--+---------+
    /// ```
    ///
    /// Pieces are returned in the order top, right, bottom, left, followed by
    /// the intersection. Empty pieces are omitted. If the rectangles are
    /// disjoint, the result is `[self]`.
    pub fn refine(&self, other: &Self) -> Vec<Self> {
        let Some(isec) = self.intersect(other) else {
            return vec![*self];
        };
        let top = Self::new(
            self.row,
            self.column,
            isec.row.abs_diff(self.row),
            isec.right().abs_diff(self.column),
        );
        let right = Self::new(
            self.row,
            isec.right(),
            isec.bottom().abs_diff(self.row),
            self.width - top.width,
        );
        let left = Self::new(
            isec.row,
            self.column,
            self.height - top.height,
            isec.column.abs_diff(self.column),
        );
        let bottom = Self::new(
            isec.bottom(),
            isec.column,
            self.height - right.height,
            self.width - left.width,
        );
        [top, right, bottom, left, isec]
            .into_iter()
            .filter(|r| !r.is_empty())
            .collect()
    }
}

impl From<(i32, i32, u32, u32)> for Rectangle {
    fn from(v: (i32, i32, u32, u32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}×{}",
            self.row, self.column, self.height, self.width
        )
    }
}
