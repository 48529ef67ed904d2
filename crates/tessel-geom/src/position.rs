use std::{
    fmt,
    ops::{Add, Neg, Sub},
};

/// A signed offset on the grid, in rows and columns. Positions are used both
/// for absolute cell locations and for offsets between them, so they may be
/// negative.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Position {
    /// Row offset.
    pub row: i32,
    /// Column offset.
    pub column: i32,
}

impl Position {
    /// Construct a new position.
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self { row: 0, column: 0 }
    }

    /// True if both coordinates are zero.
    pub fn is_zero(&self) -> bool {
        self.row == 0 && self.column == 0
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            row: self.row + other.row,
            column: self.column + other.column,
        }
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            row: self.row - other.row,
            column: self.column - other.column,
        }
    }
}

impl Neg for Position {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            row: -self.row,
            column: -self.column,
        }
    }
}

impl From<(i32, i32)> for Position {
    #[inline]
    fn from(v: (i32, i32)) -> Self {
        Self {
            row: v.0,
            column: v.1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        assert_eq!(Position::new(1, 2) - Position::new(3, 4), Position::new(-2, -2));
        assert_eq!(Position::new(1, 2) + Position::new(3, 4), Position::new(4, 6));
        assert_eq!(-Position::new(1, -2), Position::new(-1, 2));
        assert!((Position::new(3, 4) - (3, 4).into()).is_zero());
    }
}
