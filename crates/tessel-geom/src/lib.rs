//! Geometry primitives for tessel: grid positions, sizes and rectangles.

#![warn(missing_docs)]

/// Error types for geometry operations.
mod error;
/// Signed row/column offsets.
mod position;
/// Rectangle operations.
mod rectangle;
/// Height/width size type.
mod size;

pub use error::{Error, Result};
pub use position::Position;
pub use rectangle::Rectangle;
pub use size::Size;

/// Split a length into `n` sections, as evenly as possible. Earlier sections
/// absorb the remainder.
pub fn split_extent(len: u32, n: u32) -> Result<Vec<u32>> {
    if n == 0 {
        return Err(Error::Geometry("divide by zero".into()));
    }
    let w = len / n;
    let rem = len % n;
    Ok((0..n).map(|i| if i < rem { w + 1 } else { w }).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split() -> Result<()> {
        assert_eq!(split_extent(10, 3)?, vec![4, 3, 3]);
        assert_eq!(split_extent(2, 4)?, vec![1, 1, 0, 0]);
        assert_eq!(split_extent(0, 1)?, vec![0]);
        assert!(split_extent(5, 0).is_err());
        Ok(())
    }
}
