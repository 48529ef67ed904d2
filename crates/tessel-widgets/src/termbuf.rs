use tessel::{
    geom::{Position, Rectangle, Size},
    style::Style,
};

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Glyph.
    pub ch: char,
    /// Style of the glyph.
    pub style: Style,
}

/// An off-screen grid of styled cells.
#[derive(Debug, Clone)]
pub struct TermBuf {
    /// Grid dimensions.
    size: Size,
    /// Row-major cell storage.
    cells: Vec<Cell>,
}

impl TermBuf {
    /// Construct a buffer filled with `ch`.
    pub fn new(size: Size, ch: char, style: Style) -> Self {
        Self {
            size,
            cells: vec![Cell { ch, style }; size.area() as usize],
        }
    }

    /// Construct a blank buffer.
    pub fn blank(size: Size) -> Self {
        Self::new(size, ' ', Style::default())
    }

    /// Grid dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The rectangle covering the buffer.
    pub fn rect(&self) -> Rectangle {
        self.size.rect()
    }

    /// Storage index of a position, if it is inside the buffer.
    fn index(&self, p: Position) -> Option<usize> {
        if !self.rect().contains(p) {
            return None;
        }
        Some(p.row as usize * self.size.width as usize + p.column as usize)
    }

    /// The cell at `p`.
    pub fn get(&self, p: Position) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Set one cell. Positions outside the buffer are ignored.
    pub fn put(&mut self, p: Position, ch: char, style: Style) {
        if let Some(i) = self.index(p) {
            self.cells[i] = Cell { ch, style };
        }
    }

    /// Fill a rectangle, clipped to the buffer.
    pub fn fill(&mut self, r: Rectangle, ch: char, style: Style) {
        let Some(r) = r.intersect(&self.rect()) else {
            return;
        };
        for row in r.row..r.bottom() {
            for column in r.column..r.right() {
                self.put(Position::new(row, column), ch, style);
            }
        }
    }

    /// Write text along a row starting at `p`, clipped to the buffer.
    pub fn text(&mut self, p: Position, txt: &str, style: Style) {
        for (i, ch) in txt.chars().enumerate() {
            self.put(Position::new(p.row, p.column + i as i32), ch, style);
        }
    }

    /// The cells of part of a row, grouped into runs of equal style.
    pub fn runs(&self, row: i32, columns: (i32, i32)) -> Vec<(i32, String, Style)> {
        let mut runs: Vec<(i32, String, Style)> = Vec::new();
        for column in columns.0..columns.1 {
            let Some(cell) = self.get(Position::new(row, column)) else {
                continue;
            };
            match runs.last_mut() {
                Some((start, text, style))
                    if *style == cell.style && *start + text.chars().count() as i32 == column =>
                {
                    text.push(cell.ch);
                }
                _ => runs.push((column, cell.ch.to_string(), cell.style)),
            }
        }
        runs
    }

    /// The glyphs of one row.
    pub fn row_text(&self, row: i32) -> String {
        self.runs(row, (0, self.size.width as i32))
            .into_iter()
            .map(|(_, t, _)| t)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_writes() {
        let mut b = TermBuf::blank(Size::new(2, 4));
        b.text(Position::new(0, 2), "abc", Style::default());
        b.fill(Rectangle::new(1, -1, 5, 2), '#', Style::default());
        b.put(Position::new(-1, 0), 'x', Style::default());
        assert_eq!(b.row_text(0), "  ab");
        assert_eq!(b.row_text(1), "#   ");
        assert_eq!(b.get(Position::new(2, 0)), None);
    }

    #[test]
    fn runs_split_on_style() {
        let mut b = TermBuf::blank(Size::new(1, 5));
        b.text(Position::new(0, 1), "ab", Style::default().bold());
        let runs = b.runs(0, (0, 5));
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0], (0, " ".to_string(), Style::default()));
        assert_eq!(runs[1], (1, "ab".to_string(), Style::default().bold()));
        assert_eq!(runs[2], (3, "  ".to_string(), Style::default()));
    }
}
