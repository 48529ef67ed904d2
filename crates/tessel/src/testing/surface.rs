use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use unicode_width::UnicodeWidthChar;

use crate::{
    backend::{ReadMode, Surface},
    error::Result,
    event::{Event, key::Key},
    geom::{Position, Size},
    style::Style,
};

/// Marks the cell covered by the right half of a wide character.
const WIDE_TAIL: char = '\0';

/// One call to [`Surface::write_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Surface position of the first cell.
    pub pos: Position,
    /// Text written.
    pub text: String,
    /// Style of the run.
    pub style: Style,
}

/// Shared state of a [`TestSurface`].
#[derive(Debug)]
pub struct SurfaceBuf {
    /// Grid dimensions.
    pub size: Size,
    /// Cell contents, row-major.
    pub cells: Vec<Vec<(char, Style)>>,
    /// Every run written, in order.
    pub writes: Vec<WriteRecord>,
    /// Scripted input.
    pub input: VecDeque<Event>,
    /// Number of flushes.
    pub flushes: usize,
    /// Is the surface between `start` and `stop`?
    pub started: bool,
}

impl SurfaceBuf {
    /// A blank grid.
    fn blank(size: Size) -> Vec<Vec<(char, Style)>> {
        vec![vec![(' ', Style::default()); size.width as usize]; size.height as usize]
    }
}

/// An in-memory surface. Clones share state, so a test can keep a handle
/// while the screen owns another.
///
/// A blocking read on an empty input queue returns [`Event::Closed`], which
/// stops the event loop.
#[derive(Debug, Clone)]
pub struct TestSurface {
    /// Shared grid, log and input queue.
    buf: Arc<Mutex<SurfaceBuf>>,
    /// Refuse the bottom-right cell, like a terminal.
    guard_last_cell: bool,
}

impl TestSurface {
    /// Construct a blank surface.
    pub fn new(size: Size) -> Self {
        Self {
            buf: Arc::new(Mutex::new(SurfaceBuf {
                size,
                cells: SurfaceBuf::blank(size),
                writes: Vec::new(),
                input: VecDeque::new(),
                flushes: 0,
                started: false,
            })),
            guard_last_cell: false,
        }
    }

    /// Make the surface guard its bottom-right cell.
    pub fn guard_last_cell(mut self) -> Self {
        self.guard_last_cell = true;
        self
    }

    /// Lock the shared state.
    pub fn lock(&self) -> MutexGuard<'_, SurfaceBuf> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an input event.
    pub fn push_event(&self, e: Event) {
        self.lock().input.push_back(e);
    }

    /// Queue a keystroke.
    pub fn push_key(&self, k: impl Into<Key>) {
        self.push_event(Event::Key(k.into()));
    }

    /// Queue one keystroke per character of `s`.
    pub fn push_chars(&self, s: &str) {
        for c in s.chars() {
            self.push_key(c);
        }
    }

    /// Change the grid size, blanking it, and queue a resize event.
    pub fn resize(&self, size: Size) {
        let mut buf = self.lock();
        buf.size = size;
        buf.cells = SurfaceBuf::blank(size);
        buf.input.push_back(Event::Resize(size));
    }

    /// The grid as one string per row.
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(c, _)| *c)
                    .filter(|c| *c != WIDE_TAIL)
                    .collect()
            })
            .collect()
    }

    /// The style of one cell.
    pub fn style_at(&self, pos: Position) -> Option<Style> {
        let buf = self.lock();
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.column).ok()?;
        buf.cells.get(row)?.get(col).map(|(_, s)| *s)
    }

    /// Runs written so far.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    /// Forget the write log.
    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    /// Number of flushes so far.
    pub fn flushes(&self) -> usize {
        self.lock().flushes
    }

    /// Is the surface started?
    pub fn is_started(&self) -> bool {
        self.lock().started
    }
}

impl Surface for TestSurface {
    fn size(&self) -> Size {
        self.lock().size
    }

    fn write_run(&mut self, pos: Position, text: &str, style: Style) -> Result<()> {
        let mut buf = self.lock();
        buf.writes.push(WriteRecord {
            pos,
            text: text.to_string(),
            style,
        });
        let Ok(row) = usize::try_from(pos.row) else {
            return Ok(());
        };
        let Some(line) = buf.cells.get_mut(row) else {
            return Ok(());
        };
        let start = i64::from(pos.column);
        // Wide characters cut in half by this run lose their other half.
        if let Ok(i) = usize::try_from(start)
            && i > 0
            && line.get(i).is_some_and(|(c, _)| *c == WIDE_TAIL)
        {
            line[i - 1].0 = ' ';
        }
        let mut col = start;
        for c in text.chars() {
            let w = c.width().unwrap_or(0) as i64;
            for k in 0..w {
                let Ok(i) = usize::try_from(col + k) else {
                    continue;
                };
                if let Some(cell) = line.get_mut(i) {
                    *cell = (if k == 0 { c } else { WIDE_TAIL }, style);
                }
            }
            col += w;
        }
        if let Ok(i) = usize::try_from(col)
            && line.get(i).is_some_and(|(c, _)| *c == WIDE_TAIL)
        {
            line[i].0 = ' ';
        }
        Ok(())
    }

    fn read_event(&mut self, mode: ReadMode) -> Result<Option<Event>> {
        let next = self.lock().input.pop_front();
        Ok(match mode {
            ReadMode::Blocking => Some(next.unwrap_or(Event::Closed)),
            ReadMode::Poll(_) => next,
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.lock().flushes += 1;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.lock().started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.lock().started = false;
        Ok(())
    }

    fn guards_last_cell(&self) -> bool {
        self.guard_last_cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::key::KeyCode;

    #[test]
    fn input_script() -> Result<()> {
        let mut s = TestSurface::new(Size::new(1, 1));
        s.push_chars("ab");
        s.push_key(KeyCode::Esc);
        assert_eq!(s.read_event(ReadMode::Blocking)?, Some(Event::Key('a'.into())));
        assert_eq!(s.read_event(ReadMode::Blocking)?, Some(Event::Key('b'.into())));
        assert_eq!(
            s.read_event(ReadMode::Blocking)?,
            Some(Event::Key(KeyCode::Esc.into()))
        );
        assert_eq!(s.read_event(ReadMode::Poll(Default::default()))?, None);
        assert_eq!(s.read_event(ReadMode::Blocking)?, Some(Event::Closed));
        Ok(())
    }

    #[test]
    fn writes_clip() -> Result<()> {
        let mut s = TestSurface::new(Size::new(2, 3));
        s.write_run(Position::new(0, 1), "abcd", Style::default())?;
        s.write_run(Position::new(5, 0), "zz", Style::default())?;
        assert_eq!(s.lines(), vec![" ab", "   "]);
        assert_eq!(s.writes().len(), 2);
        Ok(())
    }
}
