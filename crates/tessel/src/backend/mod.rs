//! Display surfaces.
//!
//! A [`Surface`] is the raw character grid the screen draws on and the
//! source of input events. The core never talks to a terminal directly.

/// Crossterm surface implementation.
pub mod crossterm;

use std::{iter, time::Duration};

use crate::{
    error::Result,
    event::Event,
    geom::{Position, Size},
    style::Style,
};

/// How long [`Surface::read_event`] may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Wait until an event arrives.
    Blocking,
    /// Wait at most this long, returning `None` on timeout.
    Poll(Duration),
}

/// A character-grid device with an input queue.
///
/// Positions are surface coordinates. Surfaces count one cell per `char`;
/// wide glyphs are the writer's concern. Writes that reach past the edge of
/// the surface may be truncated by the implementation; [`crate::Render`]
/// never issues them.
pub trait Surface {
    /// Current dimensions of the grid.
    fn size(&self) -> Size;

    /// Write a run of text starting at `pos`.
    fn write_run(&mut self, pos: Position, text: &str, style: Style) -> Result<()>;

    /// Write `len` copies of `ch` starting at `pos`.
    fn fill(&mut self, pos: Position, len: u32, ch: char, style: Style) -> Result<()> {
        let run: String = iter::repeat_n(ch, len as usize).collect();
        self.write_run(pos, &run, style)
    }

    /// Read the next input event. With [`ReadMode::Blocking`] this only
    /// returns `None` if the implementation never blocks.
    fn read_event(&mut self, mode: ReadMode) -> Result<Option<Event>>;

    /// Push pending output to the device.
    fn flush(&mut self) -> Result<()>;

    /// Acquire the device.
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the device, restoring its original state.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    /// Does the device refuse to write the bottom-right cell? Terminals
    /// scroll when it is written.
    fn guards_last_cell(&self) -> bool {
        false
    }
}
