use std::io::{self, Stderr, Write};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor as ccursor, event as cevent, style as cstyle,
    terminal,
};

use super::{ReadMode, Surface};
use crate::{
    error::{Error, Result},
    event::{Event, key},
    geom::{Position, Size},
    style::{Color, Style},
};

/// Translate a tessel color into a crossterm color.
fn translate_color(c: Color) -> cstyle::Color {
    match c {
        Color::Reset => cstyle::Color::Reset,
        Color::Black => cstyle::Color::Black,
        Color::DarkGrey => cstyle::Color::DarkGrey,
        Color::Red => cstyle::Color::Red,
        Color::Green => cstyle::Color::Green,
        Color::Yellow => cstyle::Color::Yellow,
        Color::Blue => cstyle::Color::Blue,
        Color::Magenta => cstyle::Color::Magenta,
        Color::Cyan => cstyle::Color::Cyan,
        Color::White => cstyle::Color::White,
        Color::Grey => cstyle::Color::Grey,
        Color::Rgb { r, g, b } => cstyle::Color::Rgb { r, g, b },
    }
}

/// Map IO results into tessel errors.
fn translate_result<T>(e: io::Result<T>) -> Result<T> {
    e.map_err(|e| Error::Render(e.to_string()))
}

/// Translate crossterm key modifiers into tessel modifiers.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
    }
}

/// Translate a crossterm key code. Keys tessel does not model yield `None`.
fn translate_key_code(code: cevent::KeyCode) -> Option<key::KeyCode> {
    Some(match code {
        cevent::KeyCode::Backspace => key::KeyCode::Backspace,
        cevent::KeyCode::Enter => key::KeyCode::Enter,
        cevent::KeyCode::Left => key::KeyCode::Left,
        cevent::KeyCode::Right => key::KeyCode::Right,
        cevent::KeyCode::Up => key::KeyCode::Up,
        cevent::KeyCode::Down => key::KeyCode::Down,
        cevent::KeyCode::Home => key::KeyCode::Home,
        cevent::KeyCode::End => key::KeyCode::End,
        cevent::KeyCode::PageUp => key::KeyCode::PageUp,
        cevent::KeyCode::PageDown => key::KeyCode::PageDown,
        cevent::KeyCode::Tab => key::KeyCode::Tab,
        cevent::KeyCode::BackTab => key::KeyCode::BackTab,
        cevent::KeyCode::Delete => key::KeyCode::Delete,
        cevent::KeyCode::Insert => key::KeyCode::Insert,
        cevent::KeyCode::F(x) => key::KeyCode::F(x),
        cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
        cevent::KeyCode::Esc => key::KeyCode::Esc,
        _ => return None,
    })
}

/// Translate a crossterm event. Events tessel does not model yield `None`.
fn translate_event(e: cevent::Event) -> Option<Event> {
    match e {
        cevent::Event::Key(k) if k.kind != cevent::KeyEventKind::Release => {
            translate_key_code(k.code).map(|code| {
                Event::Key(
                    key::Key {
                        mods: translate_key_modifiers(k.modifiers),
                        key: code,
                    }
                    .normalize(),
                )
            })
        }
        cevent::Event::Resize(cols, rows) => Some(Event::Resize(Size::new(rows.into(), cols.into()))),
        _ => None,
    }
}

/// A surface drawing to the controlling terminal through crossterm.
///
/// Output goes to stderr so stdout stays free for the application.
#[derive(Debug)]
pub struct CrosstermSurface {
    /// Output handle.
    fp: Stderr,
    /// Last known terminal size.
    size: Size,
    /// Style most recently queued, to avoid re-sending unchanged styles.
    current: Option<Style>,
    /// Is the terminal in raw mode on the alternate screen?
    active: bool,
}

impl CrosstermSurface {
    /// Construct a surface sized to the current terminal.
    pub fn new() -> Result<Self> {
        let (cols, rows) = translate_result(terminal::size())?;
        Ok(Self {
            fp: io::stderr(),
            size: Size::new(rows.into(), cols.into()),
            current: None,
            active: false,
        })
    }

    /// Enter alternate screen and raw mode.
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.fp.execute(terminal::EnterAlternateScreen)?;
        self.fp.execute(ccursor::Hide)?;
        self.fp
            .execute(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    /// Leave alternate screen and restore terminal state.
    fn exit(&mut self) -> io::Result<()> {
        self.fp
            .execute(cstyle::SetAttribute(cstyle::Attribute::Reset))?;
        self.fp.execute(terminal::LeaveAlternateScreen)?;
        self.fp.execute(ccursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Queue a style change if it differs from the current one.
    fn apply_style(&mut self, s: Style) -> io::Result<()> {
        if self.current == Some(s) {
            return Ok(());
        }
        // Reset clears everything, so colors must be set after it.
        self.fp
            .queue(cstyle::SetAttribute(cstyle::Attribute::Reset))?;
        self.fp
            .queue(cstyle::SetForegroundColor(translate_color(s.fg)))?;
        self.fp
            .queue(cstyle::SetBackgroundColor(translate_color(s.bg)))?;
        if s.attrs.bold {
            self.fp.queue(cstyle::SetAttribute(cstyle::Attribute::Bold))?;
        }
        if s.attrs.dim {
            self.fp.queue(cstyle::SetAttribute(cstyle::Attribute::Dim))?;
        }
        if s.attrs.italic {
            self.fp
                .queue(cstyle::SetAttribute(cstyle::Attribute::Italic))?;
        }
        if s.attrs.underline {
            self.fp
                .queue(cstyle::SetAttribute(cstyle::Attribute::Underlined))?;
        }
        if s.attrs.reverse {
            self.fp
                .queue(cstyle::SetAttribute(cstyle::Attribute::Reverse))?;
        }
        self.current = Some(s);
        Ok(())
    }

    /// Queue a run of text at a position.
    fn text(&mut self, pos: Position, txt: &str, s: Style) -> io::Result<()> {
        if pos.row < 0 || pos.column < 0 {
            return Ok(());
        }
        self.apply_style(s)?;
        self.fp
            .queue(ccursor::MoveTo(pos.column as u16, pos.row as u16))?;
        self.fp.queue(cstyle::Print(txt))?;
        Ok(())
    }

    /// Read one event that tessel models, honouring the wait mode.
    fn next_event(&mut self, mode: ReadMode) -> io::Result<Option<Event>> {
        loop {
            if let ReadMode::Poll(timeout) = mode
                && !cevent::poll(timeout)?
            {
                return Ok(None);
            }
            let Some(event) = translate_event(cevent::read()?) else {
                if matches!(mode, ReadMode::Poll(_)) {
                    return Ok(None);
                }
                continue;
            };
            if let Event::Resize(size) = event {
                self.size = size;
            }
            return Ok(Some(event));
        }
    }
}

impl Surface for CrosstermSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn write_run(&mut self, pos: Position, text: &str, style: Style) -> Result<()> {
        translate_result(self.text(pos, text, style))
    }

    fn read_event(&mut self, mode: ReadMode) -> Result<Option<Event>> {
        self.next_event(mode).map_err(|e| {
            tracing::error!("crossterm event read error: {}", e);
            Error::RunLoop(e.to_string())
        })
    }

    fn flush(&mut self) -> Result<()> {
        translate_result(self.fp.flush())
    }

    fn start(&mut self) -> Result<()> {
        if !self.active {
            translate_result(self.enter())?;
            self.active = true;
            self.current = None;
            let (cols, rows) = translate_result(terminal::size())?;
            self.size = Size::new(rows.into(), cols.into());
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            translate_result(self.exit())?;
        }
        Ok(())
    }

    fn guards_last_cell(&self) -> bool {
        true
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Restore the terminal without a surface handle. Used from the panic hook,
/// where the surface is unreachable.
pub(crate) fn restore_terminal() {
    let mut stderr = io::stderr();
    #[allow(unused_must_use)]
    {
        crossterm::execute!(stderr, terminal::LeaveAlternateScreen, ccursor::Show);
        terminal::disable_raw_mode();
    }
}
