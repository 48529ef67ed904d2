use std::{panic, time::Duration};

use color_backtrace::{BacktracePrinter, default_output_stream};
use scopeguard::guard;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    backend::{
        ReadMode, Surface,
        crossterm::{CrosstermSurface, restore_terminal},
    },
    core::{Core, FocusManager},
    dump::dump,
    error::Result,
    event::{
        Event,
        key::{Key, KeyCode},
    },
    geom::Size,
    id::WidgetId,
    mapping::WidgetRect,
};

/// Ctrl+C handling policy for the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtrlCBehavior {
    /// Stop the event loop with status 130.
    #[default]
    Exit,
    /// Dump the widget tree and stop the event loop with status 130.
    DumpTreeAndExit,
    /// Deliver Ctrl+C to widgets like any other key.
    Deliver,
}

/// Options for configuring the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScreenOptions {
    /// How long to wait after Esc for a key to combine it with, in
    /// milliseconds.
    pub escape_delay: u64,
    /// Install a panic hook that restores the terminal before printing a
    /// backtrace.
    pub install_panic_hook: bool,
    /// Configure how Ctrl+C is handled.
    pub ctrl_c: CtrlCBehavior,
}

impl ScreenOptions {
    /// Construct options that dump the widget tree before exiting on Ctrl+C.
    pub fn ctrlc_dump() -> Self {
        Self {
            ctrl_c: CtrlCBehavior::DumpTreeAndExit,
            ..Self::default()
        }
    }

    /// The escape delay as a duration.
    pub fn escape_delay(&self) -> Duration {
        Duration::from_millis(self.escape_delay)
    }
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            escape_delay: 25,
            install_panic_hook: false,
            ctrl_c: CtrlCBehavior::Exit,
        }
    }
}

/// Exit status used when the loop is interrupted with Ctrl+C.
const INTERRUPTED: i32 = 130;

/// The coordinator: owns the surface and the core, and runs the event loop.
pub struct Screen {
    /// Widget arena and composition state.
    pub core: Core,
    /// Display surface.
    surface: Box<dyn Surface>,
    /// Event loop configuration.
    options: ScreenOptions,
}

impl Screen {
    /// Construct a screen on a surface with default options.
    pub fn new(surface: impl Surface + 'static) -> Self {
        Self::with_options(surface, ScreenOptions::default())
    }

    /// Construct a screen on a surface.
    pub fn with_options(surface: impl Surface + 'static, options: ScreenOptions) -> Self {
        let core = Core::new(surface.size());
        Self {
            core,
            surface: Box::new(surface),
            options,
        }
    }

    /// Construct a screen on the controlling terminal.
    pub fn crossterm(options: ScreenOptions) -> Result<Self> {
        Ok(Self::with_options(CrosstermSurface::new()?, options))
    }

    /// The event loop configuration.
    pub fn options(&self) -> &ScreenOptions {
        &self.options
    }

    /// Current screen dimensions.
    pub fn size(&self) -> Size {
        self.core.screen_size()
    }

    /// Make `widget` cover the whole screen.
    pub fn set_top_widget(&mut self, widget: impl Into<WidgetId>) -> Result<()> {
        self.core.set_top_widget(widget)
    }

    /// Invalidate widget-local regions; see [`Core::invalidate`].
    pub fn invalidate(&mut self, regions: &[WidgetRect], mapped: bool) {
        self.core.invalidate(regions, mapped);
    }

    /// Signal that the screen mapping must be recomputed.
    pub fn invalidate_mapping(&mut self) {
        self.core.invalidate_mapping();
    }

    /// Focus `widget` or the first widget below it that accepts.
    pub fn focus(&mut self, widget: impl Into<WidgetId>) -> Result<Option<WidgetId>> {
        self.core.focus(widget.into())
    }

    /// Render pending damage and flush the surface if anything was drawn.
    pub fn render_pending(&mut self) -> Result<bool> {
        let rendered = self.core.render_invalidated(self.surface.as_mut())?;
        if rendered {
            self.surface.flush()?;
        }
        Ok(rendered)
    }

    /// Run the event loop until a widget stops it or input ends. Returns
    /// the exit status: 0 normally, 130 on Ctrl+C.
    pub fn run(&mut self) -> Result<i32> {
        self.surface.start()?;
        let _panic_hook = if self.options.install_panic_hook {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(|pi| {
                restore_terminal();
                #[allow(unused_must_use)]
                {
                    BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream());
                }
            }));
            Some(guard(previous, |hook| {
                panic::set_hook(hook);
            }))
        } else {
            None
        };

        info!("event loop starting");
        let result = self.event_loop();
        let stopped = self.surface.stop();
        info!("event loop finished: {:?}", result);
        let code = result?;
        stopped?;
        Ok(code)
    }

    /// Render, read, dispatch.
    fn event_loop(&mut self) -> Result<i32> {
        let size = self.surface.size();
        if size != self.core.screen_size() {
            self.core.resize_screen(size)?;
        }
        self.core.running = true;
        while self.core.is_running() {
            self.render_pending()?;
            let Some(event) = self.surface.read_event(ReadMode::Blocking)? else {
                continue;
            };
            if let Some(code) = self.handle_event(event)? {
                self.core.stop();
                return Ok(code);
            }
        }
        Ok(0)
    }

    /// Process one event. Returns an exit status if the loop must end
    /// immediately.
    pub fn handle_event(&mut self, event: Event) -> Result<Option<i32>> {
        match event {
            Event::Key(k) if k.mods.ctrl && k.key == KeyCode::Char('c') => {
                if self.options.ctrl_c == CtrlCBehavior::Deliver {
                    self.core.dispatch_key(k)?;
                    return Ok(None);
                }
                if self.options.ctrl_c == CtrlCBehavior::DumpTreeAndExit {
                    self.surface.stop()?;
                    eprintln!("\nCtrl+C pressed - widget tree dump:");
                    match dump(&self.core) {
                        Ok(s) => eprintln!("{s}"),
                        Err(e) => eprintln!("Failed to dump widget tree: {e}"),
                    }
                }
                return Ok(Some(INTERRUPTED));
            }
            Event::Key(k) if k == KeyCode::Esc => {
                // An escape prefix followed quickly by a key is an Alt chord.
                match self
                    .surface
                    .read_event(ReadMode::Poll(self.options.escape_delay()))?
                {
                    Some(Event::Key(next)) => {
                        self.core.dispatch_key(next.with_alt())?;
                    }
                    Some(other) => {
                        self.core.dispatch_key(k)?;
                        return self.handle_event(other);
                    }
                    None => {
                        self.core.dispatch_key(k)?;
                    }
                }
            }
            Event::Key(k) => {
                self.core.dispatch_key(k)?;
            }
            Event::Resize(size) => {
                self.core.resize_screen(size)?;
            }
            Event::Closed => {
                debug!("input closed");
                self.core.stop();
            }
        }
        Ok(None)
    }

    /// Deliver a keystroke directly, bypassing escape folding.
    pub fn key(&mut self, k: impl Into<Key>) -> Result<()> {
        self.core.dispatch_key(k.into()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::result::Result as StdResult;

    use super::*;

    #[test]
    fn options_from_toml() -> StdResult<(), toml::de::Error> {
        let o: ScreenOptions = toml::from_str("")?;
        assert_eq!(o, ScreenOptions::default());
        assert_eq!(o.escape_delay(), Duration::from_millis(25));

        let o: ScreenOptions = toml::from_str(
            r#"
            escape_delay = 100
            ctrl_c = "dump_tree_and_exit"
            "#,
        )?;
        assert_eq!(o.escape_delay, 100);
        assert_eq!(o.ctrl_c, CtrlCBehavior::DumpTreeAndExit);
        assert!(!o.install_panic_hook);
        assert_eq!(ScreenOptions::ctrlc_dump().ctrl_c, o.ctrl_c);
        Ok(())
    }
}
