//! Integration tests for key dispatch along the focus path.

#[cfg(test)]
mod tests {
    use tessel::{
        Core, EventOutcome, FocusDirective, FocusManager, Key, KeyCode,
        error::Result,
        event::key::{Alt, Ctrl},
        geom::Size,
        testing::{EventLog, Probe, Split},
    };

    #[test]
    fn keys_bubble() -> Result<()> {
        let log = EventLog::default();
        let mut core = Core::new(Size::new(4, 8));
        let split = core.add(Split::horizontal().log(&log));
        let a = core.add(Probe::new("a").focusable().handle('x').log(&log));
        core.attach(split, a)?;
        core.set_top_widget(split)?;
        log.take();

        assert_eq!(core.dispatch_key('x'.into())?, EventOutcome::Handle);
        assert_eq!(log.take(), vec!["a:key:x"]);

        assert_eq!(core.dispatch_key(Ctrl + 'y')?, EventOutcome::Ignore);
        assert_eq!(log.take(), vec!["a:key:ctrl-y", "split:key:ctrl-y"]);
        Ok(())
    }

    #[test]
    fn handled_by_ancestor() -> Result<()> {
        let mut core = Core::new(Size::new(4, 8));
        let outer = core.add(
            Probe::new("outer")
                .focus(FocusDirective::Pass)
                .handle(KeyCode::Enter),
        );
        let inner = core.add(Probe::new("inner").focusable());
        core.attach(outer, inner)?;
        core.set_top_widget(outer)?;
        assert_eq!(core.focused(), Some(inner.id()));

        assert_eq!(core.dispatch_key(KeyCode::Enter.into())?, EventOutcome::Handle);
        let enter = vec![Key::from(KeyCode::Enter)];
        assert_eq!(core.with_widget(inner, |p| p.keys.clone())?, enter);
        assert_eq!(core.with_widget(outer, |p| p.keys.clone())?, enter);
        Ok(())
    }

    #[test]
    fn no_focus_no_dispatch() -> Result<()> {
        let mut core = Core::new(Size::new(4, 8));
        let a = core.add(Probe::new("a"));
        core.set_top_widget(a)?;
        assert_eq!(core.dispatch_key(Alt + 'q')?, EventOutcome::Ignore);
        assert!(core.with_widget(a, |p| p.keys.is_empty())?);
        Ok(())
    }
}
