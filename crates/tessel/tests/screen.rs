//! Integration tests for the screen event loop.

#[cfg(test)]
mod tests {
    use tessel::{
        CtrlCBehavior, Event, Key, KeyCode, Screen, ScreenOptions, TypedId,
        error::Result,
        event::key::Ctrl,
        geom::Size,
        testing::{Probe, TestSurface},
    };

    fn screen(options: ScreenOptions) -> Result<(Screen, TestSurface, TypedId<Probe>)> {
        let surface = TestSurface::new(Size::new(3, 6));
        let mut screen = Screen::with_options(surface.clone(), options);
        let p = screen.core.add(Probe::new("p").focusable().stop_on('q'));
        screen.set_top_widget(p)?;
        Ok((screen, surface, p))
    }

    fn keys(screen: &Screen, p: TypedId<Probe>) -> Result<Vec<Key>> {
        screen.core.with_widget(p, |p| p.keys.clone())
    }

    #[test]
    fn run_until_stopped() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        surface.push_chars("xqz");
        assert_eq!(screen.run()?, 0);
        assert_eq!(keys(&screen, p)?, vec![Key::from('x'), Key::from('q')]);
        assert_eq!(surface.lines(), vec!["pppppp"; 3]);
        assert!(surface.flushes() >= 1);
        assert!(!surface.is_started());
        Ok(())
    }

    #[test]
    fn input_closed() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        surface.push_key('a');
        assert_eq!(screen.run()?, 0);
        assert_eq!(keys(&screen, p)?, vec![Key::from('a')]);
        assert!(!screen.core.is_running());
        Ok(())
    }

    #[test]
    fn escape_folds_into_alt() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        surface.push_key(KeyCode::Esc);
        surface.push_key('f');
        surface.push_key(KeyCode::Esc);
        assert_eq!(screen.run()?, 0);
        assert_eq!(
            keys(&screen, p)?,
            vec![Key::from('f').with_alt(), Key::from(KeyCode::Esc)]
        );
        Ok(())
    }

    #[test]
    fn escape_then_resize() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        surface.push_key(KeyCode::Esc);
        surface.resize(Size::new(2, 4));
        assert_eq!(screen.run()?, 0);
        assert_eq!(keys(&screen, p)?, vec![Key::from(KeyCode::Esc)]);
        assert_eq!(screen.size(), Size::new(2, 4));
        assert_eq!(surface.lines(), vec!["pppp"; 2]);
        Ok(())
    }

    #[test]
    fn resize_event() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        surface.resize(Size::new(4, 8));
        assert_eq!(screen.run()?, 0);
        assert_eq!(screen.core.size(p), Some(Size::new(4, 8)));
        assert_eq!(
            screen.core.with_widget(p, |p| p.sizes.last().copied())?,
            Some(Size::new(4, 8))
        );
        assert_eq!(surface.lines(), vec!["pppppppp"; 4]);
        Ok(())
    }

    #[test]
    fn ctrl_c_exits() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        surface.push_key(Ctrl + 'c');
        surface.push_key('a');
        assert_eq!(screen.run()?, 130);
        assert!(keys(&screen, p)?.is_empty());
        assert!(!surface.is_started());
        Ok(())
    }

    #[test]
    fn ctrl_c_delivered() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions {
            ctrl_c: CtrlCBehavior::Deliver,
            ..ScreenOptions::default()
        })?;
        surface.push_key(Ctrl + 'c');
        assert_eq!(screen.run()?, 0);
        assert_eq!(keys(&screen, p)?, vec![Ctrl + 'c']);
        Ok(())
    }

    #[test]
    fn handle_event_directly() -> Result<()> {
        let (mut screen, surface, p) = screen(ScreenOptions::default())?;
        assert_eq!(screen.handle_event(Event::Key('k'.into()))?, None);
        assert_eq!(keys(&screen, p)?, vec![Key::from('k')]);
        assert!(screen.render_pending()?);
        assert!(!screen.render_pending()?);
        assert_eq!(surface.flushes(), 1);
        Ok(())
    }
}
