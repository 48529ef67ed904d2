//! Integration tests for screen resizes and lazy mapping recomputation.

#[cfg(test)]
mod tests {
    use tessel::{
        Core,
        error::Result,
        geom::{Rectangle, Size},
        testing::{Probe, Split, TestSurface},
    };

    #[test]
    fn resize_recomputes_once() -> Result<()> {
        let mut core = Core::new(Size::new(24, 80));
        let mut surface = TestSurface::new(Size::new(24, 80));
        let split = core.add(Split::horizontal());
        let a = core.add(Probe::new("a"));
        let b = core.add(Probe::new("b"));
        core.attach(split, a)?;
        core.attach(split, b)?;
        core.set_top_widget(split)?;
        core.render_invalidated(&mut surface)?;
        let generation = core.mapping_generation();
        core.with_widget_mut(a, |p, _| p.renders.clear())?;
        core.with_widget_mut(b, |p, _| p.renders.clear())?;

        core.resize_screen(Size::new(30, 100))?;
        assert_eq!(core.mapping_generation(), generation + 1);
        assert!(!core.mapping_dirty());
        assert_eq!(core.pending().area(), 30 * 100);
        assert_eq!(core.pending().len(), 2);

        core.render_invalidated(&mut surface)?;
        assert_eq!(core.mapping_generation(), generation + 1);
        assert_eq!(core.size(a), Some(Size::new(30, 50)));
        assert_eq!(
            core.with_widget(a, Probe::rendered_rects)?,
            vec![Rectangle::new(0, 0, 30, 50)]
        );
        assert_eq!(
            core.with_widget(b, Probe::rendered_rects)?,
            vec![Rectangle::new(0, 50, 30, 50)]
        );
        Ok(())
    }

    #[test]
    fn mapping_is_lazy() -> Result<()> {
        let mut core = Core::new(Size::new(4, 4));
        let mut surface = TestSurface::new(Size::new(4, 4));
        let split = core.add(Split::vertical());
        core.set_top_widget(split)?;
        core.render_invalidated(&mut surface)?;
        let generation = core.mapping_generation();

        // Structural changes only mark the mapping dirty; it is recomputed
        // once, on next use.
        core.invalidate_mapping();
        core.set_mapping(split, None)?;
        core.invalidate_mapping();
        assert!(core.mapping_dirty());
        assert_eq!(core.mapping_generation(), generation);
        core.render_invalidated(&mut surface)?;
        assert_eq!(core.mapping_generation(), generation + 1);

        // Attaching invalidates the parent, which brings the mapping up to
        // date straight away.
        let a = core.add(Probe::new("a"));
        let b = core.add(Probe::new("b"));
        core.attach(split, a)?;
        assert_eq!(core.mapping_generation(), generation + 2);
        core.attach(split, b)?;
        assert_eq!(core.mapping_generation(), generation + 3);
        core.render_invalidated(&mut surface)?;
        assert_eq!(core.mapping_generation(), generation + 3);
        assert_eq!(surface.lines(), vec!["aaaa", "aaaa", "bbbb", "bbbb"]);
        Ok(())
    }

    #[test]
    fn zero_sized_children() -> Result<()> {
        let mut core = Core::new(Size::new(1, 10));
        let mut surface = TestSurface::new(Size::new(1, 10));
        let split = core.add(Split::vertical());
        let a = core.add(Probe::new("a"));
        let b = core.add(Probe::new("b"));
        core.attach(split, a)?;
        core.attach(split, b)?;
        core.set_top_widget(split)?;
        core.render_invalidated(&mut surface)?;
        assert_eq!(core.size(b), Some(Size::new(0, 10)));
        assert_eq!(core.with_widget(b, |p| p.renders.len())?, 0);
        assert_eq!(surface.lines(), vec!["aaaaaaaaaa"]);
        Ok(())
    }
}
