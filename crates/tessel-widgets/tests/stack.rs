//! Integration tests for stack layout and focus cycling.

#[cfg(test)]
mod tests {
    use tessel::{
        Core, FocusManager, Key, KeyCode, TypedId,
        error::Result,
        geom::{Position, Size},
        testing::TestSurface,
    };
    use tessel_widgets::{Fill, Frame, Label, Stack};

    #[test]
    fn preferred_and_flexible() -> Result<()> {
        let size = Size::new(1, 10);
        let mut core = Core::new(size);
        let mut surface = TestSurface::new(size);
        let s = core.add(Stack::horizontal());
        let l = core.add(Label::new("abc"));
        let f = core.add(Fill::new("#")?);
        core.attach(s, l)?;
        core.attach(s, f)?;
        core.set_top_widget(s)?;
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.lines(), vec!["abc#######"]);
        assert_eq!(core.size(l), Some(Size::new(1, 3)));
        assert_eq!(core.size(f), Some(Size::new(1, 7)));
        Ok(())
    }

    #[test]
    fn leftover_is_blank() -> Result<()> {
        let size = Size::new(2, 10);
        let mut core = Core::new(size);
        let mut surface = TestSurface::new(size);
        // Paint the surface first so blanking is visible.
        let f = core.add(Fill::new("#")?);
        core.set_top_widget(f)?;
        core.render_invalidated(&mut surface)?;

        let s = core.add(Stack::horizontal());
        let a = core.add(Label::new("ab"));
        let b = core.add(Label::new("cd"));
        core.attach(s, a)?;
        core.attach(s, b)?;
        core.set_top_widget(s)?;
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.lines(), vec!["abcd      ", "          "]);
        Ok(())
    }

    #[test]
    fn vertical_minimums() -> Result<()> {
        let size = Size::new(5, 4);
        let mut core = Core::new(size);
        let s = core.add(Stack::vertical());
        let a = core.add(Label::new("a"));
        let f = core.add(Fill::default());
        let b = core.add(Label::new("b"));
        core.attach(s, a)?;
        core.attach(s, f)?;
        core.attach(s, b)?;
        core.set_top_widget(s)?;
        assert_eq!(core.size(a), Some(Size::new(1, 4)));
        assert_eq!(core.size(f), Some(Size::new(3, 4)));
        assert_eq!(core.size(b), Some(Size::new(1, 4)));
        Ok(())
    }

    struct Grid {
        core: Core,
        labels: Vec<TypedId<Label>>,
    }

    /// Two framed rows: [a b] and [c d], where d does not take focus.
    fn grid() -> Result<Grid> {
        let mut core = Core::new(Size::new(6, 20));
        let top = core.add(Stack::vertical());
        let mut labels = Vec::new();
        for row in [["a", "b"], ["c", "d"]] {
            let frame = core.add(Frame::new());
            let stack = core.add(Stack::horizontal());
            core.attach(frame, stack)?;
            for text in row {
                let l = if text == "d" {
                    core.add(Label::new(text))
                } else {
                    core.add(Label::new(text).focusable())
                };
                core.attach(stack, l)?;
                labels.push(l);
            }
            core.attach(top, frame)?;
        }
        core.set_top_widget(top)?;
        Ok(Grid { core, labels })
    }

    #[test]
    fn tab_cycles() -> Result<()> {
        let Grid { mut core, labels } = grid()?;
        let names = |core: &Core| -> Option<String> {
            let f = core.focused()?;
            labels
                .iter()
                .find(|l| l.id() == f)
                .and_then(|l| core.with_widget(*l, |l| l.text().to_string()).ok())
        };
        assert_eq!(names(&core).as_deref(), Some("a"));
        let tab = Key::from(KeyCode::Tab);
        let mut seen = Vec::new();
        for _ in 0..4 {
            core.dispatch_key(tab)?;
            seen.extend(names(&core));
        }
        assert_eq!(seen, vec!["b", "c", "a", "b"]);

        core.dispatch_key(KeyCode::BackTab.into())?;
        assert_eq!(names(&core).as_deref(), Some("a"));
        core.dispatch_key(KeyCode::BackTab.into())?;
        assert_eq!(names(&core).as_deref(), Some("c"));
        Ok(())
    }

    #[test]
    fn frames_highlight_focus_path() -> Result<()> {
        let Grid { mut core, labels } = grid()?;
        let mut surface = TestSurface::new(Size::new(6, 20));
        core.render_invalidated(&mut surface)?;
        assert!(surface.lines()[0].starts_with('┌'));
        assert_eq!(core.focused(), Some(labels[0].id()));
        let highlighted = surface.style_at(Position::zero());
        let plain = surface.style_at(Position::new(3, 0));
        assert_ne!(highlighted, plain);

        core.dispatch_key(KeyCode::Tab.into())?;
        core.dispatch_key(KeyCode::Tab.into())?;
        assert_eq!(core.focused(), Some(labels[2].id()));
        core.render_invalidated(&mut surface)?;
        assert_eq!(surface.style_at(Position::zero()), plain);
        assert_eq!(surface.style_at(Position::new(3, 0)), highlighted);
        Ok(())
    }
}
