use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    core::Core,
    error::{Error, Result},
    id::WidgetId,
};

/// Render the widget tree under the top widget as colored text: one line
/// per widget with its name and markers, followed by its size and mapping.
/// This is a debug function.
pub fn dump(core: &Core) -> Result<String> {
    dump_into(Buffer::ansi(), core)
}

/// Like [`dump`], without color escapes.
pub fn dump_plain(core: &Core) -> Result<String> {
    dump_into(Buffer::no_color(), core)
}

/// Fill a buffer with the tree dump.
fn dump_into(mut buffer: Buffer, core: &Core) -> Result<String> {
    match core.top() {
        Some(top) => dump_node(&mut buffer, core, top, 0)?,
        None => writeln!(buffer, "<no top widget>")?,
    }
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Walk a subtree and emit formatted output.
fn dump_node(buffer: &mut Buffer, core: &Core, id: WidgetId, level: usize) -> Result<()> {
    let node = core.node(id).ok_or(Error::NodeNotFound(id))?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.name())?;
    buffer.reset()?;

    let mut markers = Vec::new();
    if node.has_focus() {
        markers.push(("FOCUSED", Color::Magenta));
    } else if node.in_focus_path() {
        markers.push(("focus path", Color::Blue));
    }
    if node.mapping().is_none() && !node.children().is_empty() {
        markers.push(("unmapped children", Color::Yellow));
    }
    for (i, (marker, color)) in markers.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " })?;
        buffer.set_color(ColorSpec::new().set_fg(Some(*color)))?;
        write!(buffer, "{marker}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    let size = node
        .size()
        .map_or_else(|| "detached".to_string(), |s| s.to_string());
    write_field(buffer, &indent, "size:", &size)?;
    if let Some(mapping) = node.mapping() {
        write_field(
            buffer,
            &indent,
            "mapping:",
            &format!("{} entries", mapping.len()),
        )?;
    }

    for child in node.children() {
        dump_node(buffer, core, *child, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Size,
        testing::{Probe, Split},
        widget::FocusDirective,
    };

    #[test]
    fn plain_dump() -> Result<()> {
        let mut core = Core::new(Size::new(4, 10));
        assert_eq!(dump_plain(&core)?, "<no top widget>\n");

        let top = core.add(Split::horizontal());
        let a = core.add(Probe::new("a").focus(FocusDirective::Accept));
        let b = core.add(Probe::new("b"));
        core.attach(top, a)?;
        core.attach(top, b)?;
        core.set_top_widget(top)?;

        let out = dump_plain(&core)?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "split focus path");
        assert_eq!(lines[1], "  size: 4×10");
        assert_eq!(lines[2], "  mapping: 2 entries");
        assert_eq!(lines[3], "    probe_a FOCUSED");
        assert_eq!(lines[4], "      size: 4×5");
        assert_eq!(lines[5], "    probe_b");
        Ok(())
    }
}
