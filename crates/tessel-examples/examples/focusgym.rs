use std::{fs::File, path::PathBuf, process, sync::Mutex};

use anyhow::Result;
use clap::Parser;
use tessel::{Core, Screen, dump::dump, geom::Size};
use tessel_examples::{config::DemoConfig, focusgym};

/// Focus playground: Tab and BackTab move between cells, other keys are
/// echoed by the focused cell, q quits.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[clap(short, long)]
    log: Option<PathBuf>,

    /// Print the widget tree for an 80x24 screen and exit
    #[clap(short, long)]
    dump: bool,
}

pub fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(path) = &args.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    if args.dump {
        let mut core = Core::new(Size::new(24, 80));
        let (top, _) = focusgym::build(&mut core, &cfg)?;
        core.set_top_widget(top)?;
        print!("{}", dump(&core)?);
        return Ok(());
    }

    let mut screen = Screen::crossterm(cfg.screen)?;
    let (top, _) = focusgym::build(&mut screen.core, &cfg)?;
    screen.set_top_widget(top)?;
    let code = screen.run()?;
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
