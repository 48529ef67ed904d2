use std::{fs, path::Path};

use anyhow::{Context as _, Result};
use serde::Deserialize;
use tessel::ScreenOptions;

/// Settings for the demo programs, loaded from TOML.
///
/// ```toml
/// rows = 2
/// columns = 4
///
/// [screen]
/// escape_delay = 50
/// ctrl_c = "dump_tree_and_exit"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Event loop options.
    pub screen: ScreenOptions,
    /// Number of framed rows.
    pub rows: usize,
    /// Number of labels per row.
    pub columns: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            screen: ScreenOptions::default(),
            rows: 3,
            columns: 3,
        }
    }
}

impl DemoConfig {
    /// Parse a configuration from TOML text.
    pub fn parse(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&src).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use tessel::CtrlCBehavior;

    use super::*;

    #[test]
    fn defaults_and_overrides() -> Result<()> {
        assert_eq!(DemoConfig::parse("")?, DemoConfig::default());
        let cfg = DemoConfig::parse(
            r#"
            rows = 2

            [screen]
            ctrl_c = "deliver"
            "#,
        )?;
        assert_eq!(cfg.rows, 2);
        assert_eq!(cfg.columns, 3);
        assert_eq!(cfg.screen.ctrl_c, CtrlCBehavior::Deliver);
        assert_eq!(cfg.screen.escape_delay, 25);
        assert!(DemoConfig::parse("rows = \"many\"").is_err());
        Ok(())
    }
}
