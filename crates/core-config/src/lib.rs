//! Configuration loading and parsing.
//!
//! Parses `pike.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [display]
//! tab_width = 4        # columns a tab advances, clamped to 1..=cols/2
//! fill_glyphs = true   # pad empty rows with ~ ^ $ instead of blanks
//!
//! [startup]
//! scratch_name = "*scratch*"
//! ```
//!
//! The tab width clamp depends on the terminal width, so it lives in
//! `Config::apply_context` and is re-run after every resize. The raw parsed
//! value is kept so a wider terminal can restore it. Unknown fields are
//! ignored; a missing or malformed file yields the defaults.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "pike.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_tab_width")]
    pub tab_width: u16,
    #[serde(default = "DisplayConfig::default_fill_glyphs")]
    pub fill_glyphs: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            fill_glyphs: Self::default_fill_glyphs(),
        }
    }
}

impl DisplayConfig {
    const fn default_tab_width() -> u16 {
        4
    }
    const fn default_fill_glyphs() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    #[serde(default = "StartupConfig::default_scratch_name")]
    pub scratch_name: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            scratch_name: Self::default_scratch_name(),
        }
    }
}

impl StartupConfig {
    fn default_scratch_name() -> String {
        "*scratch*".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub effective_tab_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        let file = ConfigFile::default();
        Self {
            raw: None,
            effective_tab_width: file.display.tab_width,
            file,
        }
    }
}

/// Local working directory first, then the platform config dir
/// (`$XDG_CONFIG_HOME/pike/pike.toml`, AppData Roaming on Windows).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("pike").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                effective_tab_width: file.display.tab_width.max(1),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp the tab width to `1..=cols/2` for the given terminal. Returns the
    /// effective value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.display.tab_width;
        let max = (ctx.viewport_columns / 2).max(1);
        let clamped = raw.clamp(1, max);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                viewport_columns = ctx.viewport_columns,
                viewport_rows = ctx.viewport_rows,
                "tab_width_clamped"
            );
        }
        self.effective_tab_width = clamped;
        clamped
    }

    /// Re-clamp after a resize. `Some(new_width)` when the effective value changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<u16> {
        let prev = self.effective_tab_width;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }

    pub fn fill_glyphs(&self) -> bool {
        self.file.display.fill_glyphs
    }

    pub fn scratch_name(&self) -> &str {
        &self.file.startup.scratch_name
    }
}
