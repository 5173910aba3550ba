use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};
use xfce_rs_colorpick::{ColorStyle, OutputFormat};

use crate::cli::Args;

/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "GRABC_CONFIG";

/// Output defaults read from `grabc.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: OutputFormat,
    pub prefix: bool,
}

impl Settings {
    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Combine with the command line; flags win.
    pub fn style(&self, args: &Args) -> ColorStyle {
        ColorStyle {
            format: args.format().unwrap_or(self.format),
            prefix: args.prefix().unwrap_or(self.prefix),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("xfce-rs").join("grabc.toml"))
}
