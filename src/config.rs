use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::persist::{load_json, save_json};

fn default_width() -> usize {
    8
}

fn default_colors() -> usize {
    16
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_colors")]
    pub colors: usize,
    #[serde(default)]
    pub transparent_index_zero: bool,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            width: default_width(),
            colors: default_colors(),
            transparent_index_zero: false,
            output_dir: None,
        }
    }
}

pub fn get_global_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "GbaGfx")
        .context("Unable to open global config directory.")?;
    let config_dir = project_dirs.config_dir();
    Ok(config_dir.join("config.json"))
}

impl ExportConfig {
    /// Loads the config at `path`, falling back to defaults if it doesn't exist.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(ExportConfig::default());
        }
        load_json(path).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        save_json(path, self)
    }
}
