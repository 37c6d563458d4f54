//! Configuration management for todo-tui
//!
//! Holds the user's cosmetic settings: selected theme and alternate icon.
//! Config file location: ~/.config/todo-tui/config.toml

use crate::icons::ICON_NAMES;
use crate::types::{ThemeData, THEMES};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Index into the theme list
    pub theme: usize,
    /// Index into the alternate icon list
    pub icon: usize,
}

impl Config {
    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("todo-tui");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        config.sanitize();
        Ok(config)
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Reset indices that point outside their lists
    pub fn sanitize(&mut self) {
        if self.theme >= THEMES.len() {
            log::warn!("Theme index {} out of range, using default", self.theme);
            self.theme = 0;
        }
        if self.icon >= ICON_NAMES.len() {
            log::warn!("Icon index {} out of range, using default", self.icon);
            self.icon = 0;
        }
    }

    /// Select a theme by index
    pub fn select_theme(&mut self, index: usize) -> Result<()> {
        if ThemeData::get(index).is_none() {
            bail!("Theme index {} out of range", index);
        }
        self.theme = index;
        Ok(())
    }

    /// Currently selected theme
    pub fn theme_data(&self) -> &'static ThemeData {
        ThemeData::get(self.theme).unwrap_or(&THEMES[0])
    }
}
