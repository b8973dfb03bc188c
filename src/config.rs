//! User configuration, read from `<config_dir>/snipdeck/config.toml`.
//!
//! Every key is optional; anything missing takes the default below.

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_delete_confirm_dialog: bool,
    pub show_copy_noti: bool,
    pub show_snippet_create_time: bool,
    pub show_snippet_update_time: bool,
    pub show_snippet_copy_count: bool,
    pub tag_color: String,
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_delete_confirm_dialog: true,
            show_copy_noti: true,
            show_snippet_create_time: true,
            show_snippet_update_time: true,
            show_snippet_copy_count: true,
            tag_color: String::from("#c4a7e7"),
            date_format: String::from(DEFAULT_DATE_FORMAT),
        }
    }
}

impl UiConfig {
    /// Parsed tag color; unparseable values fall back to the default iris
    pub fn tag_color(&self) -> Color {
        Color::from_str(&self.tag_color).unwrap_or(Color::Rgb(196, 167, 231))
    }

    /// Replaces a `date_format` chrono cannot render with the default
    fn sanitize(&mut self) {
        if !is_valid_date_format(&self.date_format) {
            tracing::warn!(
                date_format = %self.date_format,
                fallback = DEFAULT_DATE_FORMAT,
                "invalid date_format, using the default"
            );
            self.date_format = String::from(DEFAULT_DATE_FORMAT);
        }
    }
}

pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snipdeck").join("config.toml"))
    }

    /// Loads the config file at `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: Self = toml::from_str(&content).context("Failed to parse config TOML")?;
        config.ui.sanitize();
        Ok(config)
    }

    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }
}
