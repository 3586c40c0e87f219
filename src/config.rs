/// User settings stored in `settings.toml`
///
/// The file lives in the user's config directory:
/// - Linux: ~/.config/PicGallery/settings.toml
/// - macOS: ~/Library/Application Support/PicGallery/settings.toml
/// - Windows: %APPDATA%\PicGallery\settings.toml
///
/// Every field is optional; a missing or unreadable file means defaults.
/// The last selected category is written back as `default_category`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cdn::counts::DEFAULT_SCRIPT_URL;
use crate::error::Result;
use crate::state::category::Category;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "PicGallery";

pub const DEFAULT_COUNT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Category shown at startup
    #[serde(default)]
    pub default_category: Option<Category>,
    /// Where the remote count script is downloaded from
    #[serde(default)]
    pub count_script_url: Option<String>,
    /// How long to wait for the count script before falling back
    #[serde(default)]
    pub count_timeout_ms: Option<u64>,
    #[serde(default)]
    pub window_width: Option<f32>,
    #[serde(default)]
    pub window_height: Option<f32>,
}

impl Config {
    pub fn default_category(&self) -> Category {
        self.default_category.unwrap_or_default()
    }

    pub fn count_script_url(&self) -> String {
        self.count_script_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SCRIPT_URL.to_string())
    }

    pub fn count_timeout(&self) -> Duration {
        Duration::from_millis(self.count_timeout_ms.unwrap_or(DEFAULT_COUNT_TIMEOUT_MS))
    }

    pub fn window_size(&self) -> iced::Size {
        iced::Size::new(
            self.window_width.unwrap_or(DEFAULT_WINDOW_WIDTH),
            self.window_height.unwrap_or(DEFAULT_WINDOW_HEIGHT),
        )
    }
}

pub fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Load settings from the default location
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
