//! File-backed application configuration and the UI color theme.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Load `config.toml` from the config directory. A missing file yields
    /// the defaults; an unreadable or invalid file also falls back to the
    /// defaults with a warning on stderr.
    pub fn load_config(&self) -> AppConfig {
        let path = self.config_path("config.toml");
        if !path.exists() {
            return AppConfig::default();
        }
        match std::fs::read_to_string(&path)
            .map_err(|e| eyre!(e))
            .and_then(|text| toml::from_str::<AppConfig>(&text).map_err(|e| eyre!(e)))
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: could not read config at {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                AppConfig::default()
            }
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeConfig,
    pub hints: HintsConfig,
}

/// Named UI colors. Values are color names ("cyan", "dark_gray") or
/// `#rrggbb` hex strings; anything unset uses the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HintsConfig {
    /// Overrides the default hint file location next to the executable.
    pub file: Option<PathBuf>,
}

/// Resolved theme: color lookup by role name with built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    colors: HashMap<String, Color>,
}

impl Theme {
    /// Roles the UI asks for and their fallback colors.
    fn default_color(name: &str) -> Color {
        match name {
            "border" => Color::DarkGray,
            "border_active" => Color::Cyan,
            "text_primary" => Color::Reset,
            "text_secondary" => Color::Gray,
            "table_header" => Color::Cyan,
            "status_error" => Color::Red,
            "controls_bg" => Color::DarkGray,
            "plot_marker" => Color::Blue,
            "plot_marker_alt" => Color::Red,
            _ => Color::Reset,
        }
    }

    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let mut colors = HashMap::new();
        for (name, value) in &config.colors {
            colors.insert(name.clone(), parse_color(value)?);
        }
        Ok(Self { colors })
    }

    pub fn get(&self, name: &str) -> Color {
        self.colors
            .get(name)
            .copied()
            .unwrap_or_else(|| Self::default_color(name))
    }
}

/// Parse a color string: a basic named color or a `#rrggbb` hex value.
pub fn parse_color(s: &str) -> Result<Color> {
    let trimmed = s.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        if hex.len() != 6 {
            return Err(eyre!(
                "Invalid hex color format: '{}'. Expected format: #rrggbb",
                trimmed
            ));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|_| eyre!("Invalid red component in hex color: {}", trimmed))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|_| eyre!("Invalid green component in hex color: {}", trimmed))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|_| eyre!("Invalid blue component in hex color: {}", trimmed))?;
        return Ok(Color::Rgb(r, g, b));
    }

    match trimmed.to_lowercase().as_str() {
        "black" => Ok(Color::Black),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "cyan" => Ok(Color::Cyan),
        "white" => Ok(Color::White),
        "gray" | "grey" => Ok(Color::Gray),
        "dark_gray" | "dark gray" | "dark_grey" | "dark grey" => Ok(Color::DarkGray),
        "reset" => Ok(Color::Reset),
        _ => Err(eyre!(
            "Unknown color name: '{}'. Supported: basic ANSI colors or hex (#ff0000)",
            trimmed
        )),
    }
}
