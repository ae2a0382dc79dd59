//! Configuration file management
//!
//! Loads TOML configuration files and provides the compiler settings.
//! Default config path: ~/.config/fontpack/config.toml

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::table::FontSpec;

/// Compiler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source font settings
    pub font: FontConfig,
    /// Output settings
    pub output: OutputConfig,
    /// Fonts to compile, in table order
    pub fonts: Vec<FontEntry>,
}

/// Source font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file path, tried first
    pub path: String,
    /// fontconfig family name, tried when the path is unavailable
    pub family: String,
    /// Coverage above this value counts as ink (0 = any ink at all)
    pub threshold: u8,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (empty = stdout)
    pub path: String,
    /// Emit PROGMEM qualifiers for AVR program memory
    pub progmem: bool,
}

/// One font to compile: a character list and a pixel size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    /// Characters to pack, in table order
    pub chars: String,
    /// Rasterization size in pixels
    pub size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            output: OutputConfig::default(),
            fonts: default_fonts(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: "font.ttf".to_string(),
            family: String::new(),
            threshold: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            progmem: true,
        }
    }
}

/// Stock font list: numeric readout fonts at several sizes plus one
/// lowercase label font.
fn default_fonts() -> Vec<FontEntry> {
    const DIGITS: &str = "0123456789";
    vec![
        FontEntry {
            chars: format!("{}CF.", DIGITS),
            size: 12.0,
        },
        FontEntry {
            chars: format!("{}-.", DIGITS),
            size: 14.0,
        },
        FontEntry {
            chars: DIGITS.to_string(),
            size: 16.0,
        },
        FontEntry {
            chars: DIGITS.to_string(),
            size: 24.0,
        },
        FontEntry {
            chars: format!("abcdefghijklmnopqrstuvwxyz{} +-", DIGITS),
            size: 12.0,
        },
        FontEntry {
            chars: DIGITS.to_string(),
            size: 30.0,
        },
    ]
}

impl Config {
    /// Default config file location
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow!("config directory not found"))?;
        Ok(dir.join("fontpack").join("config.toml"))
    }

    /// Load settings.
    ///
    /// An explicit path must parse; the default location falls back to
    /// built-in defaults when missing or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let cfg = toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            info!("Config loaded: {}", path.display());
            return Ok(cfg);
        }

        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(Self::default()),
        };

        match fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(cfg) => {
                    info!("Config loaded: {}", path.display());
                    Ok(cfg)
                }
                Err(e) => {
                    warn!("Broken config {} ({}), using defaults", path.display(), e);
                    Ok(Self::default())
                }
            },
            Err(_) => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default configuration file (--init-config).
    pub fn write_default() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text =
            toml::to_string_pretty(&Self::default()).context("failed to serialize defaults")?;
        fs::write(&path, text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// The requested fonts as build specs, in file order.
    pub fn font_specs(&self) -> Vec<FontSpec> {
        self.fonts
            .iter()
            .map(|f| FontSpec {
                chars: f.chars.chars().collect(),
                size: f.size,
            })
            .collect()
    }
}
