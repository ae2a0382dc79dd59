//! Source font resolution
//!
//! Resolution order:
//! 1. --font command line path
//! 2. FONTPACK_FONT environment variable
//! 3. [font] path from the config
//! 4. [font] family name through fontconfig

use anyhow::{anyhow, bail, Context, Result};
use fontconfig::Fontconfig;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::FontConfig;

/// Load the source font bytes.
pub fn load_font(cli_path: Option<&Path>, config: &FontConfig) -> Result<Vec<u8>> {
    if let Some(path) = cli_path {
        let data = fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        info!("Font loaded: {} (--font)", path.display());
        return Ok(data);
    }

    if let Ok(path) = std::env::var("FONTPACK_FONT") {
        let data = fs::read(&path)
            .map_err(|e| anyhow!("Failed to load FONTPACK_FONT: {} ({})", path, e))?;
        info!("Font loaded: {} (FONTPACK_FONT)", path);
        return Ok(data);
    }

    if !config.path.is_empty() {
        match fs::read(&config.path) {
            Ok(data) => {
                info!("Font loaded: {}", config.path);
                return Ok(data);
            }
            Err(e) => {
                if config.family.is_empty() {
                    bail!("failed to read font {}: {}", config.path, e);
                }
                warn!(
                    "Font file {} unavailable ({}), trying fontconfig",
                    config.path, e
                );
            }
        }
    }

    if !config.family.is_empty() {
        let path = find_family(&config.family)?;
        let data = fs::read(&path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        return Ok(data);
    }

    bail!("no font source: set [font] path or family in the config, pass --font, or set FONTPACK_FONT")
}

/// Resolve a family name to a font file through fontconfig.
///
/// fontconfig always returns the "closest" match, even if completely
/// unrelated, so the result is verified against the requested name.
fn find_family(family: &str) -> Result<PathBuf> {
    let fc = Fontconfig::new().ok_or_else(|| anyhow!("fontconfig initialization failed"))?;
    debug!("fontconfig lookup: \"{}\"", family);

    let font = fc
        .find(family, None)
        .ok_or_else(|| anyhow!("no fontconfig match for \"{}\"", family))?;

    let req = family.to_ascii_lowercase();
    let got = font.name.to_ascii_lowercase();
    if !got.contains(&req) && !req.contains(&got) {
        bail!(
            "fontconfig offered \"{}\" for \"{}\", rejecting false match",
            font.name,
            family
        );
    }

    info!("Font resolved: {} ({})", font.name, font.path.display());
    Ok(font.path)
}
