//! fontdue-backed glyph source

use anyhow::{anyhow, Result};
use fontdue::{Font, FontSettings};
use log::debug;

use super::{GlyphBitmap, Rasterizer};

/// A loaded scalable font face.
pub struct FontFace {
    font: Font,
}

impl FontFace {
    /// Load a face from raw TTF/OTF bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| anyhow!("Failed to load font: {}", e))?;
        Ok(Self { font })
    }
}

impl Rasterizer for FontFace {
    fn rasterize(&self, ch: char, size: f32) -> Option<GlyphBitmap> {
        // Glyph index 0 is the missing-glyph placeholder
        if self.font.lookup_glyph_index(ch) == 0 {
            debug!("Glyph not found: U+{:04X} {:?}", ch as u32, ch);
            return None;
        }

        let (metrics, coverage) = self.font.rasterize(ch, size);
        Some(GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            coverage,
        })
    }
}
