//! Font bitmap tables
//!
//! Aggregates rasterized glyphs into the three-level structure the
//! firmware decoder walks: a font set of fonts of characters, each
//! character carrying its RLE-packed bitmap. Every metadata field is
//! a single unsigned byte to match the on-device layout, so overflow
//! is rejected here rather than truncated.

use log::{debug, info};
use thiserror::Error;

use crate::font::Rasterizer;
use crate::rle;

/// Table build failure. Every variant is fatal: a table referencing a
/// missing or unrepresentable glyph must never reach the output.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The source font has no glyph for a requested character.
    #[error("no glyph for {ch:?} (U+{code:04X}) at {size}px", code = *ch as u32)]
    MissingGlyph { ch: char, size: f32 },

    /// A glyph's dimensions or payload exceed the one-byte fields.
    #[error(
        "glyph {ch:?} does not fit the table format: {width}x{height}px, {len} RLE bytes (255 max per field)"
    )]
    GlyphTooLarge {
        ch: char,
        width: usize,
        height: usize,
        len: usize,
    },

    /// The table stores codepoints in a single byte.
    #[error("codepoint U+{code:04X} {ch:?} exceeds the one-byte character field", code = *ch as u32)]
    CodepointTooWide { ch: char },

    /// The per-font character count field is a single byte.
    #[error("font holds {count} characters, the count field caps at 255")]
    FontTooLarge { count: usize },
}

/// One font to compile: which characters to pack, at what pixel size.
#[derive(Debug, Clone)]
pub struct FontSpec {
    /// Characters in table order (kept as given, duplicates included)
    pub chars: Vec<char>,
    /// Rasterization size in pixels
    pub size: f32,
}

/// One rasterized character and its packed bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
    pub ch: char,
    /// Bitmap width (pixels)
    pub width: u8,
    /// Bitmap height (pixels)
    pub height: u8,
    /// RLE payload; decodes to exactly `width * height` pixels
    pub data: Vec<u8>,
}

impl CharacterRecord {
    /// Codepoint as stored in the table's one-byte character field.
    /// Guarded at build time, so the cast cannot truncate.
    pub fn codepoint(&self) -> u8 {
        self.ch as u8
    }

    /// Encoded payload length; always fits the one-byte field.
    pub fn encoded_len(&self) -> u8 {
        self.data.len() as u8
    }
}

/// An ordered character table sharing one pixel size.
#[derive(Debug, Clone)]
pub struct FontRecord {
    /// Rasterization size the characters were built at
    pub size: f32,
    /// Caller's enumeration order, never sorted or deduplicated
    pub characters: Vec<CharacterRecord>,
}

impl FontRecord {
    /// Character count as stored in the table's one-byte field.
    pub fn character_count(&self) -> u8 {
        self.characters.len() as u8
    }
}

/// The top-level table; font identifiers are positions in `fonts`.
#[derive(Debug, Clone, Default)]
pub struct FontSetRecord {
    pub fonts: Vec<FontRecord>,
}

impl FontSetRecord {
    /// Total RLE payload bytes across every font.
    pub fn payload_bytes(&self) -> usize {
        self.fonts
            .iter()
            .flat_map(|f| &f.characters)
            .map(|c| c.data.len())
            .sum()
    }
}

/// Drives rasterization and encoding for whole font sets.
pub struct TableBuilder<'a, R: Rasterizer> {
    face: &'a R,
    /// Coverage strictly above this counts as ink
    threshold: u8,
}

impl<'a, R: Rasterizer> TableBuilder<'a, R> {
    pub fn new(face: &'a R, threshold: u8) -> Self {
        Self { face, threshold }
    }

    /// Rasterize and pack a single character.
    pub fn build_character(&self, ch: char, size: f32) -> Result<CharacterRecord, BuildError> {
        if ch as u32 > 0xFF {
            return Err(BuildError::CodepointTooWide { ch });
        }

        let bitmap = self
            .face
            .rasterize(ch, size)
            .ok_or(BuildError::MissingGlyph { ch, size })?;

        // Flatten row-major and binarize
        let bits: Vec<bool> = bitmap.coverage.iter().map(|&a| a > self.threshold).collect();
        debug_assert_eq!(bits.len(), bitmap.width * bitmap.height);

        let data = rle::encode(&bits);
        debug_assert_eq!(rle::decode(&data), bits);

        if bitmap.width > 0xFF || bitmap.height > 0xFF || data.len() > 0xFF {
            return Err(BuildError::GlyphTooLarge {
                ch,
                width: bitmap.width,
                height: bitmap.height,
                len: data.len(),
            });
        }

        debug!(
            "packed {:?}: {}x{} -> {} bytes",
            ch,
            bitmap.width,
            bitmap.height,
            data.len()
        );

        Ok(CharacterRecord {
            ch,
            width: bitmap.width as u8,
            height: bitmap.height as u8,
            data,
        })
    }

    /// Pack every character of one font, preserving enumeration order.
    pub fn build_font(&self, spec: &FontSpec) -> Result<FontRecord, BuildError> {
        if spec.chars.len() > 0xFF {
            return Err(BuildError::FontTooLarge {
                count: spec.chars.len(),
            });
        }

        let mut characters = Vec::with_capacity(spec.chars.len());
        for &ch in &spec.chars {
            characters.push(self.build_character(ch, spec.size)?);
        }

        Ok(FontRecord {
            size: spec.size,
            characters,
        })
    }

    /// Build the full set; font identifiers are positions in `specs`.
    pub fn build_font_set(&self, specs: &[FontSpec]) -> Result<FontSetRecord, BuildError> {
        let mut fonts = Vec::with_capacity(specs.len());
        for spec in specs {
            let font = self.build_font(spec)?;
            info!(
                "font {}: {} characters at {}px, {} payload bytes",
                fonts.len(),
                font.characters.len(),
                font.size,
                font.characters.iter().map(|c| c.data.len()).sum::<usize>()
            );
            fonts.push(font);
        }
        Ok(FontSetRecord { fonts })
    }
}
