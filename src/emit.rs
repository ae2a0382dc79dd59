//! C source emission
//!
//! Renders a font set as compile-ready C declarations for firmware:
//! one byte array per character, one character table per font, and
//! the top-level fonts[] array indexed by font identifier.

use std::io::{self, Write};

use crate::table::{CharacterRecord, FontSetRecord};

/// Bytes per line in emitted data arrays.
const BYTES_PER_LINE: usize = 12;

/// Write the complete set of table declarations.
///
/// With `progmem` the arrays carry the AVR program-memory qualifier;
/// without it they are plain const tables.
pub fn write_tables<W: Write>(out: &mut W, set: &FontSetRecord, progmem: bool) -> io::Result<()> {
    let qual = if progmem { "const PROGMEM" } else { "const" };

    writeln!(out, "// This file is generated by fontpack")?;
    writeln!(out)?;
    writeln!(out, "struct font_character {{")?;
    writeln!(out, "    char c;")?;
    writeln!(out, "    uint8_t w, h, len;")?;
    writeln!(out, "    const unsigned char *data;")?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "struct font {{")?;
    writeln!(out, "    uint8_t n;")?;
    writeln!(out, "    const struct font_character *characters;")?;
    writeln!(out, "}};")?;

    for (id, font) in set.fonts.iter().enumerate() {
        for ch in &font.characters {
            write_character_data(out, qual, id, ch)?;
        }

        writeln!(out)?;
        writeln!(out, "{} struct font_character font{}[] = {{", qual, id)?;
        for ch in &font.characters {
            writeln!(
                out,
                "    {{{}, {}, {}, {}, font{}_{:02x}}},",
                ch.codepoint(),
                ch.width,
                ch.height,
                ch.encoded_len(),
                id,
                ch.codepoint()
            )?;
        }
        writeln!(out, "}};")?;
    }

    writeln!(out)?;
    writeln!(out, "{} struct font fonts[] = {{", qual)?;
    for (id, font) in set.fonts.iter().enumerate() {
        writeln!(out, "    {{{}, font{}}},", font.character_count(), id)?;
    }
    writeln!(out, "}};")?;

    Ok(())
}

/// Write one character's RLE payload array.
fn write_character_data<W: Write>(
    out: &mut W,
    qual: &str,
    font_id: usize,
    ch: &CharacterRecord,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} unsigned char font{}_{:02x}[] = {{",
        qual,
        font_id,
        ch.codepoint()
    )?;
    for chunk in ch.data.chunks(BYTES_PER_LINE) {
        let row: Vec<String> = chunk.iter().map(|b| format!("{:#04x}", b)).collect();
        writeln!(out, "    {},", row.join(", "))?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FontRecord;

    fn sample_set() -> FontSetRecord {
        FontSetRecord {
            fonts: vec![
                FontRecord {
                    size: 12.0,
                    characters: vec![
                        CharacterRecord {
                            ch: '0',
                            width: 3,
                            height: 2,
                            data: vec![0x02, 0x81, 0x83],
                        },
                        CharacterRecord {
                            ch: '1',
                            width: 1,
                            height: 2,
                            data: vec![0x82],
                        },
                    ],
                },
                FontRecord {
                    size: 24.0,
                    characters: vec![CharacterRecord {
                        ch: '.',
                        width: 0,
                        height: 0,
                        data: vec![],
                    }],
                },
            ],
        }
    }

    fn render(set: &FontSetRecord, progmem: bool) -> String {
        let mut buf = Vec::new();
        write_tables(&mut buf, set, progmem).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_struct_declarations() {
        let text = render(&sample_set(), true);
        assert!(text.starts_with("// This file is generated by fontpack\n"));
        assert!(text.contains("struct font_character {\n    char c;\n    uint8_t w, h, len;\n    const unsigned char *data;\n};\n"));
        assert!(text.contains("struct font {\n    uint8_t n;\n    const struct font_character *characters;\n};\n"));
    }

    #[test]
    fn test_character_arrays() {
        let text = render(&sample_set(), true);
        assert!(text.contains(
            "const PROGMEM unsigned char font0_30[] = {\n    0x02, 0x81, 0x83,\n};\n"
        ));
        assert!(text.contains("const PROGMEM unsigned char font0_31[] = {\n    0x82,\n};\n"));
        // Empty payload still declares the array
        assert!(text.contains("const PROGMEM unsigned char font1_2e[] = {\n};\n"));
    }

    #[test]
    fn test_font_tables() {
        let text = render(&sample_set(), true);
        assert!(text.contains(
            "const PROGMEM struct font_character font0[] = {\n    {48, 3, 2, 3, font0_30},\n    {49, 1, 2, 1, font0_31},\n};\n"
        ));
        assert!(text.contains(
            "const PROGMEM struct font_character font1[] = {\n    {46, 0, 0, 0, font1_2e},\n};\n"
        ));
        assert!(text
            .ends_with("const PROGMEM struct font fonts[] = {\n    {2, font0},\n    {1, font1},\n};\n"));
    }

    #[test]
    fn test_plain_const_mode() {
        let text = render(&sample_set(), false);
        assert!(!text.contains("PROGMEM"));
        assert!(text.contains("const unsigned char font0_30[] = {"));
        assert!(text.contains("const struct font fonts[] = {"));
    }

    #[test]
    fn test_long_payload_wraps() {
        let set = FontSetRecord {
            fonts: vec![FontRecord {
                size: 30.0,
                characters: vec![CharacterRecord {
                    ch: '8',
                    width: 20,
                    height: 13,
                    data: (1..=26).collect(),
                }],
            }],
        };
        let text = render(&set, true);
        let array = text
            .split("font0_38[] = {\n")
            .nth(1)
            .and_then(|s| s.split("};").next())
            .unwrap();
        let lines: Vec<&str> = array.lines().collect();
        assert_eq!(lines.len(), 3); // 12 + 12 + 2 bytes
        assert!(lines[0].starts_with("    0x01, 0x02,"));
        assert!(lines[2].trim().starts_with("0x19, 0x1a,"));
    }
}
