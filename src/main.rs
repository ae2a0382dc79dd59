//! fontpack - compiles TrueType glyphs into RLE bitmap tables
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Config (charsets × sizes)               │
//! ├──────────────────────────────────────────┤
//! │  Rasterize (fontdue)  →  1-bit RLE       │
//! │                          ↓               │
//! │  Character / font / font-set tables      │
//! │                          ↓               │
//! │  C source (PROGMEM arrays)               │
//! └──────────────────────────────────────────┘
//! ```

mod config;
mod emit;
mod font;
mod rle;
mod table;

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn print_help() {
    println!("fontpack - compile TrueType glyphs into RLE bitmap tables for firmware");
    println!();
    println!("Usage: fontpack [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config=PATH   Use a specific config file");
    println!("  --font=PATH     Source font file (overrides config)");
    println!("  --output=PATH   Output file (overrides config; default stdout)");
    println!("  --init-config   Write the default config file");
    println!("  -f, --force     Overwrite an existing config with --init-config");
    println!("  -h, --help      Show this help");
    println!("  -V, --version   Show version");
    println!();
    println!("The font may also be set via the FONTPACK_FONT environment variable.");
}

/// Value of a `--name=value` argument, if present.
fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .find_map(|a| a.strip_prefix(name)?.strip_prefix('='))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("fontpack {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config file generation mode
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");

        if !force {
            if let Ok(path) = config::Config::config_path() {
                if path.exists() {
                    println!("Config file already exists: {}", path.display());
                    print!("Overwrite? [y/N]: ");
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;
                    let input = input.trim().to_lowercase();

                    if input != "y" && input != "yes" {
                        println!("Aborted.");
                        return Ok(());
                    }
                }
            }
        }

        let path = config::Config::write_default()?;
        println!("Config file generated: {}", path.display());
        return Ok(());
    }

    let cfg_path = arg_value(&args, "--config").map(PathBuf::from);
    let cfg = config::Config::load(cfg_path.as_deref())?;

    // Load and parse the source font
    let font_override = arg_value(&args, "--font").map(PathBuf::from);
    let data = font::locate::load_font(font_override.as_deref(), &cfg.font)?;
    let face = font::FontFace::from_bytes(&data)?;

    // Compile every requested font
    let specs = cfg.font_specs();
    let builder = table::TableBuilder::new(&face, cfg.font.threshold);
    let set = builder
        .build_font_set(&specs)
        .context("font table build failed")?;

    info!(
        "Compiled {} fonts, {} payload bytes",
        set.fonts.len(),
        set.payload_bytes()
    );

    // Emit C tables to the requested sink
    let out_path = arg_value(&args, "--output")
        .map(str::to_owned)
        .or_else(|| (!cfg.output.path.is_empty()).then(|| cfg.output.path.clone()));

    match out_path {
        Some(path) => {
            let file =
                File::create(&path).with_context(|| format!("failed to create {}", path))?;
            let mut w = BufWriter::new(file);
            emit::write_tables(&mut w, &set, cfg.output.progmem)?;
            w.flush()?;
            info!("Tables written: {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            emit::write_tables(&mut w, &set, cfg.output.progmem)?;
        }
    }

    Ok(())
}
