use std::{path::PathBuf, rc::Rc};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;

use gba_gfx::{
    config::{get_global_config_path, ExportConfig},
    persist, Rom, RomOffset, Sprite, SpriteRenderer,
};

fn parse_offset(s: &str) -> Result<RomOffset, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    usize::from_str_radix(digits, 16)
        .map(RomOffset)
        .map_err(|e| format!("invalid hex offset '{s}': {e}"))
}

/// Export a compressed 4bpp sprite from a GBA ROM as PNG.
#[derive(Parser, Debug)]
struct Args {
    /// Path to the ROM image
    #[arg(long)]
    rom: PathBuf,

    /// Offset of the LZ77-compressed tileset (hex)
    #[arg(long, value_parser = parse_offset)]
    tiles: RomOffset,

    /// Offset of the palette (hex)
    #[arg(long, value_parser = parse_offset)]
    palette: RomOffset,

    /// Sprite width in tiles
    #[arg(long)]
    width: Option<usize>,

    /// Number of palette entries to read
    #[arg(long)]
    colors: Option<usize>,

    /// Render palette index 0 as transparent
    #[arg(long)]
    transparent: bool,

    /// Also write the palette as JSON to this path
    #[arg(long)]
    palette_json: Option<PathBuf>,

    /// Report how many tiles are unique up to flipping
    #[arg(long)]
    dedup: bool,

    /// Config file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config_path = match &args.config {
        Some(p) => p.clone(),
        None => get_global_config_path()?,
    };
    let config = ExportConfig::load(&config_path)?;
    let width = args.width.unwrap_or(config.width);
    let colors = args.colors.unwrap_or(config.colors);
    let transparent = args.transparent || config.transparent_index_zero;

    let mut rom = Rom::open(&args.rom)?;
    rom.seek(args.tiles)?;
    let tileset = rom
        .read_compressed_tiles(4)
        .with_context(|| format!("Unable to read tileset at {}", args.tiles))?;
    ensure!(!tileset.is_empty(), "Tileset at {} contains no tiles", args.tiles);
    rom.seek(args.palette)?;
    let palette = rom
        .read_palette(colors)
        .with_context(|| format!("Unable to read palette at {}", args.palette))?;
    info!(
        "Loaded {} tiles and {} colors",
        tileset.len(),
        palette.len()
    );

    if args.dedup {
        let map = tileset.dedup();
        info!(
            "{} of {} tiles are unique up to flipping",
            map.unique.len(),
            tileset.len()
        );
    }

    if let Some(path) = &args.palette_json {
        persist::save_palette(path, &palette)?;
    }

    let sprite = Sprite::new(Rc::new(tileset), Rc::new(palette), width)?;
    let bitmap = SpriteRenderer::new(transparent).render(&sprite)?;

    let output = match &config.output_dir {
        Some(dir) if args.output.is_relative() => dir.join(&args.output),
        _ => args.output.clone(),
    };
    persist::save_png(&output, &bitmap)?;
    Ok(())
}
