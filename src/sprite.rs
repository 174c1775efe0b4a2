use std::rc::Rc;

use crate::{
    color::Color,
    common::TILE_PIXELS,
    error::{ensure_gfx, GfxError, Result},
    palette::Palette,
    tileset::Tileset,
};

/// A tileset laid out `width` tiles per row and colored through a palette.
///
/// The tileset and palette are shared handles; several sprites may point at the
/// same data.
#[derive(Clone, Debug)]
pub struct Sprite {
    tileset: Rc<Tileset>,
    palette: Rc<Palette>,
    width: usize,
}

fn check_width(width: usize) -> Result<()> {
    ensure_gfx!(width >= 1, InvalidArgument, "invalid width: {}", width);
    Ok(())
}

impl Sprite {
    /// `width` is in tiles; pass 1 for a single column.
    pub fn new(tileset: Rc<Tileset>, palette: Rc<Palette>, width: usize) -> Result<Self> {
        check_width(width)?;
        Ok(Sprite {
            tileset,
            palette,
            width,
        })
    }

    pub fn tileset(&self) -> &Rc<Tileset> {
        &self.tileset
    }

    pub fn set_tileset(&mut self, tileset: Rc<Tileset>) {
        self.tileset = tileset;
    }

    pub fn palette(&self) -> &Rc<Palette> {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Rc<Palette>) {
        self.palette = palette;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) -> Result<()> {
        check_width(width)?;
        self.width = width;
        Ok(())
    }

    /// Number of tile rows, counting a partially filled last row.
    pub fn height(&self) -> usize {
        self.tileset.len().div_ceil(self.width)
    }

    /// Resolves every pixel of every tile through the palette, tile by tile.
    /// Entry `i * 64 + j` is pixel `j` of tile `i`.
    pub fn pixels(&self) -> Result<Vec<Color>> {
        let mut pixels = Vec::with_capacity(self.tileset.len() * TILE_PIXELS);
        for tile in self.tileset.iter() {
            for row in tile.pixels() {
                for &color_idx in row {
                    let color = self.palette.get(color_idx as usize).map_err(|_| {
                        GfxError::OutOfRange(format!(
                            "palette index out of range: {} (palette has {} colors)",
                            color_idx,
                            self.palette.len()
                        ))
                    })?;
                    pixels.push(color);
                }
            }
        }
        Ok(pixels)
    }
}
