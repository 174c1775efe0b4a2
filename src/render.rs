// Lays a sprite's tiles out into an RGBA image.
use log::debug;

use crate::{
    common::{TILE_PIXELS, TILE_SIZE},
    error::Result,
    sprite::Sprite,
};

const BLANK: [u8; 4] = [0, 0, 0, 0];

/// An RGBA8 image, row-major, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Bitmap {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct SpriteRenderer {
    /// Draw palette index 0 as transparent rather than its color.
    pub transparent_index_zero: bool,
}

impl SpriteRenderer {
    pub fn new(transparent_index_zero: bool) -> Self {
        SpriteRenderer {
            transparent_index_zero,
        }
    }

    pub fn render(&self, sprite: &Sprite) -> Result<Bitmap> {
        let colors = sprite.pixels()?;
        let tileset = sprite.tileset();
        let num_cols = sprite.width();
        let num_rows = sprite.height();
        let width = num_cols * TILE_SIZE;
        let height = num_rows * TILE_SIZE;

        let mut data: Vec<u8> = vec![];
        data.reserve_exact(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let tile_x = x / TILE_SIZE;
                let tile_y = y / TILE_SIZE;
                let pixel_x = x % TILE_SIZE;
                let pixel_y = y % TILE_SIZE;
                let tile_idx = tile_y * num_cols + tile_x;
                if tile_idx >= tileset.len() {
                    data.extend(BLANK);
                    continue;
                }
                let j = pixel_y * TILE_SIZE + pixel_x;
                if self.transparent_index_zero && tileset[tile_idx].pixels()[pixel_y][pixel_x] == 0
                {
                    data.extend(BLANK);
                    continue;
                }
                data.extend(colors[tile_idx * TILE_PIXELS + j].to_rgba());
            }
        }
        debug!("Rendered {}x{} bitmap", width, height);
        Ok(Bitmap {
            width: width as u32,
            height: height as u32,
            data,
        })
    }
}
