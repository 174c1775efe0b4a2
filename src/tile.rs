use crate::{
    common::{ColorIdx, PixelCoord, TILE_BYTES_4BPP, TILE_PIXELS, TILE_SIZE},
    error::{GfxError, Result},
};

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    pub const ALL: [Flip; 4] = [Flip::None, Flip::Horizontal, Flip::Vertical, Flip::Both];

    pub fn new(flip_x: bool, flip_y: bool) -> Self {
        match (flip_x, flip_y) {
            (false, false) => Flip::None,
            (true, false) => Flip::Horizontal,
            (false, true) => Flip::Vertical,
            (true, true) => Flip::Both,
        }
    }

    pub fn flips_x(self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Both)
    }

    pub fn flips_y(self) -> bool {
        matches!(self, Flip::Vertical | Flip::Both)
    }

    pub fn apply_to_pixels(self, pixels: [[ColorIdx; 8]; 8]) -> [[ColorIdx; 8]; 8] {
        let mut out = pixels;
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                out[self.map_y(y)][self.map_x(x)] = pixels[y][x];
            }
        }
        out
    }

    fn map_x(self, x: PixelCoord) -> PixelCoord {
        if self.flips_x() {
            TILE_SIZE - 1 - x
        } else {
            x
        }
    }

    fn map_y(self, y: PixelCoord) -> PixelCoord {
        if self.flips_y() {
            TILE_SIZE - 1 - y
        } else {
            y
        }
    }
}

/// An 8x8 block of 4bpp palette indices, stored row-major as `pixels[y][x]`.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct Tile {
    pixels: [[ColorIdx; 8]; 8],
}

fn check_coords(x: PixelCoord, y: PixelCoord) -> Result<()> {
    if x >= TILE_SIZE || y >= TILE_SIZE {
        return Err(GfxError::out_of_range("pixel"));
    }
    Ok(())
}

fn index_coords(index: usize) -> Result<(PixelCoord, PixelCoord)> {
    if index >= TILE_PIXELS {
        return Err(GfxError::out_of_range("pixel"));
    }
    Ok((index % TILE_SIZE, index / TILE_SIZE))
}

impl Tile {
    pub fn from_pixels(pixels: [[ColorIdx; 8]; 8]) -> Self {
        Tile {
            pixels: pixels.map(|row| row.map(|p| p & 0x0F)),
        }
    }

    pub fn pixels(&self) -> &[[ColorIdx; 8]; 8] {
        &self.pixels
    }

    pub fn get(&self, x: PixelCoord, y: PixelCoord) -> Result<ColorIdx> {
        check_coords(x, y)?;
        Ok(self.pixels[y][x])
    }

    pub fn get_index(&self, index: usize) -> Result<ColorIdx> {
        let (x, y) = index_coords(index)?;
        Ok(self.pixels[y][x])
    }

    /// Only the low nibble of `value` is stored.
    pub fn set(&mut self, x: PixelCoord, y: PixelCoord, value: ColorIdx) -> Result<()> {
        check_coords(x, y)?;
        self.pixels[y][x] = value & 0x0F;
        Ok(())
    }

    pub fn set_index(&mut self, index: usize, value: ColorIdx) -> Result<()> {
        let (x, y) = index_coords(index)?;
        self.pixels[y][x] = value & 0x0F;
        Ok(())
    }

    /// Compares against `other` as if `other` were first mirrored along the
    /// requested axes.
    pub fn equals(&self, other: &Tile, flip_x: bool, flip_y: bool) -> bool {
        let flip = Flip::new(flip_x, flip_y);
        if flip == Flip::None {
            return self == other;
        }
        for src_y in 0..TILE_SIZE {
            for src_x in 0..TILE_SIZE {
                if self.pixels[src_y][src_x] != other.pixels[flip.map_y(src_y)][flip.map_x(src_x)]
                {
                    return false;
                }
            }
        }
        true
    }

    pub fn flipped(&self, flip: Flip) -> Tile {
        Tile {
            pixels: flip.apply_to_pixels(self.pixels),
        }
    }

    /// Unpacks 32 bytes of 4bpp data. Each byte holds two pixels, the left one
    /// in the low nibble.
    pub fn from_4bpp(data: &[u8; TILE_BYTES_4BPP]) -> Self {
        let mut pixels = [[0; 8]; 8];
        for (i, &b) in data.iter().enumerate() {
            let y = i / 4;
            let x = (i % 4) * 2;
            pixels[y][x] = b & 0x0F;
            pixels[y][x + 1] = b >> 4;
        }
        Tile { pixels }
    }

    pub fn to_4bpp(&self) -> [u8; TILE_BYTES_4BPP] {
        let mut out = [0; TILE_BYTES_4BPP];
        for (i, b) in out.iter_mut().enumerate() {
            let y = i / 4;
            let x = (i % 4) * 2;
            *b = self.pixels[y][x] | self.pixels[y][x + 1] << 4;
        }
        out
    }
}
