pub type ColorValue = u8; // Color channel value (0-31)
pub type ColorIdx = u8; // Index into 4bpp palette (0-15)
pub type PixelCoord = usize; // Tile-local pixel coordinate (0-7)
pub type TileIdx = usize; // Index into a tileset

pub const TILE_SIZE: usize = 8;
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;
// Bytes occupied by one 4bpp tile in ROM.
pub const TILE_BYTES_4BPP: usize = TILE_PIXELS / 2;
