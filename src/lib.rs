//! Decoding and composition of GBA ROM graphics: 4bpp tiles, BGR555 palettes,
//! LZ77-compressed tilesets, and sprites built from them.

pub mod color;
pub mod common;
pub mod config;
pub mod error;
mod helpers;
pub mod lz77;
pub mod palette;
pub mod persist;
pub mod render;
pub mod rom;
pub mod sprite;
pub mod tile;
pub mod tileset;

pub use color::Color;
pub use error::{GfxError, Result};
pub use palette::Palette;
pub use render::{Bitmap, SpriteRenderer};
pub use rom::{GbaAddr, Rom, RomOffset};
pub use sprite::Sprite;
pub use tile::{Flip, Tile};
pub use tileset::{TileMap, Tileset};
