use std::ops::Index;

use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;

use crate::{
    common::{TileIdx, TILE_BYTES_4BPP},
    error::{ensure_gfx, GfxError, Result},
    tile::{Flip, Tile},
};

/// An ordered, fixed-length sequence of tiles.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Tileset {
    tiles: Vec<Tile>,
}

/// Result of [`Tileset::dedup`]: the distinct tiles, and for every original
/// tile the unique tile and flip that reproduce it.
#[derive(Clone, Debug)]
pub struct TileMap {
    pub unique: Tileset,
    pub entries: Vec<(TileIdx, Flip)>,
}

impl Tileset {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Tileset { tiles }
    }

    /// Unpacks raw 4bpp data, 32 bytes per tile.
    pub fn from_4bpp(data: &[u8]) -> Result<Self> {
        ensure_gfx!(
            data.len() % TILE_BYTES_4BPP == 0,
            MalformedData,
            "length {} is not a multiple of the {}-byte tile size",
            data.len(),
            TILE_BYTES_4BPP
        );
        let tiles = data
            .chunks_exact(TILE_BYTES_4BPP)
            .map(|chunk| Tile::from_4bpp(&std::array::from_fn(|i| chunk[i])))
            .collect_vec();
        Ok(Tileset { tiles })
    }

    pub fn to_4bpp(&self) -> Vec<u8> {
        self.tiles.iter().flat_map(|t| t.to_4bpp()).collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, index: TileIdx) -> Result<&Tile> {
        self.tiles
            .get(index)
            .ok_or_else(|| GfxError::out_of_range("tile"))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Collapses tiles that are identical up to horizontal/vertical flipping.
    /// The first occurrence of each tile becomes the unique representative.
    pub fn dedup(&self) -> TileMap {
        let mut lookup: HashMap<Tile, (TileIdx, Flip)> = HashMap::new();
        let mut unique: Vec<Tile> = vec![];
        let mut entries = Vec::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            let entry = match lookup.get(tile) {
                Some(&x) => x,
                None => {
                    let idx = unique.len();
                    unique.push(*tile);
                    for flip in Flip::ALL {
                        lookup.entry(tile.flipped(flip)).or_insert((idx, flip));
                    }
                    (idx, Flip::None)
                }
            };
            entries.push(entry);
        }
        debug!(
            "Deduplicated {} tiles into {} unique tiles",
            self.tiles.len(),
            unique.len()
        );
        TileMap {
            unique: Tileset::new(unique),
            entries,
        }
    }
}

impl Index<TileIdx> for Tileset {
    type Output = Tile;

    fn index(&self, index: TileIdx) -> &Tile {
        &self.tiles[index]
    }
}

impl<'a> IntoIterator for &'a Tileset {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_tile(seed: u8) -> Tile {
        let mut tile = Tile::default();
        for i in 0..64 {
            tile.set_index(i, (i as u8 / 3 + seed) % 16).unwrap();
        }
        tile
    }

    #[test]
    fn test_two_tile_repack() {
        let data: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(29) ^ 0x5A).collect();
        let tileset = Tileset::from_4bpp(&data).unwrap();
        assert_eq!(tileset.len(), 2);
        assert_eq!(tileset.to_4bpp(), data);
    }

    #[test]
    fn test_tiles_in_stream_order() {
        let mut data = vec![0u8; 96];
        data[32] = 0x01;
        data[64] = 0x02;
        let tileset = Tileset::from_4bpp(&data).unwrap();
        assert_eq!(tileset[0].get(0, 0).unwrap(), 0);
        assert_eq!(tileset[1].get(0, 0).unwrap(), 1);
        assert_eq!(tileset[2].get(0, 0).unwrap(), 2);
    }

    #[test]
    fn test_length_not_multiple_of_tile() {
        let err = Tileset::from_4bpp(&[0u8; 33]).unwrap_err();
        assert!(matches!(err, GfxError::MalformedData(_)));
    }

    #[test]
    fn test_get_out_of_range() {
        let tileset = Tileset::new(vec![Tile::default()]);
        assert!(tileset.get(0).is_ok());
        assert!(matches!(tileset.get(1), Err(GfxError::OutOfRange(_))));
    }

    #[test]
    fn test_dedup_with_flips() {
        let a = gradient_tile(0);
        let b = gradient_tile(5);
        let tileset = Tileset::new(vec![
            a,
            a.flipped(Flip::Horizontal),
            b,
            a,
            b.flipped(Flip::Both),
            a.flipped(Flip::Vertical),
        ]);
        let map = tileset.dedup();
        assert_eq!(map.unique.len(), 2);
        assert_eq!(
            map.entries,
            vec![
                (0, Flip::None),
                (0, Flip::Horizontal),
                (1, Flip::None),
                (0, Flip::None),
                (1, Flip::Both),
                (0, Flip::Vertical),
            ]
        );
        for (tile, &(idx, flip)) in tileset.iter().zip(&map.entries) {
            assert_eq!(map.unique[idx].flipped(flip), *tile);
        }
    }
}
