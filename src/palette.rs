use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    error::{ensure_gfx, GfxError, Result},
};

/// An ordered, fixed-length list of colors. Index 0 is usually the backdrop.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Palette { colors }
    }

    /// Decodes `count` little-endian BGR555 entries from the start of `data`.
    pub fn from_bytes(data: &[u8], count: usize) -> Result<Self> {
        let size = count.checked_mul(2).unwrap_or(usize::MAX);
        ensure_gfx!(
            data.len() >= size,
            TruncatedData,
            "truncated palette data: {} colors requested, {} available",
            count,
            data.len() / 2
        );
        let colors = data[..size]
            .chunks_exact(2)
            .map(|c| Color::from_bgr555([c[0], c[1]]))
            .collect();
        Ok(Palette { colors })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_bgr555()).collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Color> {
        self.colors
            .get(index)
            .copied()
            .ok_or_else(|| GfxError::out_of_range("palette"))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }
}

impl Index<usize> for Palette {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.colors[index]
    }
}
