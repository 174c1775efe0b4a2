use serde::{Deserialize, Serialize};

use crate::{
    common::ColorValue,
    helpers::{scale_color, unscale_color},
};

pub type ColorRGB = [u8; 3];

/// A BGR555 color as stored in palette RAM: `0bXBBBBBGGGGGRRRRR`.
///
/// Bit 15 is ignored on hardware and is dropped on construction, so two colors
/// that differ only in that bit compare equal.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "[ColorValue; 3]", into = "[ColorValue; 3]")]
pub struct Color(u16);

impl Color {
    pub const fn from_bits(bits: u16) -> Self {
        Color(bits & 0x7FFF)
    }

    pub fn from_bgr555(bytes: [u8; 2]) -> Self {
        Self::from_bits(u16::from_le_bytes(bytes))
    }

    /// Builds a color from 5-bit channel values (0-31). Higher bits are dropped.
    pub fn from_555(red: ColorValue, green: ColorValue, blue: ColorValue) -> Self {
        Color::from_bits(
            (red as u16 & 31) | (green as u16 & 31) << 5 | (blue as u16 & 31) << 10,
        )
    }

    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_555(unscale_color(red), unscale_color(green), unscale_color(blue))
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn to_bgr555(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    pub fn red5(self) -> ColorValue {
        (self.0 & 31) as ColorValue
    }

    pub fn green5(self) -> ColorValue {
        ((self.0 >> 5) & 31) as ColorValue
    }

    pub fn blue5(self) -> ColorValue {
        ((self.0 >> 10) & 31) as ColorValue
    }

    pub fn red(self) -> u8 {
        scale_color(self.red5())
    }

    pub fn green(self) -> u8 {
        scale_color(self.green5())
    }

    pub fn blue(self) -> u8 {
        scale_color(self.blue5())
    }

    pub fn to_rgb(self) -> ColorRGB {
        [self.red(), self.green(), self.blue()]
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), 255]
    }
}

impl From<[ColorValue; 3]> for Color {
    fn from([r, g, b]: [ColorValue; 3]) -> Self {
        Color::from_555(r, g, b)
    }
}

impl From<Color> for [ColorValue; 3] {
    fn from(c: Color) -> Self {
        [c.red5(), c.green5(), c.blue5()]
    }
}
