use crate::common::ColorValue;

pub fn scale_color(c: ColorValue) -> u8 {
    ((c as u16) * 255 / 31) as u8
}

pub fn unscale_color(c: u8) -> ColorValue {
    c >> 3
}
