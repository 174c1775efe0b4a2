// LZ77 codec in the format understood by the GBA BIOS (SWI 0x11/0x12).
//
// Header: 0x10 followed by the decompressed size as a 24-bit little-endian value.
// Body: a flag byte governs the next 8 blocks, MSB first. A clear bit is one
// literal byte; a set bit is a two-byte back-reference:
//   byte 0: (count - 3) << 4 | (disp - 1) >> 8
//   byte 1: (disp - 1) & 0xFF
use log::debug;

use crate::error::{ensure_gfx, GfxError, Result};

pub const HEADER_TAG: u8 = 0x10;
pub const HEADER_LEN: usize = 4;

const MIN_MATCH: usize = 3;
const MAX_MATCH: usize = 18;
const WINDOW: usize = 4096;
// Displacement 1 breaks the BIOS VRAM variant, which writes 16 bits at a time.
const MIN_DISP: usize = 2;

/// Reads the header and returns the decompressed size it declares.
pub fn declared_length(data: &[u8]) -> Result<usize> {
    ensure_gfx!(
        data.len() >= HEADER_LEN,
        TruncatedData,
        "compressed data ends inside its header"
    );
    ensure_gfx!(
        data[0] == HEADER_TAG,
        MalformedData,
        "unexpected header tag 0x{:02X} (expected 0x{:02X})",
        data[0],
        HEADER_TAG
    );
    Ok(data[1] as usize | (data[2] as usize) << 8 | (data[3] as usize) << 16)
}

fn read_byte(data: &[u8], pos: &mut usize) -> Result<u8> {
    let b = *data.get(*pos).ok_or_else(|| {
        GfxError::TruncatedData("compressed data ends before its declared length".to_string())
    })?;
    *pos += 1;
    Ok(b)
}

/// Decompresses the stream at the start of `data`. Returns the output and the
/// number of input bytes consumed.
pub fn decompress(data: &[u8]) -> Result<(Vec<u8>, usize)> {
    let size = declared_length(data)?;
    let mut out: Vec<u8> = Vec::with_capacity(size);
    let mut pos = HEADER_LEN;
    while out.len() < size {
        let flags = read_byte(data, &mut pos)?;
        for bit in 0..8 {
            if out.len() >= size {
                break;
            }
            if flags & (0x80 >> bit) == 0 {
                // Literal
                out.push(read_byte(data, &mut pos)?);
                continue;
            }

            // Copy earlier output, relative to the end:
            let b0 = read_byte(data, &mut pos)? as usize;
            let b1 = read_byte(data, &mut pos)? as usize;
            let count = (b0 >> 4) + MIN_MATCH;
            let disp = ((b0 & 0x0F) << 8 | b1) + 1;
            ensure_gfx!(
                disp <= out.len(),
                MalformedData,
                "back-reference {} bytes behind offset {} points before the start of the output",
                disp,
                out.len()
            );
            let start = out.len() - disp;
            let count = count.min(size - out.len());
            for i in start..(start + count) {
                let b = out[i];
                out.push(b);
            }
        }
    }
    debug!("Decompressed {} bytes into {}", pos, out.len());
    Ok((out, pos))
}

fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
    let max_len = MAX_MATCH.min(data.len() - pos);
    let mut best = (0, 0);
    for disp in MIN_DISP..=WINDOW.min(pos) {
        let start = pos - disp;
        let len = (0..max_len)
            .take_while(|&i| data[start + i] == data[pos + i])
            .count();
        if len > best.0 {
            best = (len, disp);
            if len == max_len {
                break;
            }
        }
    }
    best
}

/// Compresses `data` with a greedy longest-match search.
///
/// Input longer than 0xFFFFFF bytes cannot be described by the header and is
/// rejected.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    ensure_gfx!(
        data.len() <= 0xFF_FFFF,
        InvalidArgument,
        "{} bytes is too large for an LZ77 header",
        data.len()
    );
    let mut out = vec![HEADER_TAG];
    out.extend(&(data.len() as u32).to_le_bytes()[..3]);
    let mut pos = 0;
    while pos < data.len() {
        let flag_pos = out.len();
        out.push(0);
        for bit in 0..8 {
            if pos >= data.len() {
                break;
            }
            let (len, disp) = longest_match(data, pos);
            if len >= MIN_MATCH {
                out[flag_pos] |= 0x80 >> bit;
                let d = disp - 1;
                out.push(((len - MIN_MATCH) << 4 | d >> 8) as u8);
                out.push((d & 0xFF) as u8);
                pos += len;
            } else {
                out.push(data[pos]);
                pos += 1;
            }
        }
    }
    Ok(out)
}
