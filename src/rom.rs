use std::{fmt::Display, ops::Add, path::Path};

use log::{debug, info};

use crate::{
    common::TILE_BYTES_4BPP,
    error::{ensure_gfx, GfxError, Result},
    lz77,
    palette::Palette,
    tileset::Tileset,
};

// It's easy to confuse GBA bus addresses (as stored in pointer tables) with
// byte offsets into the ROM file, so both get their own wrapper type.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct RomOffset(pub usize);

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct GbaAddr(pub u32);

const ROM_BASE: u32 = 0x0800_0000;
const ROM_END: u32 = 0x0A00_0000;

impl Add<usize> for RomOffset {
    type Output = RomOffset;

    fn add(self, other: usize) -> Self {
        RomOffset(self.0 + other)
    }
}

impl Display for RomOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

impl Display for GbaAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:08X}", self.0)
    }
}

impl TryFrom<GbaAddr> for RomOffset {
    type Error = GfxError;

    fn try_from(addr: GbaAddr) -> Result<Self> {
        ensure_gfx!(
            (ROM_BASE..ROM_END).contains(&addr.0),
            MalformedData,
            "{} is not a ROM address",
            addr
        );
        Ok(RomOffset((addr.0 - ROM_BASE) as usize))
    }
}

impl TryFrom<RomOffset> for GbaAddr {
    type Error = GfxError;

    fn try_from(offset: RomOffset) -> Result<Self> {
        ensure_gfx!(
            offset.0 < (ROM_END - ROM_BASE) as usize,
            OutOfRange,
            "{} is beyond the ROM address space",
            offset
        );
        Ok(GbaAddr(offset.0 as u32 + ROM_BASE))
    }
}

/// A ROM image with a read cursor.
///
/// Every read either succeeds and advances the cursor past the bytes it
/// consumed, or fails and leaves the cursor untouched.
#[derive(Clone)]
pub struct Rom {
    data: Vec<u8>,
    position: usize,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Self {
        Rom { data, position: 0 }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        info!("Opening ROM at {}", path.display());
        let data = std::fs::read(path)?;
        Ok(Self::new(data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> RomOffset {
        RomOffset(self.position)
    }

    /// Seeking to exactly the end is allowed; any read from there fails.
    pub fn seek(&mut self, offset: RomOffset) -> Result<()> {
        ensure_gfx!(
            offset.0 <= self.data.len(),
            OutOfRange,
            "seek offset {} out of range (ROM is 0x{:X} bytes)",
            offset,
            self.data.len()
        );
        self.position = offset.0;
        Ok(())
    }

    fn remaining(&self) -> &[u8] {
        &self.data[self.position..]
    }

    fn peek_n(&self, n: usize) -> Result<&[u8]> {
        ensure_gfx!(
            n <= self.remaining().len(),
            TruncatedData,
            "read of {} bytes at {} runs past the end of the ROM",
            n,
            self.position()
        );
        Ok(&self.remaining()[..n])
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let bytes = self.peek_n(n)?.to_vec();
        self.position += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.peek_n(1)?[0];
        self.position += 1;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.peek_n(2)?;
        let w = b[0] as u16 | (b[1] as u16) << 8;
        self.position += 2;
        Ok(w)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.peek_n(4)?;
        let w = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        self.position += 4;
        Ok(w)
    }

    /// Reads a 32-bit bus address and converts it into a ROM offset.
    pub fn read_pointer(&mut self) -> Result<RomOffset> {
        let start = self.position;
        let addr = GbaAddr(self.read_u32()?);
        match RomOffset::try_from(addr) {
            Ok(offset) => Ok(offset),
            Err(e) => {
                self.position = start;
                Err(e)
            }
        }
    }

    /// Decompresses an LZ77 block of tile graphics at the cursor.
    pub fn read_compressed_tiles(&mut self, bpp: u8) -> Result<Tileset> {
        ensure_gfx!(
            bpp == 4,
            InvalidArgument,
            "unsupported bit depth: {}bpp",
            bpp
        );
        let src = self.remaining();
        let size = lz77::declared_length(src)?;
        ensure_gfx!(
            size % TILE_BYTES_4BPP == 0,
            MalformedData,
            "declared length {} is not a multiple of the {}-byte tile size",
            size,
            TILE_BYTES_4BPP
        );
        let (data, consumed) = lz77::decompress(src)?;
        let tileset = Tileset::from_4bpp(&data)?;
        debug!(
            "Read {} compressed tiles at {} ({} bytes)",
            tileset.len(),
            self.position(),
            consumed
        );
        self.position += consumed;
        Ok(tileset)
    }

    /// Reads `count` uncompressed 4bpp tiles at the cursor.
    pub fn read_tiles(&mut self, count: usize) -> Result<Tileset> {
        // A byte count that overflows can never fit in the ROM either.
        let size = count.checked_mul(TILE_BYTES_4BPP).unwrap_or(usize::MAX);
        let tileset = Tileset::from_4bpp(self.peek_n(size)?)?;
        self.position += size;
        Ok(tileset)
    }

    pub fn read_palette(&mut self, count: usize) -> Result<Palette> {
        let palette = Palette::from_bytes(self.remaining(), count)?;
        debug!("Read {} colors at {}", count, self.position());
        self.position += palette.len() * 2;
        Ok(palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Color, tile::Tile};

    fn compressed_tiles(tile_count: usize) -> Vec<u8> {
        let raw: Vec<u8> = (0..tile_count * 32).map(|i| (i / 5) as u8).collect();
        lz77::compress(&raw).unwrap()
    }

    #[test]
    fn test_primitive_reads() {
        let mut rom = Rom::new(vec![0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(rom.read_u8().unwrap(), 0x01);
        assert_eq!(rom.read_u16().unwrap(), 0x1234);
        assert_eq!(rom.position(), RomOffset(3));
        assert_eq!(rom.read_u32().unwrap(), 0x12345678);
        let err = rom.read_bytes(1).unwrap_err();
        assert!(err.to_string().contains("past the end"));
        assert_eq!(rom.position(), RomOffset(7));
    }

    #[test]
    fn test_seek() {
        let mut rom = Rom::new(vec![0; 16]);
        rom.seek(RomOffset(16)).unwrap();
        assert!(matches!(rom.read_u8(), Err(GfxError::TruncatedData(_))));
        assert!(matches!(rom.seek(RomOffset(17)), Err(GfxError::OutOfRange(_))));
        assert_eq!(rom.position(), RomOffset(16));
    }

    #[test]
    fn test_read_pointer() {
        let mut rom = Rom::new(vec![0x40, 0x12, 0x00, 0x08, 0x00, 0x10, 0x00, 0x02]);
        assert_eq!(rom.read_pointer().unwrap(), RomOffset(0x1240));
        assert!(matches!(rom.read_pointer(), Err(GfxError::MalformedData(_))));
        assert_eq!(rom.position(), RomOffset(4));
    }

    #[test]
    fn test_offset_to_address() {
        assert_eq!(
            GbaAddr::try_from(RomOffset(0x1240)).unwrap(),
            GbaAddr(0x0800_1240)
        );
        assert_eq!(
            GbaAddr::try_from(RomOffset(0x1FF_FFFF)).unwrap(),
            GbaAddr(0x09FF_FFFF)
        );
        assert!(matches!(
            GbaAddr::try_from(RomOffset(0x200_0000)),
            Err(GfxError::OutOfRange(_))
        ));
        assert!(matches!(
            GbaAddr::try_from(RomOffset(0xF800_0000)),
            Err(GfxError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_read_compressed_tiles_advances_cursor() {
        let mut data = vec![0xFF; 8];
        let block = compressed_tiles(3);
        data.extend(&block);
        data.extend([0xAB, 0xCD]);
        let mut rom = Rom::new(data);
        rom.seek(RomOffset(8)).unwrap();
        let tileset = rom.read_compressed_tiles(4).unwrap();
        assert_eq!(tileset.len(), 3);
        assert_eq!(tileset[2].get(0, 0).unwrap(), ((64 / 5) as u8) & 0x0F);
        assert_eq!(rom.position(), RomOffset(8 + block.len()));
        assert_eq!(rom.read_u16().unwrap(), 0xCDAB);
    }

    #[test]
    fn test_read_compressed_tiles_bad_length() {
        let block = lz77::compress(&[0x22; 40]).unwrap();
        let mut rom = Rom::new(block);
        let err = rom.read_compressed_tiles(4).unwrap_err();
        assert!(matches!(err, GfxError::MalformedData(_)));
        assert_eq!(rom.position(), RomOffset(0));
    }

    #[test]
    fn test_read_compressed_tiles_bad_bpp() {
        let mut rom = Rom::new(compressed_tiles(1));
        assert!(matches!(
            rom.read_compressed_tiles(8),
            Err(GfxError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_read_compressed_tiles_truncated_keeps_cursor() {
        let mut block = compressed_tiles(2);
        block.truncate(block.len() - 3);
        let mut rom = Rom::new(block);
        assert!(matches!(
            rom.read_compressed_tiles(4),
            Err(GfxError::TruncatedData(_))
        ));
        assert_eq!(rom.position(), RomOffset(0));
    }

    #[test]
    fn test_read_tiles() {
        let mut data = vec![0u8; 64];
        data[32] = 0x5A;
        let mut rom = Rom::new(data);
        let tileset = rom.read_tiles(2).unwrap();
        assert_eq!(tileset[1], {
            let mut t = Tile::default();
            t.set(0, 0, 0xA).unwrap();
            t.set(1, 0, 0x5).unwrap();
            t
        });
        assert_eq!(rom.position(), RomOffset(64));
    }

    #[test]
    fn test_read_palette() {
        let mut data = vec![0u8; 4];
        data.extend(Color::from_rgb(255, 0, 0).to_bgr555());
        data.extend([0u8; 30]);
        let mut rom = Rom::new(data);
        rom.seek(RomOffset(4)).unwrap();
        let pal = rom.read_palette(16).unwrap();
        assert_eq!(pal.len(), 16);
        assert_eq!(pal[0].to_rgb(), [255, 0, 0]);
        assert_eq!(rom.position(), RomOffset(36));
    }

    #[test]
    fn test_huge_counts_are_truncated() {
        let mut rom = Rom::new(vec![0u8; 32]);
        assert!(matches!(
            rom.read_palette(usize::MAX / 2 + 1),
            Err(GfxError::TruncatedData(_))
        ));
        assert!(matches!(
            rom.read_tiles(usize::MAX / 32 + 1),
            Err(GfxError::TruncatedData(_))
        ));
        assert_eq!(rom.position(), RomOffset(0));
    }

    #[test]
    fn test_read_palette_truncated() {
        let mut rom = Rom::new(vec![0u8; 20]);
        assert!(matches!(
            rom.read_palette(16),
            Err(GfxError::TruncatedData(_))
        ));
        assert_eq!(rom.position(), RomOffset(0));
    }
}
