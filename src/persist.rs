use std::{fs, io::BufWriter, path::Path};

use anyhow::{ensure, Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::{palette::Palette, render::Bitmap};

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn save_palette(path: &Path, palette: &Palette) -> Result<()> {
    save_json(path, palette)
}

pub fn save_png(path: &Path, bitmap: &Bitmap) -> Result<()> {
    info!(
        "Saving {}x{} image to {}",
        bitmap.width,
        bitmap.height,
        path.display()
    );
    ensure!(
        bitmap.width > 0 && bitmap.height > 0,
        "Cannot save an empty {}x{} image to {}",
        bitmap.width,
        bitmap.height,
        path.display()
    );
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), bitmap.width, bitmap.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&bitmap.data)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_palette_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Palettes").join("title.json");
        let palette = Palette::new(vec![Color::from_555(31, 0, 0), Color::from_555(1, 2, 3)]);
        save_palette(&path, &palette).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[31, 0, 0]") || text.contains("[31,0,0]"));
        let loaded: Palette = load_json(&path).unwrap();
        assert_eq!(loaded, palette);
    }

    #[test]
    fn test_png_rejects_empty_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let bitmap = Bitmap {
            width: 64,
            height: 0,
            data: vec![],
        };
        let err = save_png(&path, &bitmap).unwrap_err();
        assert!(err.to_string().starts_with("Cannot save an empty 64x0 image"));
        assert!(!path.exists());
    }

    #[test]
    fn test_png_header_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        let bitmap = Bitmap {
            width: 8,
            height: 16,
            data: vec![0x80; 8 * 16 * 4],
        };
        save_png(&path, &bitmap).unwrap();

        let decoder = png::Decoder::new(fs::File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (8, 16));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&buf[..info.buffer_size()], &bitmap.data[..]);
    }
}
