use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode a raster as PNG and wrap it in a `data:` URI.
pub fn to_data_uri(img: &RgbImage) -> Result<String> {
    let mut bytes: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(&bytes)))
}

/// PNG bytes carried by a data URI produced by [`to_data_uri`].
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let Some(payload) = uri.strip_prefix(DATA_URI_PREFIX) else {
        bail!("not a PNG data URI")
    };
    STANDARD
        .decode(payload)
        .context("Failed to decode base64 payload")
}

/// Write the PNG carried by `uri` to `path` atomically.
pub fn write_png(path: &Path, uri: &str) -> Result<()> {
    let bytes = decode_data_uri(uri)?;
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
    file.commit().context("Failed to save PNG")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_data_uri_prefix_and_png_payload() {
        let img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let uri = to_data_uri(&img).unwrap();
        assert!(uri.starts_with(DATA_URI_PREFIX));

        let bytes = decode_data_uri(&uri).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(*decoded.get_pixel(2, 1), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_decode_rejects_other_uris() {
        assert!(decode_data_uri("").is_err());
        assert!(decode_data_uri("data:image/jpeg;base64,AAAA").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_write_png_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.png");
        let uri = to_data_uri(&RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))).unwrap();

        write_png(&path, &uri).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, decode_data_uri(&uri).unwrap());

        assert!(write_png(&dir.path().join("bad.png"), "nope").is_err());
        assert!(!dir.path().join("bad.png").exists());
    }
}
