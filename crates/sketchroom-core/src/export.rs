//! PNG snapshot export of the raster buffer.

use std::path::Path;

use base64::Engine;
use thiserror::Error;

use crate::raster::RasterBuffer;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encode the buffer as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &RasterBuffer) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&buffer.to_rgba8())?;
    }
    Ok(png_data)
}

/// Write a PNG snapshot to `path`.
pub fn save_png(buffer: &RasterBuffer, path: impl AsRef<Path>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let data = encode_png(buffer)?;
    std::fs::write(path, &data).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Saved {} byte snapshot to {}", data.len(), path.display());
    Ok(data.len())
}

/// PNG snapshot as a `data:image/png;base64,...` URL.
pub fn png_data_url(buffer: &RasterBuffer) -> Result<String, ExportError> {
    let data = encode_png(buffer)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(data)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_encode_png_header_and_size() {
        let buffer = RasterBuffer::new(12, 7, Rgba::WHITE);
        let data = encode_png(&buffer).unwrap();
        assert_eq!(data[..8], PNG_MAGIC);

        let decoder = png::Decoder::new(std::io::Cursor::new(data));
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 12);
        assert_eq!(reader.info().height, 7);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        let mut buffer = RasterBuffer::new(4, 4, Rgba::WHITE);
        buffer.set(1, 1, Rgba::rgb(255, 0, 0));

        let written = save_png(&buffer, &path).unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk.len(), written);
        assert_eq!(on_disk[..8], PNG_MAGIC);
    }

    #[test]
    fn test_save_png_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("board.png");
        let buffer = RasterBuffer::new(2, 2, Rgba::WHITE);
        assert!(matches!(save_png(&buffer, &path), Err(ExportError::Write { .. })));
    }

    #[test]
    fn test_png_data_url() {
        let url = png_data_url(&RasterBuffer::new(1, 1, Rgba::BLACK)).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
