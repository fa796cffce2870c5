use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::{debug, info};

use crate::cli::CompressionLevel;
use crate::error::IcropperError;

/// Save a texture, picking the encoder from the file extension (PNG when the
/// extension is unknown). Only PNG output is run through oxipng.
pub fn save_texture(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), IcropperError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| IcropperError::OutputWrite {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

    // Encode in memory
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, format)
        .map_err(|e| IcropperError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = match compress {
        Some(level) if format == ImageFormat::Png => {
            let opts = match level {
                CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
                CompressionLevel::Max => oxipng::Options::max_compression(),
            };
            oxipng::optimize_from_memory(&encoded.into_inner(), &opts).map_err(|e| {
                IcropperError::PngCompress {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?
        }
        Some(_) => {
            debug!("Compression skipped for non-PNG texture {}", path.display());
            encoded.into_inner()
        }
        None => encoded.into_inner(),
    };

    fs::write(path, output_data).map_err(|e| IcropperError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("Saved {}", path.display());
    Ok(())
}
