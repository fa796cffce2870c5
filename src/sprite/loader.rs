use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;

use super::SourceImage;
use crate::config::CropOptions;
use crate::error::IcropperError;

/// Load and crop every source image.
///
/// Images are decoded and cropped in parallel; the result keeps the order of
/// `filenames`, which is the order the compositor registers them in.
pub fn load_sources(
    filenames: &[String],
    src_path: Option<&Path>,
    options: CropOptions,
) -> Result<Vec<SourceImage>> {
    if filenames.is_empty() {
        return Err(IcropperError::NoImages.into());
    }
    if let Some(dir) = src_path
        && !dir.exists()
    {
        return Err(IcropperError::InputNotFound(dir.to_path_buf()).into());
    }

    info!("Loading {} images...", filenames.len());

    filenames
        .par_iter()
        .map(|filename| -> Result<SourceImage> {
            let mut image = SourceImage::create_with_file_name(filename, src_path)
                .with_context(|| format!("can't open file: {}", filename))?
                .with_options(options);
            image
                .crop()
                .with_context(|| format!("cropping file failed: {}", filename))?;
            Ok(image)
        })
        .collect()
}

/// Check if a file name carries one of `extensions` (".png" or "png" style,
/// case-insensitive).
pub fn has_extension(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.png"), &[".png", ".bmp"]));
        assert!(has_extension(Path::new("a.BMP"), &[".png", ".bmp"]));
        assert!(has_extension(Path::new("dir/a.png"), &["png"]));
        assert!(!has_extension(Path::new("a.jpg"), &[".png"]));
        assert!(!has_extension(Path::new("png"), &[".png"]));
    }

    #[test]
    fn test_load_sources_keeps_order() {
        let dir = std::env::temp_dir().join(format!("icropper-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        RgbaImage::from_pixel(50, 50, Rgba([1, 2, 3, 255]))
            .save(dir.join("b.png"))
            .unwrap();
        RgbaImage::from_pixel(20, 30, Rgba([1, 2, 3, 255]))
            .save(dir.join("a.png"))
            .unwrap();

        let names = vec!["b.png".to_string(), "a.png".to_string()];
        let images = load_sources(&names, Some(&dir), CropOptions::default()).unwrap();

        assert_eq!(images[0].file_name(), "b.png");
        assert_eq!(images[1].file_name(), "a.png");
        assert!(images.iter().all(SourceImage::is_cropped));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_sources_reports_missing_file() {
        let names = vec!["missing.png".to_string()];
        let err = load_sources(&names, None, CropOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.png"));
    }

    #[test]
    fn test_load_sources_requires_files() {
        assert!(load_sources(&[], None, CropOptions::default()).is_err());
    }
}
