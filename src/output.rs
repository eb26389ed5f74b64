//! Saving composed canvases to disk.
//!
//! Format follows the file extension: JPEG gets an explicit quality
//! setting, PNG is lossless, anything else is delegated to the encoder
//! registry. Parent directories are created on demand so a fresh output
//! directory never needs manual setup.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use thiserror::Error;
use tracing::info;

use crate::compose::fit;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode '{path}': {source}")]
    Encode {
        path: String,
        source: image::ImageError,
    },
}

/// JPEG quality, clamped to the valid 1..=100 range on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Save a composed canvas to `path`, creating parent directories as
/// needed. The extension picks the format.
pub fn save_image(image: &RgbImage, path: &Path, quality: Quality) -> Result<(), OutputError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => save_jpeg(image, path, quality)?,
        Some("png") => {
            image
                .save_with_format(path, ImageFormat::Png)
                .map_err(|source| OutputError::Encode {
                    path: path.display().to_string(),
                    source,
                })?;
        }
        _ => {
            image.save(path).map_err(|source| OutputError::Encode {
                path: path.display().to_string(),
                source,
            })?;
        }
    }

    info!(path = %path.display(), "saved composite");
    Ok(())
}

fn save_jpeg(image: &RgbImage, path: &Path, quality: Quality) -> Result<(), OutputError> {
    let file = fs::File::create(path).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;
    let encoder = JpegEncoder::new_with_quality(file, quality.value() as u8);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|source| OutputError::Encode {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}

/// Scale a composite down to fit within `max_width` x `max_height`,
/// letterboxed so the thumbnail always has the requested dimensions.
pub fn thumbnail(image: &RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    fit::fit_letterbox(image, max_width, max_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    fn sample() -> RgbImage {
        RgbImage::from_pixel(32, 24, Rgb([120, 60, 30]))
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(250).value(), 100);
        assert_eq!(Quality::default().value(), 95);
    }

    #[test]
    fn saves_jpeg_and_reloads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shot.jpg");
        save_image(&sample(), &path, Quality::default()).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (32, 24));
    }

    #[test]
    fn saves_png_losslessly() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shot.png");
        save_image(&sample(), &path, Quality::default()).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c/shot.png");
        save_image(&sample(), &path, Quality::default()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn thumbnail_fits_within_bounds() {
        let wide = RgbImage::from_pixel(800, 200, Rgb([10, 20, 30]));
        let thumb = thumbnail(&wide, 100, 100);
        assert_eq!(thumb.dimensions(), (100, 100));
        // Letterbox bars above and below the scaled content.
        assert_eq!(thumb.get_pixel(50, 2), &Rgb([0, 0, 0]));
        assert_eq!(thumb.get_pixel(50, 50), &Rgb([10, 20, 30]));
    }
}
