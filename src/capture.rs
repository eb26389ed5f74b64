//! Camera capture seam.
//!
//! The compositor only needs raw RGB frames, so the camera sits behind a
//! small trait. Production code plugs in a real camera implementation;
//! tests and the demo path use [`tests::MockCapture`] or pre-loaded files.

use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("capture failed: {0}")]
    Failed(String),
}

/// Source of captured photos.
pub trait CaptureSource {
    /// Capture one still frame.
    fn capture_still(&mut self) -> Result<RgbImage, CaptureError>;
}

/// Capture source backed by image files on disk, cycling through them in
/// order. Useful for demos and offline testing of the full pipeline.
pub struct FileCapture {
    paths: Vec<std::path::PathBuf>,
    next: usize,
}

impl FileCapture {
    pub fn new(paths: Vec<std::path::PathBuf>) -> Self {
        Self { paths, next: 0 }
    }
}

impl CaptureSource for FileCapture {
    fn capture_still(&mut self) -> Result<RgbImage, CaptureError> {
        if self.paths.is_empty() {
            return Err(CaptureError::Unavailable("no capture files".into()));
        }
        let path = &self.paths[self.next % self.paths.len()];
        self.next += 1;
        let img = image::open(path)
            .map_err(|err| CaptureError::Failed(format!("{}: {err}", path.display())))?;
        Ok(img.to_rgb8())
    }
}
