use std::{
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
};

use capturable::RasterImage;
use chrono::Local;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;
use tracing::info;
use utilities::TimedSpan;

/// Writes captured tickets to a directory as PNG files.
pub struct CaptureSaver {
    directory: PathBuf,
}

impl CaptureSaver {
    /// Save into `directory`, creating it when the first capture is saved.
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    /// The directory captures are saved into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Save the capture, returning the path written.
    pub fn save(&self, capture: &RasterImage) -> Result<PathBuf, Error> {
        let _timing = TimedSpan::start("Saving to file");

        create_dir_all(&self.directory).map_err(Error::CreateDir)?;

        let name = format!("Ticket {}.png", Local::now().format("%F %H%M%S%.3f"));
        let path = self.directory.join(name);

        // PNG holds 8 and 16 bit data, anything else is saved as RGBA8.
        match capture.image() {
            pixels @ (DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageRgba16(_)) => pixels.save_with_format(&path, ImageFormat::Png)?,
            pixels => DynamicImage::ImageRgba8(pixels.to_rgba8())
                .save_with_format(&path, ImageFormat::Png)?,
        }

        info!("Saved capture to {}", path.display());
        Ok(path)
    }
}

/// Error variants from saving a capture.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The output directory could not be created.
    #[error("Could not create the capture directory:\n{0}")]
    CreateDir(#[source] io::Error),

    /// The image could not be encoded or written.
    #[error("Could not write the capture:\n{0}")]
    Write(#[from] image::ImageError),
}
