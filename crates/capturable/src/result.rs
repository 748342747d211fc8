use alloc::sync::Arc;
use core::fmt::{self, Debug};

use image::DynamicImage;
use thiserror::Error;

use crate::PixelFormat;

/// The outcome of a single capture request.
#[derive(Clone, Debug)]
pub enum CaptureResult {
    /// The render layer produced an image.
    Success(RasterImage),

    /// The render layer could not produce an image.
    Error(CaptureError),
}

impl CaptureResult {
    /// The captured image, if the capture succeeded.
    pub fn image(&self) -> Option<&RasterImage> {
        match self {
            Self::Success(image) => Some(image),
            Self::Error(_) => None,
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<RasterImage, CaptureError> {
        match self {
            Self::Success(image) => Ok(image),
            Self::Error(error) => Err(error),
        }
    }
}

impl From<Result<RasterImage, CaptureError>> for CaptureResult {
    fn from(value: Result<RasterImage, CaptureError>) -> Self {
        match value {
            Ok(image) => Self::Success(image),
            Err(error) => Self::Error(error),
        }
    }
}

/// Why the render layer could not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// The element has not been laid out yet so there are no pixels to capture.
    #[error("The element has not been laid out yet")]
    NotLaidOut,

    /// The render layer cannot produce images in the requested format.
    #[error("The pixel format {0} is not supported")]
    UnsupportedFormat(PixelFormat),

    /// Rendering the element failed.
    #[error("Rendering failed:\n{0}")]
    Render(String),
}

/// An immutable handle to a captured image.
///
/// Clones share the same pixels.
#[derive(Clone)]
pub struct RasterImage {
    image: Arc<DynamicImage>,
}

impl RasterImage {
    /// Wrap a rendered image.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// The pixels of the image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// If both handles refer to the same pixels.
    pub fn same_image(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

impl From<DynamicImage> for RasterImage {
    fn from(value: DynamicImage) -> Self {
        Self::new(value)
    }
}

impl Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color", &self.image.color())
            .finish()
    }
}
