use core::fmt::{self, Debug};

use crate::{CaptureError, CaptureResult, PixelFormat, RasterImage};

pub(crate) type CompletionHandler = Box<dyn FnOnce(CaptureResult) + Send + 'static>;

/// A request for the render layer to capture the element.
///
/// Completing the request consumes it, so the handler runs at most once. A request that is dropped
/// without being completed never runs its handler.
pub struct CaptureRequest {
    pixel_format: PixelFormat,
    on_complete: CompletionHandler,
}

impl CaptureRequest {
    pub(crate) fn new(pixel_format: PixelFormat, on_complete: CompletionHandler) -> Self {
        Self {
            pixel_format,
            on_complete,
        }
    }

    /// The format the caller wants the image in.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Deliver the result to the caller.
    pub fn complete(self, result: CaptureResult) {
        (self.on_complete)(result);
    }

    /// Deliver a successful capture.
    pub fn succeed(self, image: RasterImage) {
        self.complete(CaptureResult::Success(image));
    }

    /// Deliver a failed capture.
    pub fn fail(self, error: CaptureError) {
        self.complete(CaptureResult::Error(error));
    }
}

impl Debug for CaptureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRequest")
            .field("pixel_format", &self.pixel_format)
            .finish_non_exhaustive()
    }
}
