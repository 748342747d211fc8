use capturable::{CaptureResult, RasterImage};

/// What the ticket screen shows after the preview button is pressed.
#[derive(Clone, Debug, Default)]
pub enum PreviewState {
    /// Nothing captured yet, or the preview was closed.
    #[default]
    Empty,

    /// The captured ticket.
    HasImage(RasterImage),

    /// Why the capture failed.
    HasError(String),
}

impl PreviewState {
    /// Close the preview.
    pub fn close(&mut self) {
        *self = Self::Empty;
    }
}

impl From<CaptureResult> for PreviewState {
    fn from(value: CaptureResult) -> Self {
        match value {
            CaptureResult::Success(image) => Self::HasImage(image),
            CaptureResult::Error(error) => Self::HasError(error.to_string()),
        }
    }
}
