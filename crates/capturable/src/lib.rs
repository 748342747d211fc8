//! # Capturable
//! Request an on-demand snapshot of a rendered element and receive it as a raster image.
//!
//! A [`CaptureController`] is owned by one visual element. Application code calls
//! [`CaptureController::request`] or [`CaptureController::capture`] from an event handler, the
//! render layer that owns the pixels holds the only [`CaptureRequests`] subscription and
//! completes each request it observes on its next paint pass.
//!

extern crate alloc;

pub use channel::{CaptureRequests, SubscribeError};
pub use controller::{Capture, CaptureController};
pub use pixel_format::PixelFormat;
pub use request::CaptureRequest;
pub use result::{CaptureError, CaptureResult, RasterImage};

mod channel;
mod controller;
mod pixel_format;
mod request;
mod result;
