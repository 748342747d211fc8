use alloc::sync::Arc;
use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{channel::oneshot, executor::block_on};

use crate::{
    CaptureRequest, CaptureRequests, CaptureResult, PixelFormat, SubscribeError,
    channel::Mailbox,
};

/// Issues capture requests for a single visual element.
///
/// The controller never captures anything itself. It publishes requests to the render layer that
/// subscribed to it, which completes them on its next paint pass.
///
/// Only the most recent unconsumed request is kept: issuing a request before the render layer has
/// drained the previous one replaces it, and the replaced request never completes. Callers that
/// need every result should wait for each capture before issuing the next.
///
/// Requests must be issued from event handlers, never from inside the render pass of the element
/// being captured.
pub struct CaptureController {
    mailbox: Arc<Mailbox>,
}

impl CaptureController {
    /// Create a controller with no subscriber.
    pub fn new() -> Self {
        Self {
            mailbox: Arc::new(Mailbox::default()),
        }
    }

    /// Request a capture, `on_complete` is called with the result.
    ///
    /// Returns immediately. `on_complete` runs on the render layer's thread.
    pub fn request<F>(&self, pixel_format: PixelFormat, on_complete: F)
    where
        F: FnOnce(CaptureResult) + Send + 'static,
    {
        self.mailbox
            .publish(CaptureRequest::new(pixel_format, Box::new(on_complete)));
    }

    /// Request a capture in the default pixel format, `on_complete` is called with the result.
    pub fn request_default<F>(&self, on_complete: F)
    where
        F: FnOnce(CaptureResult) + Send + 'static,
    {
        self.request(PixelFormat::default(), on_complete);
    }

    /// Request a capture and get a future that resolves with the result.
    ///
    /// The request is published immediately, not when the future is first polled. If the request
    /// is replaced by a newer one, or the render layer never drains it, the future never resolves;
    /// apply a timeout where that matters.
    pub fn capture(&self, pixel_format: PixelFormat) -> Capture {
        let (sender, receiver) = oneshot::channel();

        self.request(pixel_format, move |result| {
            // The caller may have stopped waiting.
            let _ = sender.send(result);
        });

        Capture {
            receiver,
            abandoned: false,
        }
    }

    /// Request a capture and block the current thread until the result arrives.
    ///
    /// Has the same hang behaviour as [`Self::capture`]. Calling this from the render layer's
    /// thread deadlocks.
    pub fn capture_blocking(&self, pixel_format: PixelFormat) -> CaptureResult {
        block_on(self.capture(pixel_format))
    }

    /// Attach the render layer to this controller.
    pub fn subscribe(&self) -> Result<CaptureRequests, SubscribeError> {
        self.mailbox.subscribe()
    }

    /// If a request is waiting to be drained.
    pub fn has_pending(&self) -> bool {
        self.mailbox.has_pending()
    }
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.mailbox.close();
    }
}

/// The pending result of [`CaptureController::capture`].
#[must_use = "the result of the capture is lost if the future is dropped"]
#[derive(Debug)]
pub struct Capture {
    receiver: oneshot::Receiver<CaptureResult>,
    abandoned: bool,
}

impl Capture {
    /// If a poll has seen the request dropped without completing, the future can no longer
    /// resolve.
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }
}

impl Future for Capture {
    type Output = CaptureResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.abandoned {
            return Poll::Pending;
        }

        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),

            // Replaced or dropped by the render layer, nothing will ever wake this task.
            Poll::Ready(Err(oneshot::Canceled)) => {
                self.abandoned = true;
                Poll::Pending
            }

            Poll::Pending => Poll::Pending,
        }
    }
}
