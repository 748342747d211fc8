use alloc::sync::Arc;
use core::{
    pin::Pin,
    task::{Context, Poll, Waker},
    time::Duration,
};
use std::time::Instant;

use futures::Stream;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, trace};

use crate::CaptureRequest;

type Notifier = Arc<dyn Fn() + Send + Sync + 'static>;

/// One-slot mailbox shared between a controller and its subscriber.
///
/// Publishing while the slot is occupied replaces the unconsumed request, the replaced request's
/// handler is dropped without being called.
#[derive(Default)]
pub(crate) struct Mailbox {
    state: Mutex<State>,
    ready: Condvar,
}

#[derive(Default)]
struct State {
    pending: Option<CaptureRequest>,
    subscribed: bool,
    closed: bool,
    waker: Option<Waker>,
    notifier: Option<Notifier>,
}

impl Mailbox {
    pub fn publish(&self, request: CaptureRequest) {
        let (superseded, waker, notifier) = {
            let mut state = self.state.lock();
            let superseded = state.pending.replace(request);
            (superseded, state.waker.take(), state.notifier.clone())
        };

        self.ready.notify_one();

        // Dropped outside the lock, the handler may own arbitrary state.
        if let Some(superseded) = superseded {
            debug!("Replaced unconsumed {superseded:?}");
            drop(superseded);
        }

        if let Some(waker) = waker {
            waker.wake();
        }

        if let Some(notifier) = notifier {
            notifier();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    pub fn subscribe(self: &Arc<Self>) -> Result<CaptureRequests, SubscribeError> {
        let mut state = self.state.lock();
        if state.subscribed {
            return Err(SubscribeError::AlreadySubscribed);
        }
        state.subscribed = true;

        trace!("Subscriber attached");

        Ok(CaptureRequests {
            mailbox: Arc::clone(self),
        })
    }

    pub fn close(&self) {
        let waker = {
            let mut state = self.state.lock();
            state.closed = true;
            state.waker.take()
        };

        self.ready.notify_all();

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// The render layer's subscription to a controller's capture requests.
///
/// Only one subscription can be attached to a controller at a time. Dropping it detaches it, a
/// request that is still pending stays in the slot for the next subscriber.
pub struct CaptureRequests {
    mailbox: Arc<Mailbox>,
}

impl CaptureRequests {
    /// Take the pending request without waiting.
    pub fn try_next(&self) -> Option<CaptureRequest> {
        self.mailbox.state.lock().pending.take()
    }

    /// Wait for a request.
    ///
    /// Returns `None` once the controller has been dropped and no request is left.
    pub fn recv(&self) -> Option<CaptureRequest> {
        let mut state = self.mailbox.state.lock();
        loop {
            if let Some(request) = state.pending.take() {
                return Some(request);
            }

            if state.closed {
                return None;
            }

            self.mailbox.ready.wait(&mut state);
        }
    }

    /// Wait up to `timeout` for a request.
    ///
    /// A timeout too large to represent as a deadline waits like [`Self::recv`].
    pub fn recv_timeout(&self, timeout: Duration) -> Option<CaptureRequest> {
        let mut state = self.mailbox.state.lock();
        if let Some(request) = state.pending.take() {
            return Some(request);
        }

        let Some(deadline) = Instant::now().checked_add(timeout) else {
            drop(state);
            return self.recv();
        };

        loop {
            if let Some(request) = state.pending.take() {
                return Some(request);
            }

            if state.closed {
                return None;
            }

            if self.mailbox.ready.wait_until(&mut state, deadline).timed_out() {
                return state.pending.take();
            }
        }
    }

    /// Register a callback that runs every time a request is published.
    ///
    /// The callback runs on the publishing thread after the request is in the slot, render layers
    /// use it to schedule a paint pass. If a request is already waiting the callback runs once
    /// immediately.
    pub fn set_notifier<F>(&self, notifier: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let notifier: Notifier = Arc::new(notifier);

        let has_pending = {
            let mut state = self.mailbox.state.lock();
            state.notifier = Some(Arc::clone(&notifier));
            state.pending.is_some()
        };

        if has_pending {
            notifier();
        }
    }

    /// If the controller has been dropped.
    pub fn is_closed(&self) -> bool {
        self.mailbox.state.lock().closed
    }
}

impl Stream for CaptureRequests {
    type Item = CaptureRequest;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut state = self.mailbox.state.lock();

        if let Some(request) = state.pending.take() {
            return Poll::Ready(Some(request));
        }

        if state.closed {
            return Poll::Ready(None);
        }

        state.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl Drop for CaptureRequests {
    fn drop(&mut self) {
        let notifier = {
            let mut state = self.mailbox.state.lock();
            state.subscribed = false;
            state.waker = None;
            state.notifier.take()
        };

        trace!("Subscriber detached");
        drop(notifier);
    }
}

/// Error variants from subscribing to a controller.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubscribeError {
    /// Another subscription is still attached to the controller.
    #[error("The controller already has a subscriber")]
    AlreadySubscribed,
}
