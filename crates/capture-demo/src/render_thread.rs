use alloc::sync::Arc;
use core::time::Duration;
use std::{
    io,
    sync::mpsc::{RecvTimeoutError, Sender, channel},
    thread::{self, JoinHandle},
};

use capturable::{CaptureController, CaptureError, CaptureRequests, SubscribeError};
use image::RgbaImage;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info_span, trace};
use utilities::{TimedSpan, failure::Ignore};

use crate::scene::{TicketScene, to_raster};

#[derive(PartialEq, Eq)]
enum Message {
    Render,
    Shutdown,
}

/// Owns the ticket's pixels and serves capture requests on its own thread.
///
/// Every paint pass serves at most one capture request, against the frame it just painted.
pub struct RenderThread {
    // Option allows for joining the thread which requires ownership.
    thread: Option<JoinHandle<()>>,
    sender: Sender<Message>,
    scene: Arc<Mutex<TicketScene>>,
}

impl RenderThread {
    /// Subscribe to `controller` and start rendering `scene`.
    ///
    /// Without other messages a paint pass runs every `frame_interval`.
    pub fn new(
        controller: &CaptureController,
        scene: TicketScene,
        frame_interval: Duration,
    ) -> Result<Self, Error> {
        let requests = controller.subscribe()?;
        let (sender, receiver) = channel();

        // A new request schedules a paint pass.
        {
            let sender = sender.clone();
            requests.set_notifier(move || sender.send(Message::Render).ignore());
        }

        let scene = Arc::new(Mutex::new(scene));

        let thread = {
            let scene = Arc::clone(&scene);
            thread::Builder::new()
                .name("Renderer".into())
                .spawn(move || {
                    let _span = info_span!("[Renderer]").entered();
                    let mut renderer = Renderer::new(scene, requests);

                    loop {
                        let message = match receiver.recv_timeout(frame_interval) {
                            Ok(message) => message,
                            Err(RecvTimeoutError::Timeout) => Message::Render,
                            Err(RecvTimeoutError::Disconnected) => break,
                        };

                        // Pump backed up events
                        let mut messages = vec![message];
                        while let Ok(message) = receiver.try_recv() {
                            if !messages.contains(&message) {
                                messages.push(message);
                            }
                        }

                        if messages.contains(&Message::Shutdown) {
                            break;
                        }

                        renderer.render();
                    }

                    drop(renderer);
                })
                .map_err(Error::Spawn)?
        };

        Ok(Self {
            thread: Some(thread),
            sender,
            scene,
        })
    }

    /// Request a paint pass.
    pub fn render(&self) {
        self.sender.send(Message::Render).ignore();
    }

    /// Lay the ticket out and repaint.
    pub fn layout(&self, width: u32, height: u32) {
        self.scene.lock().layout(width, height);
        self.render();
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.sender.send(Message::Shutdown).ignore();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Joining Render thread returned an error.");
            };
        }
    }
}

struct Renderer {
    scene: Arc<Mutex<TicketScene>>,
    requests: CaptureRequests,
    frame: Option<RgbaImage>,
    frames: u64,
}

impl Renderer {
    fn new(scene: Arc<Mutex<TicketScene>>, requests: CaptureRequests) -> Self {
        Self {
            scene,
            requests,
            frame: None,
            frames: 0,
        }
    }

    fn render(&mut self) {
        // Drain before painting so the request sees a scene at least as new as itself.
        let request = self.requests.try_next();

        self.frame = self.scene.lock().paint();
        self.frames += 1;
        trace!("Painted frame {}", self.frames);

        let Some(request) = request else {
            return;
        };

        let _timing = TimedSpan::start("Capture");
        let pixel_format = request.pixel_format();
        debug!("Capturing frame {} as {pixel_format}", self.frames);

        let result = match &self.frame {
            Some(frame) => to_raster(frame, pixel_format),
            None => Err(CaptureError::NotLaidOut),
        };

        request.complete(result.into());
    }
}

/// Error variants from starting the render thread.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The controller already has a render layer.
    #[error(transparent)]
    Subscribe(#[from] SubscribeError),

    /// The thread could not be started.
    #[error("Could not start the render thread:\n{0}")]
    Spawn(#[source] io::Error),
}
