//! # Capture Demo
//! Renders a booking ticket on its own thread and captures it through a `CaptureController`, the
//! way a "Preview Ticket Image" button would.
//!

#![allow(clippy::std_instead_of_alloc)]

extern crate alloc;

use core::time::Duration;
use std::sync::mpsc::channel;

use capturable::CaptureController;
use capture_saver::CaptureSaver;
use config::Config;
use futures::executor::block_on;
use mimalloc::MiMalloc;
use preview::PreviewState;
use render_thread::RenderThread;
use scene::TicketScene;
use tracing::{error, info, info_span, warn};
use utilities::failure::{Failure, Ignore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod capture_saver;
mod config;
#[cfg(feature = "log")]
mod logger;
mod preview;
mod render_thread;
mod scene;

/// The Cargo package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long the callback form waits before giving up on the render layer.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// If this instance should have debug enabled.
pub fn should_debug() -> bool {
    std::env::args().any(|arg| arg.eq("--debug"))
}

fn main() {
    config::create_config_dir().report_and_panic("The config folder could not be created");

    // Set up logger
    #[cfg(feature = "log")]
    let _logger_guards = logger::setup_logger(&config::config_dir(), should_debug())
        .report_and_panic("Could not set up the logger");

    // Log application start
    let _span = info_span!("[Main Thread]").entered();
    info!("Capture Demo v{}", VERSION);

    let config = load_config();

    // The ticket and its render layer
    let controller = CaptureController::new();
    let scene = TicketScene::new(config.booking());
    let renderer = RenderThread::new(&controller, scene, config.frame_interval())
        .report_and_panic("Could not start the renderer");

    let [width, height] = config.ticket_size;
    renderer.layout(width, height);

    let saver = config
        .save_captures
        .then(|| CaptureSaver::new(config.output_dir()));

    // Preview button presses, each waits for its capture before the next press.
    for press in 1..=config.captures {
        let _span = info_span!("[Preview Button]", press).entered();

        let mut state = PreviewState::from(block_on(controller.capture(config.pixel_format)));
        show_preview(&state, saver.as_ref());
        state.close();
    }

    // The same capture through the callback form, completed on the render thread.
    {
        let _span = info_span!("[Callback Capture]").entered();

        let (sender, receiver) = channel();
        controller.request(config.pixel_format, move |result| {
            sender.send(result).ignore();
        });

        match receiver.recv_timeout(CALLBACK_TIMEOUT) {
            Ok(result) => show_preview(&PreviewState::from(result), saver.as_ref()),
            Err(e) => warn!("The render layer did not complete the capture: {e}"),
        }
    }

    drop(renderer);
    info!("Exiting");
}

fn load_config() -> Config {
    match Config::try_load() {
        Ok(Some(config)) => config,

        Ok(None) => {
            info!("No config file, creating one.");
            let config = Config::default();
            config.save().report("Could not save the default config").ignore();
            config
        }

        Err(e) => {
            warn!("Could not load the config file, using defaults:\n{e}");
            Config::default()
        }
    }
}

fn show_preview(state: &PreviewState, saver: Option<&CaptureSaver>) {
    match state {
        PreviewState::Empty => {}

        PreviewState::HasImage(image) => {
            info!("Preview of ticket image: {image:?}");

            if let Some(saver) = saver {
                saver.save(image).report("Could not save the capture").ignore();
            }
        }

        PreviewState::HasError(message) => error!("Could not capture the ticket: {message}"),
    }
}
