use std::path::Path;

use tracing::{
    Level,
    subscriber::{SetGlobalDefaultError, set_global_default},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt};

const LOG_FILE: &str = "capture-demo.log";

/// Install the global logger, writing to stdout and to a log file in `log_dir`.
///
/// The returned guards flush the writers when dropped and must be kept alive.
pub fn setup_logger(log_dir: &Path, debug: bool) -> Result<[WorkerGuard; 2], SetGlobalDefaultError> {
    let filter = tracing_subscriber::filter::Targets::new().with_default(if debug {
        Level::TRACE
    } else {
        Level::INFO
    });

    // stdout logger
    let (std_writer, std_guard) = tracing_appender::non_blocking(std::io::stdout());
    let std_logger = tracing_subscriber::fmt::layer()
        .with_writer(std_writer)
        .with_ansi(false)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    // file logger
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let file_logger = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false);

    // Register loggers
    let collector = tracing_subscriber::registry()
        .with(std_logger)
        .with(file_logger)
        .with(filter);

    set_global_default(collector)?;

    Ok([std_guard, file_guard])
}
