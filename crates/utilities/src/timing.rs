use core::time::Duration;
use std::time::Instant;

use tracing::debug;

/// Display the duration with the largest unit that keeps it readable.
///
/// `>= 10s` whole seconds, `>= 1s` seconds to 1dp, then whole milliseconds, microseconds or
/// nanoseconds.
pub fn display_duration(duration: Duration) -> String {
    match duration {
        d if d.as_secs() >= 10 => format!("{}s", d.as_secs()),
        d if d.as_secs() >= 1 => format!("{:.1}s", d.as_secs_f32()),
        d if d.as_millis() >= 1 => format!("{}ms", d.as_millis()),
        d if d.as_micros() >= 1 => format!("{}µs", d.as_micros()),
        d => format!("{}ns", d.as_nanos()),
    }
}

/// Logs how long it lived for when dropped.
///
/// Logged as `[Timing] {label} took {duration}`.
pub struct TimedSpan {
    label: &'static str,
    start: Instant,
}

impl TimedSpan {
    /// Start timing `label`.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Time elapsed since the span started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimedSpan {
    fn drop(&mut self) {
        debug!(
            "[Timing] {} took {}",
            self.label,
            display_duration(self.elapsed())
        );
    }
}
