//! Extensions for results whose failures should be logged rather than handled.
//!

use core::{fmt::Display, panic::Location};

use tracing::{debug, error, warn};

/// Log the error then panic.
pub fn report_and_panic<Err: Display>(error: Err, message: &str) -> ! {
    error!("{message}: {error}");

    panic!("{message}: {error}");
}

/// Log the error as a warning and continue.
pub fn report<Err: Display>(error: Err, message: &str) {
    warn!("{message}: {error}");
}

/// Logging and panicking on failure.
pub trait Failure<T> {
    /// Log the failure and panic.
    fn report_and_panic(self, message: &str) -> T;

    /// Log the failure and discard it.
    fn report(self, message: &str) -> Option<T>;
}

/// Discard a failure, noting where it was discarded.
pub trait Ignore {
    /// Discard the value, logging at debug level if it was a failure.
    fn ignore(self);
}

impl<T, E: Display> Failure<T> for Result<T, E> {
    fn report_and_panic(self, message: &str) -> T {
        match self {
            Ok(value) => value,
            Err(error) => report_and_panic(error, message),
        }
    }

    fn report(self, message: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                report(error, message);
                None
            }
        }
    }
}

impl<T> Failure<T> for Option<T> {
    fn report_and_panic(self, message: &str) -> T {
        match self {
            Some(value) => value,
            None => report_and_panic("Was None", message),
        }
    }

    fn report(self, message: &str) -> Self {
        if self.is_none() {
            report("Was None", message);
        }

        self
    }
}

impl<T, E> Ignore for Result<T, E> {
    #[track_caller]
    fn ignore(self) {
        if self.is_err() {
            debug!("Ignoring error ({})", Location::caller());
        }
    }
}

impl<T> Ignore for Option<T> {
    #[track_caller]
    fn ignore(self) {
        if self.is_none() {
            debug!("Ignoring None ({})", Location::caller());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Failure, Ignore};

    #[test]
    fn report_keeps_success() {
        let value: Result<u8, &str> = Ok(3);
        assert_eq!(value.report("unused"), Some(3));

        let value: Result<u8, &str> = Err("bad");
        assert_eq!(value.report("expected"), None);
    }

    #[test]
    #[should_panic(expected = "Could not start: Was None")]
    fn report_and_panic_on_none() {
        let value: Option<u8> = None;
        value.report_and_panic("Could not start");
    }

    #[test]
    fn ignore_does_not_panic() {
        let value: Result<(), &str> = Err("bad");
        value.ignore();
        None::<u8>.ignore();
    }
}
