//! Error types for redirect scheduling.

use std::time::Duration;

/// Failure reported by one of the host capabilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Host environment unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to read current location: {0}")]
    Location(String),
    #[error("Failed to register timer: {0}")]
    Timer(String),
    #[error("Navigation failed: {0}")]
    Navigation(String),
}

/// Rejected delay value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DelayError {
    #[error("Delay must be a number")]
    NotANumber,
    #[error("Delay must be a finite number, got {0}")]
    NotFinite(f64),
    #[error("Delay must not be negative, got {0}ms")]
    Negative(f64),
    #[error("Delay of {}ms exceeds the host timer limit", .0.as_millis())]
    TooLong(Duration),
}

/// Error returned by [`crate::schedule`].
///
/// `E` is the error type of a computed delay. It is carried through untouched
/// so the caller sees exactly what the delay function produced.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError<E> {
    #[error("Substring is required")]
    MissingSubstring,
    #[error("Invalid delay: {0}")]
    InvalidDelay(#[from] DelayError),
    #[error("Delay computation failed: {0:?}")]
    DelayComputation(E),
    #[error(transparent)]
    Host(#[from] HostError),
}
