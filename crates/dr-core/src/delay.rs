//! Fixed and computed redirect delays.
//!
//! A delay is resolved exactly once, synchronously, when a redirect is
//! scheduled. A computed delay is never re-evaluated when the timer fires.
//! Resolving only produces the raw value; it is checked with [`IntoDelay`]
//! once the redirect is known to be needed.

use std::convert::Infallible;
use std::time::Duration;

use crate::error::{DelayError, ScheduleError};

/// Largest delay browsers accept before the timer fires immediately (2^31 - 1 ms).
pub const MAX_DELAY_MS: u64 = i32::MAX as u64;

/// Delay function type used by [`DelaySpec::fixed`].
pub type NoComputation = fn() -> Result<Duration, Infallible>;

/// A raw delay value that can be checked and turned into a timer delay.
pub trait IntoDelay {
    fn into_delay(self) -> Result<Duration, DelayError>;
}

impl IntoDelay for Duration {
    fn into_delay(self) -> Result<Duration, DelayError> {
        check_range(self)?;
        Ok(self)
    }
}

/// JavaScript-style milliseconds.
impl IntoDelay for f64 {
    fn into_delay(self) -> Result<Duration, DelayError> {
        delay_from_millis(self)
    }
}

/// Either a fixed delay or a zero-argument function producing one.
pub enum DelaySpec<F, D = Duration> {
    Fixed(D),
    Computed(F),
}

impl DelaySpec<NoComputation> {
    /// Fixed delay with no computation attached.
    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed(delay)
    }

    /// Fixed delay given in milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self::Fixed(Duration::from_millis(millis))
    }
}

impl<F, D> DelaySpec<F, D> {
    pub fn computed(f: F) -> Self {
        Self::Computed(f)
    }
}

impl<F, D, E> DelaySpec<F, D>
where
    F: FnOnce() -> Result<D, E>,
{
    /// Produce the raw delay value, invoking the computation if there is one.
    ///
    /// Errors from the computation are returned unchanged inside
    /// [`ScheduleError::DelayComputation`]. The value itself is not checked.
    pub fn resolve(self) -> Result<D, ScheduleError<E>> {
        match self {
            Self::Fixed(delay) => Ok(delay),
            Self::Computed(f) => f().map_err(ScheduleError::DelayComputation),
        }
    }
}

impl<F, D: std::fmt::Debug> std::fmt::Debug for DelaySpec<F, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Convert a JavaScript-style millisecond number into a [`Duration`].
///
/// Fractional milliseconds are truncated, the way browser timers treat them.
pub fn delay_from_millis(millis: f64) -> Result<Duration, DelayError> {
    if !millis.is_finite() {
        return Err(DelayError::NotFinite(millis));
    }
    if millis < 0.0 {
        return Err(DelayError::Negative(millis));
    }
    Duration::from_millis(millis.trunc() as u64).into_delay()
}

fn check_range(delay: Duration) -> Result<(), DelayError> {
    if delay.as_millis() > MAX_DELAY_MS as u128 {
        return Err(DelayError::TooLong(delay));
    }
    Ok(())
}
