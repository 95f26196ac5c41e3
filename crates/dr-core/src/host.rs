//! Host capabilities consumed by the redirect engine.
//!
//! In a browser these are `window.location.href`, `location.replace()` and
//! `setTimeout`. None of the traits require `Send`; browser handles are
//! single-threaded.

use std::time::Duration;

use crate::error::HostError;

/// Read-only access to the current page address.
pub trait LocationReader {
    /// Full address of the active page.
    fn href(&self) -> Result<String, HostError>;
}

/// Replace-navigation: overwrites the current history entry.
pub trait Navigator {
    fn replace(&self, url: &str) -> Result<(), HostError>;
}

/// One-shot deferred execution.
pub trait Scheduler {
    /// Run `task` once, after at least `delay` has elapsed.
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>) -> Result<(), HostError>;
}
