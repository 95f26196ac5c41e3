//! Conditional delayed redirect.
//!
//! One operation: if the current address does not contain a substring,
//! replace-navigate to a target URL once a delay has elapsed.

use std::time::Duration;

use crate::delay::{DelaySpec, IntoDelay};
use crate::error::ScheduleError;
use crate::host::{LocationReader, Navigator, Scheduler};

/// What a call to [`schedule`] decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The address contains the substring. No timer was created.
    Suppressed,
    /// One timer was registered and will navigate after `delay`.
    Scheduled { delay: Duration },
}

impl RedirectOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }
}

/// Case-sensitive, exact substring containment. Every address contains `""`.
#[inline]
pub fn is_suppressed(href: &str, substring: &str) -> bool {
    href.contains(substring)
}

/// Redirect to `target_url` after `delay` unless the current address contains
/// `substring`.
///
/// The delay is resolved first, so a computed delay runs exactly once even
/// when the redirect ends up suppressed. Errors from the computation propagate
/// before any timer exists. The resolved value is only checked when a timer
/// is actually needed; a suppressed call never fails on its delay.
/// `target_url` is not validated; a navigation failure happens inside the
/// timer and is only logged.
pub fn schedule<L, N, S, F, D, E>(
    location: &L,
    navigator: &N,
    scheduler: &S,
    substring: &str,
    target_url: &str,
    delay: DelaySpec<F, D>,
) -> Result<RedirectOutcome, ScheduleError<E>>
where
    L: LocationReader + ?Sized,
    N: Navigator + Clone + 'static,
    S: Scheduler + ?Sized,
    F: FnOnce() -> Result<D, E>,
    D: IntoDelay,
{
    let raw_delay = delay.resolve()?;
    let href = location.href()?;

    if is_suppressed(&href, substring) {
        log::debug!("Redirect suppressed: '{}' found in {}", substring, href);
        return Ok(RedirectOutcome::Suppressed);
    }

    let delay = raw_delay.into_delay()?;

    let navigator = navigator.clone();
    let target = target_url.to_string();
    scheduler.defer(
        delay,
        Box::new(move || {
            log::trace!("Redirect timer fired, replacing location with {}", target);
            if let Err(e) = navigator.replace(&target) {
                log::warn!("Redirect to {} failed: {}", target, e);
            }
        }),
    )?;

    log::debug!(
        "Redirect to {} scheduled in {}ms ('{}' not in {})",
        target_url,
        delay.as_millis(),
        substring,
        href
    );
    Ok(RedirectOutcome::Scheduled { delay })
}

/// Bundles the three host capabilities so callers do not thread them through
/// every call.
#[derive(Debug, Clone)]
pub struct Redirector<L, N, S> {
    location: L,
    navigator: N,
    scheduler: S,
}

impl<L, N, S> Redirector<L, N, S>
where
    L: LocationReader,
    N: Navigator + Clone + 'static,
    S: Scheduler,
{
    pub fn new(location: L, navigator: N, scheduler: S) -> Self {
        Self {
            location,
            navigator,
            scheduler,
        }
    }

    /// Redirect with either a fixed or a computed delay.
    pub fn dynamic<F, D, E>(
        &self,
        substring: &str,
        target_url: &str,
        delay: DelaySpec<F, D>,
    ) -> Result<RedirectOutcome, ScheduleError<E>>
    where
        F: FnOnce() -> Result<D, E>,
        D: IntoDelay,
    {
        schedule(
            &self.location,
            &self.navigator,
            &self.scheduler,
            substring,
            target_url,
            delay,
        )
    }

    /// Redirect with a fixed delay. Same as [`Self::dynamic`] with
    /// [`DelaySpec::Fixed`].
    pub fn fixed(
        &self,
        substring: &str,
        target_url: &str,
        delay: Duration,
    ) -> Result<RedirectOutcome, ScheduleError<std::convert::Infallible>> {
        self.dynamic(substring, target_url, DelaySpec::fixed(delay))
    }
}

impl<H> Redirector<H, H, H>
where
    H: LocationReader + Navigator + Scheduler + Clone + 'static,
{
    /// Use one host value for all three capabilities.
    pub fn with_host(host: H) -> Self {
        Self::new(host.clone(), host.clone(), host)
    }
}
