//! In-memory host.
//!
//! `SimulatedHost` implements all three host capabilities without a browser.
//! Timers are queued until [`SimulatedHost::run_pending`] is called, so the
//! CLI can dry-run a redirect and tests can observe every timer and
//! navigation deterministically.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::HostError;
use crate::host::{LocationReader, Navigator, Scheduler};

struct PendingTimer {
    seq: u64,
    delay: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct State {
    history: Vec<String>,
    navigations: Vec<String>,
    timers: Vec<PendingTimer>,
    next_seq: u64,
    location_error: Option<HostError>,
    navigation_error: Option<HostError>,
}

/// Shared handle to a simulated page. Clones see the same page.
#[derive(Clone)]
pub struct SimulatedHost {
    state: Rc<RefCell<State>>,
}

impl SimulatedHost {
    pub fn new(href: impl Into<String>) -> Self {
        let state = State {
            history: vec![href.into()],
            ..State::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Push a new history entry, as a normal link navigation would.
    pub fn push(&self, href: impl Into<String>) {
        self.state.borrow_mut().history.push(href.into());
    }

    /// Current address.
    pub fn current(&self) -> String {
        self.state.borrow().history.last().cloned().unwrap_or_default()
    }

    /// All history entries, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    /// Every URL passed to `replace`, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.state.borrow().navigations.clone()
    }

    /// Delays of timers that have not fired yet, in registration order.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.state.borrow().timers.iter().map(|t| t.delay).collect()
    }

    /// Make subsequent `href` reads fail with `err`.
    pub fn fail_location(&self, err: HostError) {
        self.state.borrow_mut().location_error = Some(err);
    }

    /// Make subsequent `replace` calls fail with `err`.
    pub fn fail_navigation(&self, err: HostError) {
        self.state.borrow_mut().navigation_error = Some(err);
    }

    /// Fire every queued timer, shortest delay first, and return how many ran.
    ///
    /// Timers with equal delays fire in registration order.
    pub fn run_pending(&self) -> usize {
        let mut timers = std::mem::take(&mut self.state.borrow_mut().timers);
        timers.sort_by_key(|t| (t.delay, t.seq));

        let count = timers.len();
        for timer in timers {
            (timer.task)();
        }
        count
    }
}

impl LocationReader for SimulatedHost {
    fn href(&self) -> Result<String, HostError> {
        let state = self.state.borrow();
        if let Some(err) = &state.location_error {
            return Err(err.clone());
        }
        Ok(state.history.last().cloned().unwrap_or_default())
    }
}

impl Navigator for SimulatedHost {
    fn replace(&self, url: &str) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = &state.navigation_error {
            return Err(err.clone());
        }
        match state.history.last_mut() {
            Some(current) => *current = url.to_string(),
            None => state.history.push(url.to_string()),
        }
        state.navigations.push(url.to_string());
        Ok(())
    }
}

impl Scheduler for SimulatedHost {
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.timers.push(PendingTimer { seq, delay, task });
        Ok(())
    }
}

impl std::fmt::Debug for SimulatedHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SimulatedHost")
            .field("history", &state.history)
            .field("pending_timers", &state.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::Redirector;

    #[test]
    fn test_replace_overwrites_current_entry() {
        let host = SimulatedHost::new("https://site.com/landing");
        host.push("https://site.com/page");

        Redirector::with_host(host.clone())
            .fixed("designer", "https://example.com", Duration::from_millis(2000))
            .unwrap();
        host.run_pending();

        // Back from the target lands on the landing page, not the redirected one.
        assert_eq!(
            host.history(),
            vec!["https://site.com/landing".to_string(), "https://example.com".to_string()]
        );
        assert_eq!(host.current(), "https://example.com");
    }

    #[test]
    fn test_timers_fire_in_delay_order() {
        let host = SimulatedHost::new("about:blank");
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, ms) in [("slow", 30u64), ("fast", 10), ("tie", 10)] {
            let order = order.clone();
            host.defer(
                Duration::from_millis(ms),
                Box::new(move || order.borrow_mut().push(label)),
            )
            .unwrap();
        }

        assert_eq!(host.run_pending(), 3);
        assert_eq!(*order.borrow(), vec!["fast", "tie", "slow"]);
    }
}
