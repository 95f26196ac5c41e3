//! DelayRedirect Core Library
//!
//! This crate provides the platform-independent engine behind the DelayRedirect
//! browser helpers: redirect the current page to another URL after a delay,
//! unless the page address already contains a given substring.
//!
//! # Architecture
//!
//! The engine never touches a browser directly. The three host primitives it
//! needs (reading the current address, replace-navigation, and a one-shot
//! timer) are traits in [`host`]. The wasm bindings implement them on top of
//! `web-sys`; [`sim::SimulatedHost`] implements them in memory for dry runs
//! and tests.
//!
//! # Modules
//!
//! - `delay`: fixed or computed delays and millisecond validation
//! - `error`: error types for scheduling and host failures
//! - `host`: host capability traits
//! - `redirect`: the containment check and the single `schedule` operation
//! - `rule`: serde-backed redirect rule configuration
//! - `sim`: in-memory host for dry runs and tests

pub mod delay;
pub mod error;
pub mod host;
pub mod redirect;
pub mod rule;
pub mod sim;

// Re-export commonly used types
pub use delay::{delay_from_millis, DelaySpec, IntoDelay, NoComputation, MAX_DELAY_MS};
pub use error::{DelayError, HostError, ScheduleError};
pub use host::{LocationReader, Navigator, Scheduler};
pub use redirect::{is_suppressed, schedule, RedirectOutcome, Redirector};
pub use rule::{parse_rules, RedirectRule, RuleError};
pub use sim::SimulatedHost;
