//! Redirect rule configuration.
//!
//! A rule is the serialized form of one redirect call:
//!
//! ```json
//! { "substring": "designer", "targetUrl": "https://example.com", "delayMs": 2000 }
//! ```
//!
//! A rule file is a JSON array of rules.

use std::convert::Infallible;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delay::DelaySpec;
use crate::error::ScheduleError;
use crate::host::{LocationReader, Navigator, Scheduler};
use crate::redirect::{schedule, RedirectOutcome};

/// Error type for rule parsing.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RedirectRule {
    pub substring: String,
    pub target_url: String,
    #[serde(default)]
    pub delay_ms: u64,
}

impl RedirectRule {
    pub fn new(substring: impl Into<String>, target_url: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            substring: substring.into(),
            target_url: target_url.into(),
            delay_ms,
        }
    }

    /// Parse a single rule from JSON.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Schedule this rule against the given host capabilities.
    pub fn schedule<L, N, S>(
        &self,
        location: &L,
        navigator: &N,
        scheduler: &S,
    ) -> Result<RedirectOutcome, ScheduleError<Infallible>>
    where
        L: LocationReader + ?Sized,
        N: Navigator + Clone + 'static,
        S: Scheduler + ?Sized,
    {
        schedule(
            location,
            navigator,
            scheduler,
            &self.substring,
            &self.target_url,
            DelaySpec::fixed(self.delay()),
        )
    }
}

/// Parse a JSON array of rules.
pub fn parse_rules(json: &str) -> Result<Vec<RedirectRule>, RuleError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedHost;

    #[test]
    fn test_parse_rule() {
        let rule = RedirectRule::from_json(
            r#"{"substring":"designer","targetUrl":"https://example.com","delayMs":2000}"#,
        )
        .unwrap();
        assert_eq!(rule, RedirectRule::new("designer", "https://example.com", 2000));
        assert_eq!(rule.delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_delay_defaults_to_zero() {
        let rule = RedirectRule::from_json(r#"{"substring":"x","targetUrl":"/home"}"#).unwrap();
        assert_eq!(rule.delay_ms, 0);
    }

    #[test]
    fn test_missing_substring_rejected() {
        let err = RedirectRule::from_json(r#"{"targetUrl":"/home","delayMs":5}"#).unwrap_err();
        assert!(err.to_string().contains("substring"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(RedirectRule::from_json(
            r#"{"substring":"x","targetUrl":"/home","delay":5}"#
        )
        .is_err());
    }

    #[test]
    fn test_parse_rules() {
        let rules = parse_rules(
            r#"[
                {"substring":"designer","targetUrl":"https://example.com","delayMs":2000},
                {"substring":"","targetUrl":"https://never.example"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].delay(), Duration::from_millis(2000));
        assert_eq!(rules[1], RedirectRule::new("", "https://never.example", 0));
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_string(&RedirectRule::new("a", "b", 1)).unwrap();
        assert_eq!(json, r#"{"substring":"a","targetUrl":"b","delayMs":1}"#);
    }

    #[test]
    fn test_schedule_rule() {
        let host = SimulatedHost::new("https://site.com/page");
        let rule = RedirectRule::new("designer", "https://example.com", 2000);

        let outcome = rule.schedule(&host, &host, &host).unwrap();
        assert_eq!(
            outcome,
            RedirectOutcome::Scheduled {
                delay: Duration::from_millis(2000)
            }
        );
        host.run_pending();
        assert_eq!(host.navigations(), vec!["https://example.com".to_string()]);
    }
}
