use std::fs;
use std::path::Path;

use serde::Serialize;

use dr_core::{parse_rules, RedirectOutcome, RedirectRule, SimulatedHost};

/// Result of dry-running one rule against one address.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub location: String,
    pub substring: String,
    pub target_url: String,
    pub scheduled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_location: Option<String>,
}

/// Schedule `rule` on a simulated page at `location`. With `fire`, pending
/// timers run and the report includes where the page ends up.
pub fn plan_rule(location: &str, rule: &RedirectRule, fire: bool) -> Result<PlanReport, String> {
    let host = SimulatedHost::new(location);
    let outcome = rule
        .schedule(&host, &host, &host)
        .map_err(|e| format!("Failed to schedule redirect: {}", e))?;

    let delay_ms = match outcome {
        RedirectOutcome::Scheduled { delay } => Some(delay.as_millis() as u64),
        RedirectOutcome::Suppressed => None,
    };

    let final_location = if fire {
        host.run_pending();
        Some(host.current())
    } else {
        None
    };

    Ok(PlanReport {
        location: location.to_string(),
        substring: rule.substring.clone(),
        target_url: rule.target_url.clone(),
        scheduled: outcome.is_scheduled(),
        delay_ms,
        final_location,
    })
}

pub fn load_rules(path: &Path) -> Result<Vec<RedirectRule>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    parse_rules(&content).map_err(|e| format!("Invalid rule file '{}': {}", path.display(), e))
}

/// Dry-run every rule against `location`, each on its own fresh page.
pub fn check_rules(rules: &[RedirectRule], location: &str) -> Result<Vec<PlanReport>, String> {
    rules.iter().map(|rule| plan_rule(location, rule, false)).collect()
}

pub fn print_report(report: &PlanReport) {
    if report.scheduled {
        println!(
            "  redirect -> {} after {}ms ('{}' not in {})",
            report.target_url,
            report.delay_ms.unwrap_or(0),
            report.substring,
            report.location
        );
    } else {
        println!("  suppressed ('{}' found in {})", report.substring, report.location);
    }
    if let Some(final_location) = &report.final_location {
        println!("  final:    {}", final_location);
    }
}
