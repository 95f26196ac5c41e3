//! DelayRedirect CLI
//!
//! Dry-run conditional redirects against a simulated page and check rule files.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use dr_core::RedirectRule;

#[cfg(feature = "e2e")]
mod e2e;
mod plan;

#[derive(Parser)]
#[command(name = "dr-cli")]
#[command(about = "DelayRedirect dry-run and verification tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what a redirect call would do on a page
    Plan {
        /// Address of the simulated page
        #[arg(short, long)]
        location: String,

        /// Substring that suppresses the redirect
        #[arg(short, long)]
        substring: String,

        /// Redirect target
        #[arg(short, long)]
        url: String,

        /// Delay in milliseconds
        #[arg(short, long, default_value_t = 0)]
        delay_ms: u64,

        /// Fire pending timers and report the final address
        #[arg(long)]
        fire: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate every rule in a JSON rule file against an address
    Check {
        /// Rule file (JSON array of {substring, targetUrl, delayMs})
        #[arg(short, long)]
        rules: PathBuf,

        /// Address of the simulated page
        #[arg(short, long)]
        location: String,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run browser checks against the demo page
    #[cfg(feature = "e2e")]
    E2e {
        #[arg(long, default_value = "http://localhost:9515")]
        chromedriver_url: String,

        /// URL of demos/index.html served next to the wasm-pack output
        #[arg(long)]
        page_url: String,

        #[arg(long, default_value = "https://example.com/")]
        target_url: String,

        #[arg(long)]
        headless: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            location,
            substring,
            url,
            delay_ms,
            fire,
            json,
        } => cmd_plan(&location, RedirectRule::new(substring, url, delay_ms), fire, json),
        Commands::Check {
            rules,
            location,
            json,
        } => cmd_check(&rules, &location, json),
        #[cfg(feature = "e2e")]
        Commands::E2e {
            chromedriver_url,
            page_url,
            target_url,
            headless,
        } => e2e::run_e2e(e2e::E2eOptions {
            chromedriver_url,
            page_url,
            target_url,
            headless,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_plan(location: &str, rule: RedirectRule, fire: bool, json: bool) -> Result<(), String> {
    let report = plan::plan_rule(location, &rule, fire)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", out);
    } else {
        println!("Plan for {}", location);
        plan::print_report(&report);
    }

    Ok(())
}

fn cmd_check(path: &Path, location: &str, json: bool) -> Result<(), String> {
    let rules = plan::load_rules(path)?;
    let reports = plan::check_rules(&rules, location)?;

    if json {
        let out = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to serialize reports: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    let scheduled = reports.iter().filter(|r| r.scheduled).count();
    println!("Checked {} rule(s) from '{}' against {}", rules.len(), path.display(), location);
    for (idx, report) in reports.iter().enumerate() {
        println!("[{}]", idx);
        plan::print_report(report);
    }
    println!("  Scheduled: {}", scheduled);
    println!("  Suppressed: {}", reports.len() - scheduled);

    Ok(())
}
