use std::time::Duration;

use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;

pub struct E2eOptions {
    pub chromedriver_url: String,
    /// Demo page that loads the wasm package and exposes it as `window.dr`.
    pub page_url: String,
    pub target_url: String,
    pub headless: bool,
}

/// Extra time given to the browser beyond the requested delay.
const FIRE_MARGIN: Duration = Duration::from_millis(1500);
const REDIRECT_DELAY_MS: u64 = 300;

pub fn run_e2e(opts: E2eOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    runtime.block_on(run_e2e_async(opts))
}

async fn run_e2e_async(opts: E2eOptions) -> Result<(), String> {
    let mut caps = ChromeCapabilities::new();
    caps.add_arg("--no-first-run")
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    caps.add_arg("--no-default-browser-check")
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    if opts.headless {
        caps.add_arg("--headless=new")
            .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
        caps.add_arg("--disable-gpu")
            .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    }

    let driver = WebDriver::new(&opts.chromedriver_url, caps)
        .await
        .map_err(|e| format!("Failed to connect to chromedriver: {}", e))?;

    let mut errors = Vec::new();

    if let Err(e) = check_suppressed(&driver, &opts).await {
        errors.push(format!("Suppression check failed: {}", e));
    }

    if let Err(e) = check_redirect(&driver, &opts).await {
        errors.push(format!("Redirect check failed: {}", e));
    }

    if let Err(e) = check_missing_substring(&driver, &opts).await {
        errors.push(format!("Missing substring check failed: {}", e));
    }

    driver.quit().await.ok();

    if errors.is_empty() {
        println!("E2E checks passed");
        Ok(())
    } else {
        Err(format!("E2E failed:\n- {}", errors.join("\n- ")))
    }
}

async fn open_demo(driver: &WebDriver, page_url: &str) -> Result<(), String> {
    driver
        .goto(page_url)
        .await
        .map_err(|e| format!("Failed to open '{}': {}", page_url, e))?;

    for _ in 0..20 {
        let ready = eval_bool(driver, "return document.documentElement.dataset.drReady === '1';")
            .await
            .map_err(|e| format!("Failed to read ready flag: {}", e))?;
        if ready {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err("Demo page never loaded the wasm module".to_string())
}

/// The page's own address as substring: no navigation may happen.
async fn check_suppressed(driver: &WebDriver, opts: &E2eOptions) -> Result<(), String> {
    open_demo(driver, &opts.page_url).await?;
    let before = current_url(driver).await?;

    let script = format!(
        "window.dr.redirectStatic(window.location.href, {}, {}); return true;",
        Value::from(opts.target_url.as_str()),
        REDIRECT_DELAY_MS
    );
    eval_bool(driver, &script)
        .await
        .map_err(|e| format!("Failed to call redirectStatic: {}", e))?;

    tokio::time::sleep(Duration::from_millis(REDIRECT_DELAY_MS) + FIRE_MARGIN).await;

    let after = current_url(driver).await?;
    if after != before {
        return Err(format!("Expected to stay on {}, ended on {}", before, after));
    }
    Ok(())
}

/// A substring absent from the address: the page is replaced by the target,
/// and going back skips the redirected page.
async fn check_redirect(driver: &WebDriver, opts: &E2eOptions) -> Result<(), String> {
    // Earlier checks left the demo page in history; start from a distinct entry.
    driver
        .goto("about:blank")
        .await
        .map_err(|e| format!("Failed to open about:blank: {}", e))?;
    open_demo(driver, &opts.page_url).await?;
    let page = current_url(driver).await?;

    let script = format!(
        "window.dr.Redirect.dynamic('dr-e2e-absent-marker', {}, () => {}); return true;",
        Value::from(opts.target_url.as_str()),
        REDIRECT_DELAY_MS
    );
    eval_bool(driver, &script)
        .await
        .map_err(|e| format!("Failed to call Redirect.dynamic: {}", e))?;

    tokio::time::sleep(Duration::from_millis(REDIRECT_DELAY_MS) + FIRE_MARGIN).await;

    let after = current_url(driver).await?;
    if !after.starts_with(opts.target_url.trim_end_matches('/')) {
        return Err(format!("Expected redirect to {}, ended on {}", opts.target_url, after));
    }

    driver.back().await.map_err(|e| format!("Failed to go back: {}", e))?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    let back = current_url(driver).await?;
    if back == page {
        return Err("Back navigation returned to the redirected page".to_string());
    }
    Ok(())
}

async fn check_missing_substring(driver: &WebDriver, opts: &E2eOptions) -> Result<(), String> {
    open_demo(driver, &opts.page_url).await?;
    let threw = eval_bool(
        driver,
        "try { window.dr.redirectStatic(undefined, 'https://example.com', 0); return false; } catch (e) { return true; }",
    )
    .await
    .map_err(|e| format!("Failed to call redirectStatic: {}", e))?;
    if !threw {
        return Err("Expected a missing substring to throw".to_string());
    }
    Ok(())
}

async fn current_url(driver: &WebDriver) -> Result<String, String> {
    driver
        .current_url()
        .await
        .map(|url| url.to_string())
        .map_err(|e| format!("Failed to read current URL: {}", e))
}

async fn eval_bool(driver: &WebDriver, script: &str) -> WebDriverResult<bool> {
    let result = driver.execute(script, Vec::<Value>::new()).await?;
    Ok(result.json().as_bool().unwrap_or(false))
}
