//! WebAssembly bindings for DelayRedirect

use std::time::Duration;

use dr_core::{
    delay_from_millis, DelayError, DelaySpec, HostError, IntoDelay, LocationReader, Navigator,
    RedirectRule, Redirector, ScheduleError, Scheduler,
};
use wasm_bindgen::prelude::*;

type JsDelay = Box<dyn FnOnce() -> Result<JsDelayValue, JsValue>>;

/// Delay exactly as JS passed or returned it. Checked only when a timer is
/// about to be set.
struct JsDelayValue(JsValue);

impl IntoDelay for JsDelayValue {
    fn into_delay(self) -> Result<Duration, DelayError> {
        let millis = self.0.as_f64().ok_or(DelayError::NotANumber)?;
        delay_from_millis(millis)
    }
}

/// Browser host backed by the global `window`.
#[derive(Clone)]
struct BrowserHost {
    window: web_sys::Window,
}

impl BrowserHost {
    fn current() -> Result<Self, HostError> {
        web_sys::window()
            .map(|window| Self { window })
            .ok_or_else(|| HostError::Unavailable("No window".to_string()))
    }
}

impl LocationReader for BrowserHost {
    fn href(&self) -> Result<String, HostError> {
        self.window
            .location()
            .href()
            .map_err(|e| HostError::Location(describe(&e)))
    }
}

impl Navigator for BrowserHost {
    fn replace(&self, url: &str) -> Result<(), HostError> {
        self.window
            .location()
            .replace(url)
            .map_err(|e| HostError::Navigation(describe(&e)))
    }
}

impl Scheduler for BrowserHost {
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>) -> Result<(), HostError> {
        // Range is checked by dr-core before we get here.
        let millis = i32::try_from(delay.as_millis())
            .map_err(|_| HostError::Timer(format!("Delay {}ms out of range", delay.as_millis())))?;
        let callback = Closure::once_into_js(move || task());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
            .map(|_| ())
            .map_err(|e| HostError::Timer(describe(&e)))
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);
}

/// Redirect to `url` after `delay` milliseconds unless the current address
/// contains `substring`.
#[wasm_bindgen(js_name = redirectStatic)]
pub fn redirect_static(substring: Option<String>, url: &str, delay: f64) -> Result<(), JsValue> {
    let delay = JsDelayValue(JsValue::from_f64(delay));
    run(substring.as_deref(), url, DelaySpec::<JsDelay, _>::Fixed(delay))
}

/// Like [`redirect_static`], but `delay` may also be a function returning the
/// delay. The function is called once, before the address is checked.
#[wasm_bindgen(js_name = redirectDynamic)]
pub fn redirect_dynamic(substring: Option<String>, url: &str, delay: JsValue) -> Result<(), JsValue> {
    run(substring.as_deref(), url, js_delay(delay))
}

/// Object form of the two entry points: `Redirect.static(...)` and
/// `Redirect.dynamic(...)`.
#[wasm_bindgen]
pub struct Redirect {
    _private: (),
}

#[wasm_bindgen]
impl Redirect {
    #[wasm_bindgen(js_name = "static")]
    pub fn fixed(substring: Option<String>, url: &str, delay: f64) -> Result<(), JsValue> {
        redirect_static(substring, url, delay)
    }

    pub fn dynamic(substring: Option<String>, url: &str, delay: JsValue) -> Result<(), JsValue> {
        redirect_dynamic(substring, url, delay)
    }

    /// Schedule from `{ substring, targetUrl, delayMs }`.
    #[wasm_bindgen(js_name = fromRule)]
    pub fn from_rule(rule: JsValue) -> Result<(), JsValue> {
        let json = js_sys::JSON::stringify(&rule)?
            .as_string()
            .ok_or_else(|| js_error("Rule must be an object"))?;
        let rule = RedirectRule::from_json(&json).map_err(|e| to_js_error(&e))?;
        let host = BrowserHost::current().map_err(|e| to_js_error(&e))?;
        rule.schedule(&host, &host, &host)
            .map(|_| ())
            .map_err(|e| to_js_error(&e))
    }
}

fn run<F>(
    substring: Option<&str>,
    url: &str,
    delay: DelaySpec<F, JsDelayValue>,
) -> Result<(), JsValue>
where
    F: FnOnce() -> Result<JsDelayValue, JsValue>,
{
    let substring = substring.ok_or_else(|| schedule_error(ScheduleError::MissingSubstring))?;
    let host = BrowserHost::current().map_err(|e| to_js_error(&e))?;
    Redirector::with_host(host)
        .dynamic(substring, url, delay)
        .map(|_| ())
        .map_err(schedule_error)
}

fn js_delay(delay: JsValue) -> DelaySpec<JsDelay, JsDelayValue> {
    match delay.dyn_into::<js_sys::Function>() {
        Ok(f) => {
            let compute: JsDelay = Box::new(move || f.call0(&JsValue::UNDEFINED).map(JsDelayValue));
            DelaySpec::Computed(compute)
        }
        Err(value) => DelaySpec::Fixed(JsDelayValue(value)),
    }
}

/// A thrown delay function is rethrown as-is; everything else becomes an `Error`.
fn schedule_error(err: ScheduleError<JsValue>) -> JsValue {
    match err {
        ScheduleError::DelayComputation(thrown) => thrown,
        other => to_js_error(&other),
    }
}

fn to_js_error(err: &dyn std::fmt::Display) -> JsValue {
    js_error(&err.to_string())
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
