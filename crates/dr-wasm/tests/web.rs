//! Browser tests for the JS entry points.
//!
//! Only one case lets a timer fire, and it navigates to a fragment of the
//! test page itself, so the harness page is never unloaded.

use dr_wasm::{redirect_dynamic, redirect_static, Redirect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const TARGET: &str = "https://example.com";

fn current_href() -> String {
    web_sys::window().unwrap().location().href().unwrap()
}

fn counting_delay(counter: &str, millis: u32) -> js_sys::Function {
    js_sys::Function::new_no_args(&format!(
        "globalThis.{0} = (globalThis.{0} || 0) + 1; return {1};",
        counter, millis
    ))
}

async fn sleep(millis: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn read_counter(counter: &str) -> f64 {
    js_sys::Reflect::get(&js_sys::global(), &counter.into())
        .unwrap()
        .as_f64()
        .unwrap_or(0.0)
}

#[wasm_bindgen_test]
fn empty_substring_suppresses() {
    assert!(redirect_static(Some(String::new()), TARGET, 0.0).is_ok());
    assert!(redirect_dynamic(Some(String::new()), TARGET, JsValue::from_f64(0.0)).is_ok());
}

#[wasm_bindgen_test]
fn current_address_suppresses() {
    let href = current_href();
    assert!(redirect_static(Some(href.clone()), TARGET, 2000.0).is_ok());
    assert!(Redirect::fixed(Some(href.clone()), TARGET, 2000.0).is_ok());
    assert!(Redirect::dynamic(Some(href), TARGET, JsValue::from_f64(2000.0)).is_ok());
}

#[wasm_bindgen_test]
fn computed_delay_called_once_when_suppressed() {
    let f = counting_delay("__drSuppressedCalls", 500);
    assert!(redirect_dynamic(Some(current_href()), TARGET, f.into()).is_ok());
    assert_eq!(read_counter("__drSuppressedCalls"), 1.0);
}

#[wasm_bindgen_test]
fn invalid_delays_ignored_when_suppressed() {
    let href = current_href();
    assert!(redirect_static(Some(href.clone()), TARGET, -1.0).is_ok());
    assert!(redirect_static(Some(href.clone()), TARGET, f64::NAN).is_ok());
    assert!(redirect_dynamic(Some(href.clone()), TARGET, JsValue::from_str("soon")).is_ok());

    let f = js_sys::Function::new_no_args("return 'later';");
    assert!(redirect_dynamic(Some(href), TARGET, f.into()).is_ok());
}

#[wasm_bindgen_test]
async fn absent_substring_replaces_location_after_delay() {
    let location = web_sys::window().unwrap().location();
    let href = location.href().unwrap();
    let base = href.split('#').next().unwrap();
    let target = format!("{}#dr-fired", base);

    let f = js_sys::Function::new_no_args("return 50;");
    redirect_dynamic(Some("dr-never-in-a-test-url".into()), &target, f.into()).unwrap();
    assert_ne!(location.hash().unwrap(), "#dr-fired");

    sleep(300).await;
    assert_eq!(location.href().unwrap(), target);
}

#[wasm_bindgen_test]
fn missing_substring_is_rejected() {
    let err = redirect_static(None, TARGET, 0.0).unwrap_err();
    let err: js_sys::Error = err.dyn_into().unwrap();
    assert_eq!(String::from(err.message()), "Substring is required");
}

#[wasm_bindgen_test]
fn missing_substring_rejected_before_delay_runs() {
    let f = counting_delay("__drMissingCalls", 500);
    assert!(redirect_dynamic(None, TARGET, f.into()).is_err());
    assert_eq!(read_counter("__drMissingCalls"), 0.0);
}

#[wasm_bindgen_test]
fn throwing_delay_propagates_unchanged() {
    let f = js_sys::Function::new_no_args("throw 'delay exploded';");
    let err = redirect_dynamic(Some("never-in-a-test-url".into()), TARGET, f.into()).unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("delay exploded"));
}

#[wasm_bindgen_test]
fn invalid_delays_are_rejected() {
    let substring = || Some("never-in-a-test-url".to_string());
    assert!(redirect_static(substring(), TARGET, -1.0).is_err());
    assert!(redirect_static(substring(), TARGET, f64::NAN).is_err());
    assert!(redirect_dynamic(substring(), TARGET, JsValue::from_str("soon")).is_err());

    let f = js_sys::Function::new_no_args("return 'later';");
    assert!(redirect_dynamic(substring(), TARGET, f.into()).is_err());
}

#[wasm_bindgen_test]
fn rule_object_suppresses() {
    let rule = js_sys::Object::new();
    js_sys::Reflect::set(&rule, &"substring".into(), &current_href().into()).unwrap();
    js_sys::Reflect::set(&rule, &"targetUrl".into(), &TARGET.into()).unwrap();
    js_sys::Reflect::set(&rule, &"delayMs".into(), &JsValue::from(1000)).unwrap();
    assert!(Redirect::from_rule(rule.into()).is_ok());
}

#[wasm_bindgen_test]
fn malformed_rule_is_rejected() {
    let rule = js_sys::Object::new();
    js_sys::Reflect::set(&rule, &"targetUrl".into(), &TARGET.into()).unwrap();
    assert!(Redirect::from_rule(rule.into()).is_err());
    assert!(Redirect::from_rule(JsValue::UNDEFINED).is_err());
}
