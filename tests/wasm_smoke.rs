//! Browser smoke tests: construct against a bare document, inspect, detach.
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use pagefx::PageFx;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_attach_with_undefined_options() {
    let fx = PageFx::new(JsValue::UNDEFINED).unwrap();
    assert!(fx.attached());
    assert!(!fx.bar_visible());
    assert_eq!(fx.bar_state(), "hidden");
}

#[wasm_bindgen_test]
fn test_attach_with_options_object() {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(
        &options,
        &JsValue::from_str("thresholdPx"),
        &JsValue::from_f64(150.0),
    )
    .unwrap();
    let fx = PageFx::new(options.into()).unwrap();
    assert!(fx.attached());
}

#[wasm_bindgen_test]
fn test_bad_options_are_rejected() {
    assert!(PageFx::new(JsValue::from_str("not an object")).is_err());
}

#[wasm_bindgen_test]
fn test_detach_is_idempotent() {
    let mut fx = PageFx::new(JsValue::NULL).unwrap();
    fx.detach();
    assert!(!fx.attached());
    fx.detach();
    assert!(!fx.attached());
}

#[wasm_bindgen_test]
fn test_metrics_are_exposed_both_ways() {
    let fx = PageFx::new(JsValue::UNDEFINED).unwrap();
    let metrics = fx.scroll_metrics().unwrap();
    assert!(metrics.is_object());

    let json = fx.scroll_metrics_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["samples"], 0);
}

#[wasm_bindgen_test]
fn test_version_is_populated() {
    assert!(!pagefx::version().is_empty());
}
