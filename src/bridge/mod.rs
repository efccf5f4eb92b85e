use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, HtmlElement, Window};

use crate::{err, Res};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn log(s: &str);
}

// Off the browser there is no console; logging becomes a no-op so the core
// state machine can run under native tests.
#[cfg(not(target_arch = "wasm32"))]
pub fn log(s: &str) {
    let _ = s;
}

// I want this around for debugging
#[allow(unused_macros)]
macro_rules! flog {
    ($($tts:tt)*) => {
        crate::bridge::log(&format!($($tts)*))
    }
}

#[allow(unused_imports)]
pub(crate) use flog;

fn window() -> Res<Window> {
    match web_sys::window() {
        Some(w) => Ok(w),
        None => err("No Window."),
    }
}

pub fn get_document() -> Res<Document> {
    match window()?.document() {
        Some(d) => Ok(d),
        None => err("No Document."),
    }
}

pub fn get_body() -> Res<HtmlElement> {
    match get_document()?.body() {
        Some(b) => Ok(b),
        None => err("No Body."),
    }
}

pub fn js_err(v: JsValue) -> String {
    if let Some(s) = v.as_string() {
        s
    } else {
        format!("{v:?}")
    }
}

/// Decode a value handed across the JS boundary by round-tripping it
/// through JSON.
pub fn parse_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> Option<T> {
    let json = js_sys::JSON::stringify(value).ok()?;
    let json = String::from(json);
    if let Ok(val) = serde_json::from_str::<T>(&json) {
        Some(val)
    } else {
        flog!("Failed to parse JS value: {json}");
        None
    }
}
