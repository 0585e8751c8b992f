// crates/replier-extension/src/chrome.rs
// Bindings to the chrome.* extension APIs used by the worker and content script

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::ExtensionError;

#[wasm_bindgen]
extern "C" {
    // runtime
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    pub fn add_installed_listener(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn add_runtime_message_listener(
        callback: &Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>,
    );

    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime"], js_name = sendMessage)]
    pub async fn send_runtime_message(message: JsValue) -> Result<JsValue, JsValue>;

    // contextMenus
    #[wasm_bindgen(js_namespace = ["chrome", "contextMenus"], js_name = create)]
    pub fn create_context_menu(properties: JsValue);

    #[wasm_bindgen(js_namespace = ["chrome", "contextMenus", "onClicked"], js_name = addListener)]
    pub fn add_context_menu_listener(callback: &Closure<dyn FnMut(JsValue, JsValue)>);

    // scripting
    #[wasm_bindgen(catch, js_namespace = ["chrome", "scripting"], js_name = executeScript)]
    pub async fn execute_script(injection: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "scripting"], js_name = insertCSS)]
    pub async fn insert_css(injection: JsValue) -> Result<JsValue, JsValue>;

    // tabs
    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    pub async fn send_tab_message(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    // storage
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    pub async fn storage_get(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    pub async fn storage_set(items: JsValue) -> Result<JsValue, JsValue>;
}

/// Convert a serde value into a plain JS object via JSON
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ExtensionError> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|e| ExtensionError::Browser(js_error_message(&e)))
}

/// Convert a plain JS object into a serde value via JSON
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, ExtensionError> {
    if value.is_undefined() {
        return Err(ExtensionError::Browser("undefined value".to_string()));
    }
    let json: String = js_sys::JSON::stringify(value)
        .map_err(|e| ExtensionError::Browser(js_error_message(&e)))?
        .into();
    Ok(serde_json::from_str(&json)?)
}

/// Best-effort message text of a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
