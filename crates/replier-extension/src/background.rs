// crates/replier-extension/src/background.rs
// Background worker: context menu, content script injection, backend relay

use serde::Deserialize;
use serde_json::Value;

pub const MENU_ITEM_ID: &str = "generateLinkedInReply";
pub const MENU_TITLE: &str = "Generate LLM reply";
pub const CONTENT_SCRIPT_FILE: &str = "content.js";
pub const STYLESHEET_FILE: &str = "styles.css";

/// Backend base URL, overridable at build time with REPLIER_BACKEND_URL
pub const BACKEND_URL: &str = match option_env!("REPLIER_BACKEND_URL") {
    Some(url) => url,
    None => "https://li-comments.onrender.com",
};

pub fn generate_reply_url() -> String {
    format!("{}/generate-reply", BACKEND_URL.trim_end_matches('/'))
}

/// `info` argument of `contextMenus.onClicked`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickInfo {
    /// String or number, depending on how the item was created
    pub menu_item_id: Value,
    #[serde(default)]
    pub selection_text: Option<String>,
}

/// `tab` argument of `contextMenus.onClicked`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabInfo {
    #[serde(default)]
    pub id: Option<i32>,
}

/// Tab and selection to open the dialog with, if this click is ours
pub fn dialog_target(info: &ClickInfo, tab: Option<&TabInfo>) -> Option<(i32, String)> {
    if info.menu_item_id.as_str() != Some(MENU_ITEM_ID) {
        return None;
    }
    let text = info.selection_text.as_deref().filter(|t| !t.is_empty())?;
    let tab_id = tab.and_then(|t| t.id)?;
    Some((tab_id, text.to_string()))
}

/// Why injecting the content script into a tab failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionFailure {
    /// The script is already loaded in the page
    AlreadyInjected,
    /// The page does not allow extension scripts (chrome://, web store, missing permission)
    Restricted,
    Other,
}

impl InjectionFailure {
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("already been declared") || lower.contains("already declared") {
            Self::AlreadyInjected
        } else if lower.contains("cannot access")
            || lower.contains("chrome://")
            || lower.contains("extensions gallery")
            || lower.contains("permission")
        {
            Self::Restricted
        } else {
            Self::Other
        }
    }
}

/// Failure reason for a non-success backend status: the body's `error` field,
/// or `HTTP <status>` when there is none.
pub fn backend_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[cfg(target_arch = "wasm32")]
pub use worker::install;

#[cfg(target_arch = "wasm32")]
mod worker {
    use super::*;
    use crate::chrome::{self, from_js, js_error_message, to_js};
    use crate::error::ExtensionError;
    use replier_types::{CallLlmResponse, ExtensionMessage, GenerateReplyResponse, GenerateRequest};
    use serde_json::json;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    /// Register the worker's listeners
    pub fn install() {
        let on_installed = Closure::<dyn FnMut(JsValue)>::new(|_details: JsValue| {
            let properties = json!({
                "id": MENU_ITEM_ID,
                "title": MENU_TITLE,
                "contexts": ["selection"],
            });
            match to_js(&properties) {
                Ok(properties) => chrome::create_context_menu(properties),
                Err(e) => log::error!("Failed to build context menu: {}", e),
            }
        });
        chrome::add_installed_listener(&on_installed);
        on_installed.forget();

        let on_clicked = Closure::<dyn FnMut(JsValue, JsValue)>::new(|info: JsValue, tab: JsValue| {
            let Ok(info) = from_js::<ClickInfo>(&info) else {
                return;
            };
            let tab = from_js::<TabInfo>(&tab).ok();
            if let Some((tab_id, selected_text)) = dialog_target(&info, tab.as_ref()) {
                spawn_local(open_dialog_in_tab(tab_id, selected_text));
            }
        });
        chrome::add_context_menu_listener(&on_clicked);
        on_clicked.forget();

        let on_message = Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>::new(
            |message: JsValue, _sender: JsValue, send_response: js_sys::Function| {
                match from_js::<ExtensionMessage>(&message) {
                    Ok(ExtensionMessage::CallLlm { payload }) => {
                        spawn_local(relay_to_backend(payload, send_response));
                        // Keep the response channel open for the async reply
                        true
                    }
                    _ => false,
                }
            },
        );
        chrome::add_runtime_message_listener(&on_message);
        on_message.forget();

        log::info!("Background worker ready (backend: {})", BACKEND_URL);
    }

    async fn inject(tab_id: i32) -> Result<(), JsValue> {
        let target = json!({ "tabId": tab_id });
        let script = to_js(&json!({ "target": target, "files": [CONTENT_SCRIPT_FILE] }))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        chrome::execute_script(script).await?;

        let css = to_js(&json!({ "target": target, "files": [STYLESHEET_FILE] }))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        chrome::insert_css(css).await?;
        Ok(())
    }

    async fn open_dialog_in_tab(tab_id: i32, selected_text: String) {
        if let Err(e) = inject(tab_id).await {
            let message = js_error_message(&e);
            match InjectionFailure::classify(&message) {
                InjectionFailure::AlreadyInjected => {
                    log::debug!("Content script already present in tab {}", tab_id)
                }
                InjectionFailure::Restricted => {
                    log::warn!("Tab {} does not allow injection: {}", tab_id, message)
                }
                InjectionFailure::Other => {
                    log::warn!("Injection into tab {} failed: {}", tab_id, message)
                }
            }
        }

        let message = ExtensionMessage::OpenReplyDialog { selected_text };
        let sent = match to_js(&message) {
            Ok(message) => chrome::send_tab_message(tab_id, message)
                .await
                .map(|_| ())
                .map_err(|e| js_error_message(&e)),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = sent {
            log::warn!("Could not open dialog in tab {}: {}", tab_id, e);
        }
    }

    /// POST the request to the backend and return the reply text
    pub async fn call_backend(request: &GenerateRequest) -> Result<String, ExtensionError> {
        let response = gloo_net::http::Request::post(&generate_reply_url())
            .json(request)
            .map_err(|e| ExtensionError::Browser(e.to_string()))?
            .send()
            .await
            .map_err(|e| ExtensionError::Transport(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtensionError::Backend {
                status,
                message: backend_error_message(status, &body),
            });
        }

        let data: GenerateReplyResponse = response
            .json()
            .await
            .map_err(|e| ExtensionError::MalformedResponse(e.to_string()))?;
        Ok(data.reply)
    }

    async fn relay_to_backend(request: GenerateRequest, send_response: js_sys::Function) {
        let response = match call_backend(&request).await {
            Ok(reply) => CallLlmResponse::ok(reply),
            Err(e) => {
                log::error!("Error calling backend: {}", e);
                CallLlmResponse::err(e.to_string())
            }
        };

        match to_js(&response) {
            Ok(response) => {
                if let Err(e) = send_response.call1(&JsValue::NULL, &response) {
                    log::warn!("Sender went away: {}", js_error_message(&e));
                }
            }
            Err(e) => log::error!("Failed to encode response: {}", e),
        }
    }
}
