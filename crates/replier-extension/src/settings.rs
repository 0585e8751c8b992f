// crates/replier-extension/src/settings.rs
// Last-used tone/style persistence

use std::cell::RefCell;
use std::collections::HashMap;

use replier_types::{LAST_RESPONSE_TYPE_KEY, LAST_USER_PROMPT_KEY, SavedSettings, Tone};

use crate::error::ExtensionError;

/// Settings read back from storage. Either key may be missing or unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredSettings {
    pub tone: Option<Tone>,
    pub style: Option<String>,
}

impl RestoredSettings {
    /// Build from raw stored strings; an unknown tone is dropped
    pub fn from_raw(tone: Option<&str>, style: Option<&str>) -> Self {
        Self {
            tone: tone.and_then(|t| t.parse().ok()),
            style: style.map(str::to_string),
        }
    }
}

/// Browser-local key-value storage for [`SavedSettings`]
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    async fn load(&self) -> Result<RestoredSettings, ExtensionError>;
    async fn save(&self, settings: &SavedSettings) -> Result<(), ExtensionError>;
}

/// In-memory store keyed like `chrome.storage.local`
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<RestoredSettings, ExtensionError> {
        let entries = self.entries.borrow();
        Ok(RestoredSettings::from_raw(
            entries.get(LAST_RESPONSE_TYPE_KEY).map(String::as_str),
            entries.get(LAST_USER_PROMPT_KEY).map(String::as_str),
        ))
    }

    async fn save(&self, settings: &SavedSettings) -> Result<(), ExtensionError> {
        self.insert(LAST_RESPONSE_TYPE_KEY, settings.last_response_type.as_str());
        self.insert(LAST_USER_PROMPT_KEY, &settings.last_user_prompt);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use chrome_store::ChromeStorage;

#[cfg(target_arch = "wasm32")]
mod chrome_store {
    use super::*;
    use crate::chrome::{self, js_error_message, to_js};
    use wasm_bindgen::JsValue;

    /// `chrome.storage.local`
    pub struct ChromeStorage;

    impl SettingsStore for ChromeStorage {
        async fn load(&self) -> Result<RestoredSettings, ExtensionError> {
            let keys = to_js(&[LAST_RESPONSE_TYPE_KEY, LAST_USER_PROMPT_KEY])?;
            let stored = chrome::storage_get(keys)
                .await
                .map_err(|e| ExtensionError::Browser(js_error_message(&e)))?;

            let read = |key: &str| {
                js_sys::Reflect::get(&stored, &JsValue::from_str(key))
                    .ok()
                    .and_then(|v| v.as_string())
            };
            Ok(RestoredSettings::from_raw(
                read(LAST_RESPONSE_TYPE_KEY).as_deref(),
                read(LAST_USER_PROMPT_KEY).as_deref(),
            ))
        }

        async fn save(&self, settings: &SavedSettings) -> Result<(), ExtensionError> {
            chrome::storage_set(to_js(settings)?)
                .await
                .map(|_| ())
                .map_err(|e| ExtensionError::Browser(js_error_message(&e)))
        }
    }
}
