// crates/replier-extension/src/lib.rs
// Replier browser extension (WASM): background worker and content script
//
// The dialog state machine, markup, settings and backend error handling are
// target-independent and tested natively. Browser glue only builds for wasm32.

pub mod background;
pub mod dialog;
pub mod error;
pub mod markup;
pub mod settings;

#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod content;

pub use error::ExtensionError;
pub use replier_types::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    // Set up better panic messages
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);
}

/// Entry point for the extension's service worker
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_background() {
    init_logging();
    background::install();
}

/// Entry point for the injected content script
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_content_script() {
    init_logging();
    if let Err(e) = content::install() {
        log::error!("Content script failed to start: {}", e);
    }
}
