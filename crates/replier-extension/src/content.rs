// crates/replier-extension/src/content.rs
// Content script: mounts the reply dialog into the page and wires its controls

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use replier_types::{CallLlmResponse, ExtensionMessage, GenerateRequest, Tone};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlSelectElement,
    HtmlTextAreaElement, KeyboardEvent,
};

use crate::chrome::{self, from_js, js_error_message, to_js};
use crate::dialog::{DialogManager, InstallMarker, Page, ReplyOutcome, ViewState, claim_install};
use crate::error::ExtensionError;
use crate::markup::{
    CLOSE_BUTTON, COPIED_LABEL, COPY_BUTTON, COPY_FEEDBACK_MS, DIALOG_ID, ERROR, GENERATE_BUTTON,
    LOADING, OVERLAY_ID, PROMPT_INPUT, RESULT_SECTION, RESULT_TEXT, TYPE_SELECT,
};
use crate::settings::{ChromeStorage, SettingsStore};

type Manager = DialogManager<DomPage>;

// ============================================================================
// DOM page
// ============================================================================

/// Event listeners owned by one mounted dialog
struct DialogListeners {
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
    others: Vec<Closure<dyn FnMut(Event)>>,
}

pub struct MountedDialog {
    overlay: Element,
    listeners: Option<DialogListeners>,
}

pub struct DomPage {
    document: Document,
}

impl Page for DomPage {
    type Node = MountedDialog;

    fn mount(&mut self, markup: &str) -> Result<MountedDialog, ExtensionError> {
        let browser = |e: JsValue| ExtensionError::Browser(js_error_message(&e));

        let overlay = self.document.create_element("div").map_err(browser)?;
        overlay.set_id(OVERLAY_ID);

        let dialog = self.document.create_element("div").map_err(browser)?;
        dialog.set_id(DIALOG_ID);
        dialog.set_inner_html(markup);

        overlay.append_child(&dialog).map_err(browser)?;
        let body = self
            .document
            .body()
            .ok_or_else(|| ExtensionError::Browser("page has no body".to_string()))?;
        body.append_child(&overlay).map_err(browser)?;

        Ok(MountedDialog {
            overlay,
            listeners: None,
        })
    }

    fn unmount(&mut self, node: MountedDialog) {
        node.overlay.remove();

        if let Some(listeners) = node.listeners {
            let _ = self.document.remove_event_listener_with_callback(
                "keydown",
                listeners.keydown.as_ref().unchecked_ref(),
            );
            // Unmount can run inside one of these closures; drop them afterwards
            spawn_local(async move {
                drop(listeners);
            });
        }
    }
}

impl InstallMarker for Element {
    fn has_marker(&self, name: &str) -> bool {
        self.has_attribute(name)
    }

    fn set_marker(&self, name: &str) {
        let _ = self.set_attribute(name, "");
    }
}

fn find<T: JsCast>(root: &Element, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

fn set_display(root: &Element, selector: &str, value: &str) {
    if let Some(el) = find::<HtmlElement>(root, selector) {
        let _ = el.style().set_property("display", value);
    }
}

fn render_view(overlay: &Element, view: &ViewState) {
    if let Some(button) = find::<HtmlButtonElement>(overlay, GENERATE_BUTTON) {
        button.set_disabled(!view.generate_enabled);
    }
    set_display(overlay, LOADING, if view.loading_visible { "flex" } else { "none" });

    match &view.error {
        Some(message) => {
            if let Some(el) = find::<HtmlElement>(overlay, ERROR) {
                el.set_text_content(Some(message));
            }
            set_display(overlay, ERROR, "block");
        }
        None => set_display(overlay, ERROR, "none"),
    }

    match &view.result {
        Some(reply) => {
            if let Some(textarea) = find::<HtmlTextAreaElement>(overlay, RESULT_TEXT) {
                textarea.set_value(reply);
            }
            set_display(overlay, RESULT_SECTION, "block");
        }
        None => set_display(overlay, RESULT_SECTION, "none"),
    }
}

fn render_form(overlay: &Element, tone: Tone, style: &str) {
    if let Some(select) = find::<HtmlSelectElement>(overlay, TYPE_SELECT) {
        select.set_value(tone.as_str());
    }
    if let Some(textarea) = find::<HtmlTextAreaElement>(overlay, PROMPT_INPUT) {
        textarea.set_value(style);
    }
}

// ============================================================================
// Install
// ============================================================================

/// Register the `OPEN_REPLY_DIALOG` listener once per page
pub fn install() -> Result<(), ExtensionError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ExtensionError::Browser("no document".to_string()))?;

    // A re-injected script may run in a fresh module instance; the marker lives on the page
    let root = document
        .document_element()
        .ok_or_else(|| ExtensionError::Browser("no document element".to_string()))?;
    if !claim_install(&root) {
        log::debug!("Content script already installed");
        return Ok(());
    }

    let manager = Rc::new(RefCell::new(DialogManager::new(DomPage { document })));

    let listener = Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>::new(
        move |message: JsValue, _sender: JsValue, _send_response: js_sys::Function| {
            if let Ok(ExtensionMessage::OpenReplyDialog { selected_text }) = from_js(&message) {
                if let Err(e) = open_dialog(&manager, selected_text) {
                    log::error!("Failed to open reply dialog: {}", e);
                }
            }
            false
        },
    );
    chrome::add_runtime_message_listener(&listener);
    listener.forget();

    Ok(())
}

// ============================================================================
// Dialog actions
// ============================================================================

fn open_dialog(manager: &Rc<RefCell<Manager>>, selected_text: String) -> Result<(), ExtensionError> {
    let (id, overlay) = {
        let mut guard = manager.borrow_mut();
        let handle = guard.open(selected_text)?;
        (handle.id(), handle.node().overlay.clone())
    };

    let listeners = wire_listeners(Rc::downgrade(manager), id, &overlay)?;
    if let Some(handle) = manager.borrow_mut().handle_mut(id) {
        handle.node_mut().listeners = Some(listeners);
    }

    spawn_local(restore_settings(Rc::downgrade(manager), id));
    Ok(())
}

fn close_dialog(manager: &Weak<RefCell<Manager>>) {
    if let Some(manager) = manager.upgrade() {
        manager.borrow_mut().close();
    }
}

fn wire_listeners(
    manager: Weak<RefCell<Manager>>,
    id: u64,
    overlay: &Element,
) -> Result<DialogListeners, ExtensionError> {
    let browser = |e: JsValue| ExtensionError::Browser(js_error_message(&e));
    let mut others = Vec::new();

    let mut listen = |selector: Option<&str>, handler: Box<dyn FnMut(Event)>| -> Result<(), ExtensionError> {
        let closure = Closure::wrap(handler);
        let target: Element = match selector {
            Some(selector) => overlay
                .query_selector(selector)
                .map_err(browser)?
                .ok_or_else(|| ExtensionError::Browser(format!("missing {}", selector)))?,
            None => overlay.clone(),
        };
        let event = if selector == Some(RESULT_TEXT) { "focus" } else { "click" };
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(browser)?;
        others.push(closure);
        Ok(())
    };

    let m = manager.clone();
    listen(Some(CLOSE_BUTTON), Box::new(move |_: Event| close_dialog(&m)))?;

    let m = manager.clone();
    let overlay_value: JsValue = overlay.clone().into();
    listen(
        None,
        Box::new(move |event: Event| {
            // Only clicks on the backdrop itself, not inside the dialog
            let target: Option<JsValue> = event.target().map(Into::into);
            if target.as_ref() == Some(&overlay_value) {
                close_dialog(&m);
            }
        }),
    )?;

    let m = manager.clone();
    listen(Some(GENERATE_BUTTON), Box::new(move |_: Event| start_generate(&m, id)))?;

    let copy_root = overlay.clone();
    listen(
        Some(COPY_BUTTON),
        Box::new(move |_: Event| spawn_local(copy_result(copy_root.clone()))),
    )?;

    let select_root = overlay.clone();
    listen(
        Some(RESULT_TEXT),
        Box::new(move |_: Event| {
            if let Some(textarea) = find::<HtmlTextAreaElement>(&select_root, RESULT_TEXT) {
                textarea.select();
            }
        }),
    )?;

    let m = manager;
    let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.key() == "Escape" {
            close_dialog(&m);
        }
    });
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ExtensionError::Browser("no document".to_string()))?
        .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
        .map_err(browser)?;

    Ok(DialogListeners { keydown, others })
}

fn start_generate(manager: &Weak<RefCell<Manager>>, id: u64) {
    let Some(manager_rc) = manager.upgrade() else {
        return;
    };

    let (request, settings) = {
        let mut guard = manager_rc.borrow_mut();
        let Some(handle) = guard.handle_mut(id) else {
            return;
        };
        let overlay = handle.node().overlay.clone();

        let tone = find::<HtmlSelectElement>(&overlay, TYPE_SELECT)
            .and_then(|select| select.value().parse::<Tone>().ok())
            .unwrap_or_default();
        let style = find::<HtmlTextAreaElement>(&overlay, PROMPT_INPUT)
            .map(|textarea| textarea.value())
            .unwrap_or_default();
        handle.set_form(tone, style);

        let started = handle.begin_generate();
        render_view(&overlay, handle.view());
        started
    };

    // Fire-and-forget
    spawn_local(async move {
        if let Err(e) = ChromeStorage.save(&settings).await {
            log::error!("Error saving settings: {}", e);
        }
    });

    spawn_local(request_reply(manager.clone(), id, request));
}

async fn send_call_llm(request: GenerateRequest) -> ReplyOutcome {
    let message = match to_js(&ExtensionMessage::CallLlm { payload: request }) {
        Ok(message) => message,
        Err(e) => {
            log::error!("Failed to encode CALL_LLM: {}", e);
            return ReplyOutcome::MessagingFailed;
        }
    };

    match chrome::send_runtime_message(message).await {
        Ok(response) => from_js::<CallLlmResponse>(&response)
            .map(ReplyOutcome::from)
            .unwrap_or(ReplyOutcome::Failed(None)),
        Err(e) => {
            log::error!("CALL_LLM not delivered: {}", js_error_message(&e));
            ReplyOutcome::MessagingFailed
        }
    }
}

async fn request_reply(manager: Weak<RefCell<Manager>>, id: u64, request: GenerateRequest) {
    let outcome = send_call_llm(request).await;

    let Some(manager) = manager.upgrade() else {
        return;
    };
    let mut guard = manager.borrow_mut();
    match guard.handle_mut(id) {
        Some(handle) => {
            handle.complete(outcome);
            render_view(&handle.node().overlay, handle.view());
        }
        None => log::debug!("Dialog {} closed before its reply arrived", id),
    }
}

async fn restore_settings(manager: Weak<RefCell<Manager>>, id: u64) {
    let restored = match ChromeStorage.load().await {
        Ok(restored) => restored,
        Err(e) => {
            log::error!("Error loading saved settings: {}", e);
            return;
        }
    };

    let Some(manager) = manager.upgrade() else {
        return;
    };
    let mut guard = manager.borrow_mut();
    if let Some(handle) = guard.handle_mut(id) {
        handle.apply_settings(&restored);
        render_form(&handle.node().overlay, handle.tone(), handle.style());
    }
}

async fn copy_result(overlay: Element) {
    let text = find::<HtmlTextAreaElement>(&overlay, RESULT_TEXT)
        .map(|textarea| textarea.value())
        .unwrap_or_default();
    let (Some(window), Some(button)) = (web_sys::window(), find::<HtmlElement>(&overlay, COPY_BUTTON))
    else {
        return;
    };

    let clipboard = window.navigator().clipboard();
    match JsFuture::from(clipboard.write_text(&text)).await {
        Ok(_) => {
            let original = button.text_content().unwrap_or_default();
            button.set_text_content(Some(COPIED_LABEL));
            gloo_timers::future::TimeoutFuture::new(COPY_FEEDBACK_MS).await;
            button.set_text_content(Some(&original));
        }
        Err(e) => log::error!("Failed to copy: {}", js_error_message(&e)),
    }
}
