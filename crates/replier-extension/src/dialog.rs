// crates/replier-extension/src/dialog.rs
// Reply dialog lifecycle: single-owner handle plus per-dialog state machine

use replier_types::{CallLlmResponse, GenerateRequest, SavedSettings, Tone};

use crate::error::ExtensionError;
use crate::markup::dialog_markup;
use crate::settings::RestoredSettings;

pub const BACKEND_UNREACHABLE_MESSAGE: &str = "Backend not reachable. Is it running?";
pub const EXTENSION_ERROR_MESSAGE: &str = "Extension error. Please try again.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Where dialogs get attached. The DOM in the browser, a recorder in tests.
pub trait Page {
    type Node;

    fn mount(&mut self, markup: &str) -> Result<Self::Node, ExtensionError>;
    fn unmount(&mut self, node: Self::Node);
}

/// Attribute left on the document root once a content script has installed
pub const INSTALLED_ATTRIBUTE: &str = "data-replier-installed";

/// Page-level storage for the install marker. Outlives any one module instance.
pub trait InstallMarker {
    fn has_marker(&self, name: &str) -> bool;
    fn set_marker(&self, name: &str);
}

/// True for the first caller on this page; every later caller sees the marker
pub fn claim_install(root: &impl InstallMarker) -> bool {
    if root.has_marker(INSTALLED_ATTRIBUTE) {
        return false;
    }
    root.set_marker(INSTALLED_ATTRIBUTE);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Open,
    Loading,
    Result,
    Error,
}

/// What the dialog regions should currently show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub generate_enabled: bool,
    pub loading_visible: bool,
    pub error: Option<String>,
    pub result: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            generate_enabled: true,
            loading_visible: false,
            error: None,
            result: None,
        }
    }
}

/// Result of one `CALL_LLM` round trip as seen by the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Reply(String),
    /// Backend or worker reported failure, with its message if any
    Failed(Option<String>),
    /// The message never reached the background worker
    MessagingFailed,
}

impl From<CallLlmResponse> for ReplyOutcome {
    fn from(response: CallLlmResponse) -> Self {
        match (response.success, response.reply) {
            (true, Some(reply)) => Self::Reply(reply),
            (_, _) => Self::Failed(response.error),
        }
    }
}

/// Human-readable error line for a failed outcome
pub fn error_text(outcome: &ReplyOutcome) -> Option<String> {
    match outcome {
        ReplyOutcome::Reply(_) => None,
        ReplyOutcome::MessagingFailed => Some(EXTENSION_ERROR_MESSAGE.to_string()),
        ReplyOutcome::Failed(message) => {
            let message = message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_ERROR_MESSAGE);
            if message.contains("fetch") {
                Some(BACKEND_UNREACHABLE_MESSAGE.to_string())
            } else {
                Some(format!("Error: {}", message))
            }
        }
    }
}

/// The one open dialog. Only [`DialogHandle::close`] detaches it.
#[derive(Debug)]
pub struct DialogHandle<N> {
    id: u64,
    node: N,
    selected_text: String,
    tone: Tone,
    style: String,
    phase: DialogPhase,
    view: ViewState,
}

impl<N> DialogHandle<N> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut N {
        &mut self.node
    }

    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Record the current selector and textarea values
    pub fn set_form(&mut self, tone: Tone, style: impl Into<String>) {
        self.tone = tone;
        self.style = style.into();
    }

    /// Restore last-used settings; an empty stored style is skipped
    pub fn apply_settings(&mut self, restored: &RestoredSettings) {
        if let Some(tone) = restored.tone {
            self.tone = tone;
        }
        if let Some(style) = restored.style.as_deref().filter(|s| !s.is_empty()) {
            self.style = style.to_string();
        }
    }

    /// open/result/error → loading.
    ///
    /// Returns the backend request and the settings to persist.
    pub fn begin_generate(&mut self) -> (GenerateRequest, SavedSettings) {
        let style = self.style.trim().to_string();

        let request = GenerateRequest {
            selected_text: self.selected_text.clone(),
            response_type: self.tone,
            user_prompt: (!style.is_empty()).then(|| style.clone()),
        };
        let settings = SavedSettings {
            last_response_type: self.tone,
            last_user_prompt: style,
        };

        self.phase = DialogPhase::Loading;
        self.view = ViewState {
            generate_enabled: false,
            loading_visible: true,
            error: None,
            result: None,
        };

        (request, settings)
    }

    /// loading → result | error. Later completions overwrite earlier ones.
    pub fn complete(&mut self, outcome: ReplyOutcome) {
        let error = error_text(&outcome);
        let (phase, result) = match outcome {
            ReplyOutcome::Reply(reply) => (DialogPhase::Result, Some(reply)),
            _ => (DialogPhase::Error, None),
        };

        self.phase = phase;
        self.view = ViewState {
            generate_enabled: true,
            loading_visible: false,
            error,
            result,
        };
    }

    /// open → closed
    pub fn close<P: Page<Node = N>>(self, page: &mut P) {
        page.unmount(self.node);
    }
}

/// Owns the page and at most one open dialog
pub struct DialogManager<P: Page> {
    page: P,
    current: Option<DialogHandle<P::Node>>,
    next_id: u64,
}

impl<P: Page> DialogManager<P> {
    pub fn new(page: P) -> Self {
        Self {
            page,
            current: None,
            next_id: 1,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// closed → open. Any dialog already open is closed first.
    pub fn open(
        &mut self,
        selected_text: impl Into<String>,
    ) -> Result<&mut DialogHandle<P::Node>, ExtensionError> {
        self.close();

        let selected_text = selected_text.into();
        let node = self.page.mount(&dialog_markup(&selected_text))?;
        let id = self.next_id;
        self.next_id += 1;

        Ok(self.current.insert(DialogHandle {
            id,
            node,
            selected_text,
            tone: Tone::default(),
            style: String::new(),
            phase: DialogPhase::Open,
            view: ViewState::default(),
        }))
    }

    /// Close the open dialog, if any. Returns whether one was open.
    pub fn close(&mut self) -> bool {
        match self.current.take() {
            Some(handle) => {
                handle.close(&mut self.page);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&DialogHandle<P::Node>> {
        self.current.as_ref()
    }

    /// The open dialog, but only if it is the one with `id`.
    ///
    /// Async completions use this so they never touch a replacement dialog.
    pub fn handle_mut(&mut self, id: u64) -> Option<&mut DialogHandle<P::Node>> {
        self.current.as_mut().filter(|h| h.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which nodes are attached
    #[derive(Default)]
    struct FakePage {
        attached: Vec<usize>,
        mounted_total: usize,
        last_markup: String,
    }

    impl Page for FakePage {
        type Node = usize;

        fn mount(&mut self, markup: &str) -> Result<usize, ExtensionError> {
            self.mounted_total += 1;
            self.attached.push(self.mounted_total);
            self.last_markup = markup.to_string();
            Ok(self.mounted_total)
        }

        fn unmount(&mut self, node: usize) {
            self.attached.retain(|n| *n != node);
        }
    }

    /// Attributes of one page's root element
    #[derive(Default)]
    struct FakeRoot {
        attributes: std::cell::RefCell<Vec<String>>,
    }

    impl InstallMarker for FakeRoot {
        fn has_marker(&self, name: &str) -> bool {
            self.attributes.borrow().iter().any(|a| a == name)
        }

        fn set_marker(&self, name: &str) {
            self.attributes.borrow_mut().push(name.to_string());
        }
    }

    // ============================================================================
    // Install marker tests
    // ============================================================================

    #[test]
    fn test_claim_install_only_once_per_page() {
        let root = FakeRoot::default();
        assert!(claim_install(&root));
        assert!(!claim_install(&root));
        assert!(!claim_install(&root));
        assert_eq!(root.attributes.borrow().as_slice(), [INSTALLED_ATTRIBUTE]);
    }

    #[test]
    fn test_claim_install_separate_pages() {
        assert!(claim_install(&FakeRoot::default()));
        assert!(claim_install(&FakeRoot::default()));
    }

    // ============================================================================
    // Lifecycle tests
    // ============================================================================

    #[test]
    fn test_open_twice_leaves_one_dialog() {
        let mut manager = DialogManager::new(FakePage::default());
        manager.open("first").unwrap();
        manager.open("second").unwrap();

        assert_eq!(manager.page().attached, vec![2]);
        assert_eq!(manager.current().unwrap().selected_text(), "second");
    }

    #[test]
    fn test_open_renders_selected_text() {
        let mut manager = DialogManager::new(FakePage::default());
        manager.open("a <b> post").unwrap();
        assert!(manager.page().last_markup.contains("a &lt;b&gt; post"));
    }

    #[test]
    fn test_close_detaches() {
        let mut manager = DialogManager::new(FakePage::default());
        manager.open("text").unwrap();

        assert!(manager.close());
        assert!(manager.page().attached.is_empty());
        assert!(manager.current().is_none());
        assert!(!manager.close());
    }

    #[test]
    fn test_handle_mut_rejects_stale_id() {
        let mut manager = DialogManager::new(FakePage::default());
        let first = manager.open("first").unwrap().id();
        let second = manager.open("second").unwrap().id();

        assert_ne!(first, second);
        assert!(manager.handle_mut(first).is_none());
        assert!(manager.handle_mut(second).is_some());

        manager.close();
        assert!(manager.handle_mut(second).is_none());
    }

    #[test]
    fn test_new_dialog_starts_open() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("text").unwrap();
        assert_eq!(handle.phase(), DialogPhase::Open);
        assert_eq!(handle.tone(), Tone::Cheerleader);
        assert_eq!(handle.view(), &ViewState::default());
    }

    // ============================================================================
    // Generate flow tests
    // ============================================================================

    #[test]
    fn test_begin_generate_builds_request_and_settings() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("I just shipped a new feature!").unwrap();
        handle.set_form(Tone::StorySharer, "  casual  ");

        let (request, settings) = handle.begin_generate();
        assert_eq!(request.selected_text, "I just shipped a new feature!");
        assert_eq!(request.response_type, Tone::StorySharer);
        assert_eq!(request.user_prompt.as_deref(), Some("casual"));
        assert_eq!(settings.last_response_type, Tone::StorySharer);
        assert_eq!(settings.last_user_prompt, "casual");

        assert_eq!(handle.phase(), DialogPhase::Loading);
        assert!(!handle.view().generate_enabled);
        assert!(handle.view().loading_visible);
    }

    #[test]
    fn test_blank_style_is_omitted() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("post").unwrap();
        handle.set_form(Tone::Networker, "   ");
        let (request, _) = handle.begin_generate();
        assert_eq!(request.user_prompt, None);
    }

    #[test]
    fn test_success_shows_result() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("post").unwrap();
        handle.begin_generate();
        handle.complete(ReplyOutcome::Reply("Love it!".to_string()));

        assert_eq!(handle.phase(), DialogPhase::Result);
        assert_eq!(
            handle.view(),
            &ViewState {
                generate_enabled: true,
                loading_visible: false,
                error: None,
                result: Some("Love it!".to_string()),
            }
        );
    }

    #[test]
    fn test_regenerate_hides_previous_result() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("post").unwrap();
        handle.begin_generate();
        handle.complete(ReplyOutcome::Reply("first".to_string()));
        handle.begin_generate();

        assert_eq!(handle.view().result, None);
        assert_eq!(handle.view().error, None);
    }

    #[test]
    fn test_last_completion_wins() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("post").unwrap();
        handle.begin_generate();
        handle.begin_generate();
        handle.complete(ReplyOutcome::Reply("fast".to_string()));
        handle.complete(ReplyOutcome::Reply("slow".to_string()));

        assert_eq!(handle.view().result.as_deref(), Some("slow"));
    }

    #[test]
    fn test_failure_shows_error() {
        let mut manager = DialogManager::new(FakePage::default());
        let handle = manager.open("post").unwrap();
        handle.begin_generate();
        handle.complete(ReplyOutcome::Failed(Some("Failed to generate reply".to_string())));

        assert_eq!(handle.phase(), DialogPhase::Error);
        assert!(handle.view().generate_enabled);
        assert!(!handle.view().loading_visible);
        assert_eq!(
            handle.view().error.as_deref(),
            Some("Error: Failed to generate reply")
        );
        assert_eq!(handle.view().result, None);
    }

    // ============================================================================
    // Error text tests
    // ============================================================================

    #[test]
    fn test_fetch_failure_hint() {
        let outcome = ReplyOutcome::Failed(Some("fetch failed: TypeError: Failed to fetch".to_string()));
        assert_eq!(error_text(&outcome).as_deref(), Some(BACKEND_UNREACHABLE_MESSAGE));
    }

    #[test]
    fn test_missing_message_is_unknown() {
        assert_eq!(
            error_text(&ReplyOutcome::Failed(None)).as_deref(),
            Some("Error: Unknown error occurred")
        );
    }

    #[test]
    fn test_messaging_failure_text() {
        assert_eq!(
            error_text(&ReplyOutcome::MessagingFailed).as_deref(),
            Some(EXTENSION_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_outcome_from_response() {
        assert_eq!(
            ReplyOutcome::from(CallLlmResponse::ok("hi")),
            ReplyOutcome::Reply("hi".to_string())
        );
        assert_eq!(
            ReplyOutcome::from(CallLlmResponse::err("HTTP 502")),
            ReplyOutcome::Failed(Some("HTTP 502".to_string()))
        );
        let malformed = CallLlmResponse {
            success: true,
            reply: None,
            error: None,
        };
        assert_eq!(ReplyOutcome::from(malformed), ReplyOutcome::Failed(None));
    }
}
