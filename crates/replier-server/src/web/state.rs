// crates/replier-server/src/web/state.rs
// Web server state management

use std::sync::Arc;

use crate::generator::ReplyGenerator;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Reply generator (Anthropic in production, mocked in tests)
    pub generator: Arc<dyn ReplyGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ReplyGenerator>) -> Self {
        Self { generator }
    }
}
