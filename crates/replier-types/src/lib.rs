// crates/replier-types/src/lib.rs
// Shared types for Replier (native + WASM compatible)
// No native-only dependencies allowed here

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════
// TONES
// ═══════════════════════════════════════

/// Reply style presented to the user.
///
/// The declaration order is the order shown in the tone selector and the
/// order listed in validation errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Cheerleader,
    GentleCritic,
    ThoughtfulPeer,
    Practitioner,
    CuriousCollaborator,
    PolishedProfessional,
    AppreciativeContrarian,
    StorySharer,
    EnergizedBuilder,
    Networker,
}

impl Tone {
    pub const ALL: [Tone; 10] = [
        Tone::Cheerleader,
        Tone::GentleCritic,
        Tone::ThoughtfulPeer,
        Tone::Practitioner,
        Tone::CuriousCollaborator,
        Tone::PolishedProfessional,
        Tone::AppreciativeContrarian,
        Tone::StorySharer,
        Tone::EnergizedBuilder,
        Tone::Networker,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cheerleader => "cheerleader",
            Self::GentleCritic => "gentle_critic",
            Self::ThoughtfulPeer => "thoughtful_peer",
            Self::Practitioner => "practitioner",
            Self::CuriousCollaborator => "curious_collaborator",
            Self::PolishedProfessional => "polished_professional",
            Self::AppreciativeContrarian => "appreciative_contrarian",
            Self::StorySharer => "story_sharer",
            Self::EnergizedBuilder => "energized_builder",
            Self::Networker => "networker",
        }
    }

    /// Label for the tone selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cheerleader => "Cheerleader (Big Fan)",
            Self::GentleCritic => "Gentle Critic (Friendly Pushback)",
            Self::ThoughtfulPeer => "Thoughtful Peer (Adds Depth)",
            Self::Practitioner => "Practitioner (Personal Experience)",
            Self::CuriousCollaborator => "Curious Collaborator (Questions)",
            Self::PolishedProfessional => "Polished Professional",
            Self::AppreciativeContrarian => "Appreciative Contrarian",
            Self::StorySharer => "Story Sharer (Mini-Anecdote)",
            Self::EnergizedBuilder => "Energized Builder (Action-Oriented)",
            Self::Networker => "Networker (Let's Keep Talking)",
        }
    }

    /// Comma-separated identifiers, in selector order
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(Tone::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized tone identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTone(pub String);

impl fmt::Display for UnknownTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tone: {}", self.0)
    }
}

impl std::error::Error for UnknownTone {}

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

// ═══════════════════════════════════════
// HTTP BODIES
// ═══════════════════════════════════════

/// Body of `POST /generate-reply`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub selected_text: String,
    pub response_type: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateReplyResponse {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

// ═══════════════════════════════════════
// EXTENSION MESSAGES
// ═══════════════════════════════════════

/// Messages exchanged between the background worker and the content script.
///
/// `OpenReplyDialog` is fire-and-forget (worker → content).
/// `CallLlm` expects a [`CallLlmResponse`] (content → worker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtensionMessage {
    OpenReplyDialog {
        #[serde(rename = "selectedText")]
        selected_text: String,
    },
    CallLlm {
        payload: GenerateRequest,
    },
}

/// Asynchronous answer to [`ExtensionMessage::CallLlm`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLlmResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallLlmResponse {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            success: true,
            reply: Some(reply.into()),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            reply: None,
            error: Some(error.into()),
        }
    }
}

// ═══════════════════════════════════════
// SAVED SETTINGS
// ═══════════════════════════════════════

pub const LAST_RESPONSE_TYPE_KEY: &str = "lastResponseType";
pub const LAST_USER_PROMPT_KEY: &str = "lastUserPrompt";

/// Last-used dialog settings, kept in browser local storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSettings {
    pub last_response_type: Tone,
    pub last_user_prompt: String,
}
