// crates/replier-server/src/llm/prompts.rs
// Fixed prompt table: system instruction, model, and per-tone instructions

use replier_types::Tone;

pub const MODEL: &str = "claude-sonnet-4-20250514";
pub const MAX_TOKENS: u32 = 512;

/// Delimiter wrapped around the quoted post
pub const QUOTE_DELIMITER: &str = "\"\"\"";

pub const SYSTEM_PROMPT: &str = "You help write professional LinkedIn responses. Keep them concise (1-3 sentences), natural, and suitable as a direct post/comment. Avoid hashtags unless requested. Return only the reply text with no preamble or meta-commentary.";

/// Instruction sent for each tone
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Cheerleader => {
            "Generate a short LinkedIn comment in a warm, enthusiastic \"cheerleader\" tone. Sound like a real human who genuinely appreciates the post. Avoid clichés and keep it conversational, not exaggerated."
        }
        Tone::GentleCritic => {
            "Generate a short LinkedIn comment that is friendly and respectful but adds gentle, constructive pushback. Acknowledge what works, then offer a missed nuance or open question. Sound human, not formal."
        }
        Tone::ThoughtfulPeer => {
            "Create a short, thoughtful LinkedIn comment that agrees with the post and adds a reflective point or personal observation. Keep it grounded and conversational."
        }
        Tone::Practitioner => {
            "Generate a concise LinkedIn comment that sounds like someone speaking from firsthand experience. Relate the post to something practical without oversharing. Human, grounded tone."
        }
        Tone::CuriousCollaborator => {
            "Write a short LinkedIn comment that shows genuine curiosity and asks a thoughtful follow-up question. Keep the tone warm, human, and collaborative."
        }
        Tone::PolishedProfessional => {
            "Generate a clean, concise LinkedIn comment in a professional but human tone. No corporate buzzwords unless they naturally fit."
        }
        Tone::AppreciativeContrarian => {
            "Write a LinkedIn comment that acknowledges the value of the post but respectfully disagrees with part of it, adding a constructive alternative viewpoint. Make it sound human and grounded, not argumentative."
        }
        Tone::StorySharer => {
            "Generate a brief LinkedIn comment that contains a short, relevant anecdote. Keep it tight, human, and authentic—not overly dramatic."
        }
        Tone::EnergizedBuilder => {
            "Write a LinkedIn comment that acknowledges the insight and shifts toward what's possible next. Keep it optimistic but grounded, human but not gushy."
        }
        Tone::Networker => {
            "Generate a brief LinkedIn comment that expresses interest in continuing the conversation or learning more from the author. Tone should be warm, human, and not salesy."
        }
    }
}

/// Compose the single user-role message for a reply request.
///
/// Layout: intro line, the post quoted verbatim between delimiters, the tone
/// instruction, then the optional style note on its own line.
pub fn build_user_message(selected_text: &str, tone: Tone, user_prompt: Option<&str>) -> String {
    let mut message = format!(
        "Here is the LinkedIn post or comment to respond to:\n\n{delim}\n{text}\n{delim}\n\n{instruction}",
        delim = QUOTE_DELIMITER,
        text = selected_text,
        instruction = tone_instruction(tone),
    );

    if let Some(style) = user_prompt.filter(|s| !s.is_empty()) {
        message.push_str("\n\nAdditional style instructions: ");
        message.push_str(style);
    }

    message
}
