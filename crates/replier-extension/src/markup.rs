// crates/replier-extension/src/markup.rs
// Dialog markup and element ids

use replier_types::Tone;

pub const OVERLAY_ID: &str = "li-reply-assistant-overlay";
pub const DIALOG_ID: &str = "li-reply-assistant-dialog";

pub const CLOSE_BUTTON: &str = ".li-reply-close";
pub const TYPE_SELECT: &str = "#li-reply-type";
pub const PROMPT_INPUT: &str = "#li-reply-prompt";
pub const GENERATE_BUTTON: &str = "#li-reply-generate";
pub const LOADING: &str = "#li-reply-loading";
pub const ERROR: &str = "#li-reply-error";
pub const RESULT_SECTION: &str = "#li-reply-result-section";
pub const RESULT_TEXT: &str = "#li-reply-result";
pub const COPY_BUTTON: &str = "#li-reply-copy";

pub const COPY_LABEL: &str = "Copy to Clipboard";
pub const COPIED_LABEL: &str = "Copied!";
/// How long the copy button shows "Copied!"
pub const COPY_FEEDBACK_MS: u32 = 1500;

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<option>` list for the tone selector, in `Tone::ALL` order
pub fn tone_options() -> String {
    Tone::ALL
        .iter()
        .map(|tone| {
            format!(
                r#"<option value="{}">{}</option>"#,
                tone.as_str(),
                html_escape(tone.label())
            )
        })
        .collect()
}

/// Inner HTML of the dialog body. Loading, error and result regions start hidden.
pub fn dialog_markup(selected_text: &str) -> String {
    format!(
        r#"
    <div class="li-reply-header">
      <h3>Generate Reply</h3>
      <button class="li-reply-close" aria-label="Close">&times;</button>
    </div>

    <div class="li-reply-body">
      <div class="li-reply-field">
        <label>Selected Text</label>
        <div class="li-reply-selected-text">{selected}</div>
      </div>

      <div class="li-reply-field">
        <label for="li-reply-type">Response Type</label>
        <select id="li-reply-type">{options}</select>
      </div>

      <div class="li-reply-field">
        <label for="li-reply-prompt">Style / Prompt (optional)</label>
        <textarea id="li-reply-prompt" placeholder="e.g., Keep it casual, add humor..."></textarea>
      </div>

      <button id="li-reply-generate" class="li-reply-btn-primary">Generate</button>

      <div id="li-reply-loading" class="li-reply-loading" style="display: none;">
        <div class="li-reply-spinner"></div>
        <span>Generating...</span>
      </div>

      <div id="li-reply-error" class="li-reply-error" style="display: none;"></div>

      <div id="li-reply-result-section" class="li-reply-field" style="display: none;">
        <label>Generated Reply</label>
        <textarea id="li-reply-result" readonly></textarea>
        <button id="li-reply-copy" class="li-reply-btn-secondary">{copy}</button>
      </div>
    </div>
  "#,
        selected = html_escape(selected_text),
        options = tone_options(),
        copy = COPY_LABEL,
    )
}
