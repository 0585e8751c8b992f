// crates/replier-server/src/generator.rs
// Reply generation: prompt assembly plus one provider call

use async_trait::async_trait;
use replier_types::GenerateRequest;
use tracing::info;

use crate::error::Result;
use crate::llm::prompts::{MAX_TOKENS, MODEL, SYSTEM_PROMPT, build_user_message};
use crate::llm::{AnthropicClient, Message, MessagesRequest, first_text_block};

/// Turns a validated request into reply text
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate_reply(&self, request: &GenerateRequest) -> Result<String>;
}

/// Generator backed by the Anthropic Messages API
pub struct AnthropicReplyGenerator {
    client: AnthropicClient,
}

impl AnthropicReplyGenerator {
    pub fn new(client: AnthropicClient) -> Self {
        Self { client }
    }

    /// Provider request for a reply, without sending it
    pub fn build_request(request: &GenerateRequest) -> MessagesRequest {
        let content = build_user_message(
            &request.selected_text,
            request.response_type,
            request.user_prompt.as_deref(),
        );

        MessagesRequest {
            model: MODEL.to_string(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(content)],
        }
    }
}

#[async_trait]
impl ReplyGenerator for AnthropicReplyGenerator {
    async fn generate_reply(&self, request: &GenerateRequest) -> Result<String> {
        let provider_request = Self::build_request(request);
        let response = self.client.create_message(&provider_request).await?;
        let reply = first_text_block(response)?;

        info!(
            tone = %request.response_type,
            input_chars = request.selected_text.len(),
            reply_chars = reply.len(),
            "Reply generated"
        );
        Ok(reply)
    }
}
