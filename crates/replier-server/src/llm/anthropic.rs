// crates/replier-server/src/llm/anthropic.rs
// Anthropic Messages API client

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReplierError, Result};

const API_VERSION: &str = "2023-06-01";

/// Thin client for `POST /v1/messages`.
///
/// One call per request, no retries. Transport and provider failures are
/// returned to the caller as-is.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    pub async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        debug!(model = %request.model, max_tokens = request.max_tokens, "Sending Anthropic request");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplierError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<MessagesResponse>().await?)
    }
}

// ----- Types -----

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Response content block. Only text blocks carry anything we use.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// First content block of type "text"
pub fn first_text_block(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or(ReplierError::InvalidResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> MessagesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_wire_format() {
        let req = MessagesRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 512,
            system: "be brief".to_string(),
            messages: vec![Message::user("hello")],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["system"], "be brief");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_first_text_block_skips_other_types() {
        let resp = response(
            r#"{"content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "Great post!"},
                {"type": "text", "text": "second"}
            ]}"#,
        );
        assert_eq!(first_text_block(resp).unwrap(), "Great post!");
    }

    #[test]
    fn test_first_text_block_missing() {
        let resp = response(r#"{"content": [{"type": "tool_use", "id": "t1"}]}"#);
        assert!(matches!(first_text_block(resp), Err(ReplierError::InvalidResponse)));
    }

    #[test]
    fn test_first_text_block_empty_content() {
        let resp = response(r#"{"id": "msg_1"}"#);
        assert!(matches!(first_text_block(resp), Err(ReplierError::InvalidResponse)));
    }

    #[test]
    fn test_messages_url_trims_slash() {
        let client = AnthropicClient::new(Client::new(), "k", "http://localhost:1234/");
        assert_eq!(client.messages_url(), "http://localhost:1234/v1/messages");
    }
}
