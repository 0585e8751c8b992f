// crates/replier-server/src/llm/mod.rs
// LLM provider client and prompt table

mod anthropic;
pub mod prompts;

pub use anthropic::{AnthropicClient, ContentBlock, Message, MessagesRequest, MessagesResponse, first_text_block};
