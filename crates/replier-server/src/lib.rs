// crates/replier-server/src/lib.rs
// Replier - short LLM-written replies for selected text

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod generator;
pub mod http;
pub mod llm;
pub mod web;

pub use error::{ReplierError, Result};
